fn main() -> std::process::ExitCode {
  zoidberg_coach_lib::run()
}
