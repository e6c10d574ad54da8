use std::process::ExitCode;
use usersecrets::HostRuntime;
use usersecrets::cli::Program;

/// Main entry point for the user-secret CLI application.
///
/// Command failures are reported by [`Program::run`] itself; the exit code is
/// passed through unchanged.
fn main() -> ExitCode {
    if let Err(err) = color_eyre::install() {
        eprintln!("{}", err);
    }

    let program = Program::new(&HostRuntime::current());
    ExitCode::from(program.run(std::env::args_os()))
}
