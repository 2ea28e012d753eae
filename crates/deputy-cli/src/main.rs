//! deputy CLI - command-line client for the Deputy workforce API
//!
//! Thin entry point: all behavior lives in [`deputy_cli::App`].

use std::process::ExitCode;

use deputy_cli::App;

#[tokio::main]
async fn main() -> ExitCode {
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    App::from_env()
        .run(std::env::args_os(), &mut stdout, &mut stderr)
        .await
        .as_exit_code()
}
