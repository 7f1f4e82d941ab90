use std::process::ExitCode;

use clap::Parser;

use gemini_mcp::cli::{self, Cli};
use gemini_mcp::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = logging::init(cli.verbose, cli.log_file.as_deref());

    match cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("✗ {e}");
            ExitCode::FAILURE
        }
    }
}
