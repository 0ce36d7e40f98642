use clap::Parser;
use std::process::ExitCode;

use hard75_lib::presentation::{runner, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match runner::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("command failed: {}", e);
            if json {
                println!("{}", serde_json::to_string(&e).unwrap_or_default());
            } else {
                eprintln!("{}", e);
            }
            ExitCode::FAILURE
        }
    }
}
