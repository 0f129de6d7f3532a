//
//  basecamp-cli
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use basecamp_cli::api::ApiError;
use basecamp_cli::auth::MissingSecret;
use basecamp_cli::cli::{Cli, Commands};
use basecamp_cli::exit_codes;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code(&e));
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("BCX_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Maps an error to the process exit code.
fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ApiError>() {
        Some(ApiError::Status { status: 401 | 403, .. }) => exit_codes::AUTH_ERROR,
        Some(ApiError::Status { status: 404, .. }) => exit_codes::NOT_FOUND,
        Some(ApiError::UnsupportedMethod(_)) | Some(ApiError::MissingAccount(_)) => {
            exit_codes::USAGE
        }
        _ if error.downcast_ref::<MissingSecret>().is_some() => exit_codes::AUTH_ERROR,
        _ => exit_codes::ERROR,
    }
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Auth(cmd) => cmd.run(&cli.global).await,
        Commands::Api(cmd) => cmd.run(&cli.global).await,
        Commands::Config(cmd) => cmd.run(&cli.global).await,
        Commands::Completion(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("bcx version {}", basecamp_cli::VERSION);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use basecamp_cli::api::ResponseBody;

    #[test]
    fn test_missing_secret_is_auth_error() {
        let error = Err::<(), _>(MissingSecret::Token("work".to_string()))
            .context("Failed to build client")
            .unwrap_err();
        assert_eq!(exit_code(&error), exit_codes::AUTH_ERROR);
    }

    #[test]
    fn test_exit_code_ignores_message_wording() {
        let error = anyhow::anyhow!("see 'bcx auth login --help'");
        assert_eq!(exit_code(&error), exit_codes::ERROR);
    }

    #[test]
    fn test_status_exit_codes() {
        let not_found = anyhow::Error::new(ApiError::Status {
            status: 404,
            message: "Status: 404".to_string(),
            body: ResponseBody::Empty,
        });
        assert_eq!(exit_code(&not_found), exit_codes::NOT_FOUND);
    }
}
