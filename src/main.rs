//! `install-cli`: download, verify and install the miru CLI.

use clap::Parser;
use miru_install::cli::Cli;
use miru_install::constants::INTERRUPTED_EXIT_CODE;
use miru_install::core::user_friendly_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.init_logging();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // The run future is dropped when select! returns, so its temporary
    // directory is gone before the process exits.
    let result = tokio::select! {
        result = cli.execute() => Some(result),
        Ok(()) = tokio::signal::ctrl_c() => None,
    };

    match result {
        Some(Ok(())) => {}
        Some(Err(e)) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(error_ctx.error.exit_code());
        }
        None => {
            eprintln!("Interrupted");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    }
}
