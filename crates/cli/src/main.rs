mod cli;
mod commands;
mod error;
mod output;

// Linked for their `#[agentry_agent]` registrations.
use plugin_currency_exchange as _;
use plugin_dog_facts as _;
use plugin_weather as _;

use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();
    if let Err(e) = commands::dispatch(cli).await {
        error::display_error(&e);
        std::process::exit(1);
    }
}
