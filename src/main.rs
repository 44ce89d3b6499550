use anyhow::Result;
use clap::Parser;

use resume_upload::cli::{handle_command, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    handle_command(Cli::parse()).await
}
