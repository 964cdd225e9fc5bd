use anyhow::Result;
use clap::Parser;
use weather_chart::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    weather_chart::run(cli).await
}
