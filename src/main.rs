use clap::Parser;
use invoice_lookup::{cli, config, error, pipeline};

use cli::Cli;
use config::Config;
use error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // .envがあれば読み込む（なければ環境変数のみ）
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;

    pipeline::run(&config).await
}
