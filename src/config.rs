use crate::cli::Cli;
use crate::error::{InvoiceError, Result};
use std::path::PathBuf;

/// パイプライン全体に渡す実行設定
#[derive(Debug, Clone)]
pub struct Config {
    pub application_id: String,
    pub input_path: PathBuf,
    pub sheet_name: String,
    pub output_path: PathBuf,
    pub error_report_path: PathBuf,
    pub timeout_seconds: u64,
    pub verbose: bool,
}

impl Config {
    /// CLI引数と環境変数から設定を組み立てる
    ///
    /// アプリケーションIDは環境変数 `APPLICATION_ID` から取得する
    /// （`.env` の読み込みはmain側で済ませておくこと）。
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let application_id =
            std::env::var("APPLICATION_ID").map_err(|_| InvoiceError::MissingApplicationId)?;

        if application_id.trim().is_empty() {
            return Err(InvoiceError::MissingApplicationId);
        }

        Ok(Self {
            application_id,
            input_path: cli.input.clone(),
            sheet_name: cli.sheet.clone(),
            output_path: cli.output.clone(),
            error_report_path: cli.error_report.clone(),
            timeout_seconds: cli.timeout,
            verbose: cli.verbose,
        })
    }
}
