use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "invoice-lookup")]
#[command(about = "取引先一覧の法人番号・インボイス登録番号取得ツール", long_about = None)]
pub struct Cli {
    /// 取引先一覧のExcelファイル
    #[arg(default_value = "法人番号API.xlsx")]
    pub input: PathBuf,

    /// 取引先一覧のシート名
    #[arg(short, long, default_value = "取引先一覧")]
    pub sheet: String,

    /// 出力Excelファイル
    #[arg(short, long, default_value = "インボイス.xlsx")]
    pub output: PathBuf,

    /// 市区町村コードが引けなかった取引先の出力先CSV
    #[arg(long, default_value = "エラー.csv")]
    pub error_report: PathBuf,

    /// HTTPリクエストのタイムアウト（秒）
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// 詳細ログを出力
    #[arg(short, long)]
    pub verbose: bool,
}
