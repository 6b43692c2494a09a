use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("アプリケーションIDが設定されていません。環境変数 APPLICATION_ID を設定してください")]
    MissingApplicationId,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("シートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error("Excel読み込みエラー: {0}")]
    ExcelLoad(String),

    #[error("必須列がありません: {0}")]
    MissingColumn(String),

    #[error("郵便番号データの取得がエラーです: {0}")]
    ReferenceDownload(u16),

    #[error("郵便番号データの解凍エラー: {0}")]
    ZipDecode(String),

    #[error("CSV処理エラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("法人番号APIがエラーです: {0}")]
    HoujinApi(u16),

    #[error("インボイスAPIがエラーです: {0}")]
    InvoiceApi(u16),

    #[error("HTTPリクエストエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML解析エラー: {0}")]
    XmlParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
