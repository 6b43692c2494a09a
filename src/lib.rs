//! 取引先一覧の法人番号・インボイス登録番号取得ツール
//!
//! Excelの取引先一覧を読み込み、郵便番号から市区町村コードを引き当てたうえで
//! 法人番号API・インボイスAPIに順番に問い合わせ、結果をExcelに出力する。

pub mod cli;
pub mod config;
pub mod counterparty;
pub mod error;
pub mod export;
pub mod houjin;
pub mod invoice;
pub mod pipeline;
pub mod reference;
