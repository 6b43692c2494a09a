//! 郵便番号→市区町村コードの参照テーブル取得
//!
//! 日本郵便の ken_all.zip（住所の郵便番号）と jigyosyo.zip（事業所の個別郵便番号）を
//! ダウンロードし、ZIP内のCP932 CSVから市区町村コードと郵便番号の2列だけを取り出す。

use crate::error::{InvoiceError, Result};
use encoding_rs::SHIFT_JIS;
use std::io::{Cursor, Read};

/// 住所の郵便番号データ
pub const KEN_ALL_URL: &str = "https://www.post.japanpost.jp/zipcode/dl/oogaki/zip/ken_all.zip";
/// 事業所の個別郵便番号データ
pub const JIGYOSYO_URL: &str = "https://www.post.japanpost.jp/zipcode/dl/jigyosyo/zip/jigyosyo.zip";

/// ken_all.csv の郵便番号の列番号
pub const KEN_ALL_POSTAL_COLUMN: usize = 2;
/// jigyosyo.csv の郵便番号の列番号
pub const JIGYOSYO_POSTAL_COLUMN: usize = 7;

/// 市区町村コードと郵便番号の組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub region_code: String,
    pub postal_code: String,
}

/// 参照データをダウンロードしてデコードする
///
/// ステータスが2xx以外のときはエラーを返す（リトライはしない）。
pub async fn fetch_reference_table(
    client: &reqwest::Client,
    url: &str,
    postal_column: usize,
) -> Result<Vec<ReferenceEntry>> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(InvoiceError::ReferenceDownload(response.status().as_u16()));
    }

    let bytes = response.bytes().await?;
    decode_reference_zip(&bytes, postal_column)
}

/// ZIPアーカイブの先頭エントリをCP932 CSVとして読み、2列だけを取り出す
///
/// 列0が市区町村コード、`postal_column` が郵便番号。CSVはヘッダなし。
pub fn decode_reference_zip(bytes: &[u8], postal_column: usize) -> Result<Vec<ReferenceEntry>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| InvoiceError::ZipDecode(e.to_string()))?;

    if archive.is_empty() {
        return Err(InvoiceError::ZipDecode("アーカイブが空です".into()));
    }

    let mut file = archive
        .by_index(0)
        .map_err(|e| InvoiceError::ZipDecode(e.to_string()))?;

    let mut raw = Vec::new();
    file.read_to_end(&mut raw)?;

    parse_reference_csv(&raw, postal_column)
}

fn parse_reference_csv(raw: &[u8], postal_column: usize) -> Result<Vec<ReferenceEntry>> {
    let (text, _, _) = SHIFT_JIS.decode(raw);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        entries.push(ReferenceEntry {
            region_code: record.get(0).unwrap_or("").to_string(),
            postal_code: record.get(postal_column).unwrap_or("").to_string(),
        });
    }

    Ok(entries)
}
