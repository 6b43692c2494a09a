//! インボイスAPIによる登録番号・登録年月日の付加
//!
//! 法人番号の先頭に「T」を付けて1件ずつ照会し、公表情報があれば
//! 先頭のannouncementから登録番号と登録年月日をレコードに書き込む。

use crate::error::{InvoiceError, Result};
use crate::houjin::{CorporateRecord, Registration};
use serde::{Deserialize, Deserializer};

pub const INVOICE_API_URL: &str = "https://web-api.invoice-kohyo.nta.go.jp/1/num";

/// 登録番号を指定して取得するリクエスト種別
const REQUEST_TYPE: &str = "21";

/// インボイスAPIのレスポンス
///
/// countは実APIでは文字列で返ってくるため、数値・文字列の両方を受ける。
#[derive(Debug, Deserialize)]
pub struct InvoiceResponse {
    #[serde(deserialize_with = "count_from_number_or_string", default)]
    pub count: u64,
    #[serde(default)]
    pub announcement: Vec<Announcement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Announcement {
    #[serde(rename = "registratedNumber")]
    pub registrated_number: String,
    #[serde(rename = "registrationDate")]
    pub registration_date: String,
}

fn count_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// レコードごとにインボイスAPIへ照会して登録情報を付加する
///
/// `url` は通常 [`INVOICE_API_URL`]。公表情報がないレコード（count=0）は
/// そのまま通す。入力と同じ件数・同じ順序のリストを返す。
pub async fn augment_registrations(
    client: &reqwest::Client,
    url: &str,
    mut records: Vec<CorporateRecord>,
    application_id: &str,
    verbose: bool,
) -> Result<Vec<CorporateRecord>> {
    for record in &mut records {
        let number = format!("T{}", record.corporate_number);
        if verbose {
            println!("  照会中: {} ({})", record.name, number);
        }

        let response = client
            .get(url)
            .query(&[
                ("id", application_id),
                ("number", number.as_str()),
                ("type", REQUEST_TYPE),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(InvoiceError::InvoiceApi(response.status().as_u16()));
        }

        let body = response.text().await?;
        let parsed = parse_invoice_response(&body)?;
        apply_registration(record, &parsed);
    }

    Ok(records)
}

pub(crate) fn parse_invoice_response(body: &str) -> Result<InvoiceResponse> {
    Ok(serde_json::from_str(body)?)
}

/// 公表情報があれば先頭のannouncementで登録情報を上書きする
pub(crate) fn apply_registration(record: &mut CorporateRecord, response: &InvoiceResponse) {
    if response.count == 0 {
        return;
    }
    if let Some(announcement) = response.announcement.first() {
        record.registration = Some(Registration {
            number: announcement.registrated_number.clone(),
            date: announcement.registration_date.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(corporate_number: &str) -> CorporateRecord {
        CorporateRecord {
            id: "1".to_string(),
            corporate_number: corporate_number.to_string(),
            name: "Acme Inc".to_string(),
            address: "TokyoChiyoda1-1".to_string(),
            registration: None,
        }
    }

    #[test]
    fn test_count_zero_passes_through() {
        // 実APIに合わせてcountは文字列
        let response = parse_invoice_response(r#"{"count": "0", "divide_number": "1"}"#).unwrap();
        assert_eq!(response.count, 0);

        let mut rec = record("1234567890123");
        apply_registration(&mut rec, &response);
        assert!(rec.registration.is_none());
    }

    #[test]
    fn test_registration_is_attached_from_first_announcement() {
        let body = r#"{
            "count": "1",
            "announcement": [
                {"registratedNumber": "T1234567890123", "registrationDate": "2023-10-01"}
            ]
        }"#;
        let response = parse_invoice_response(body).unwrap();

        let mut rec = record("1234567890123");
        apply_registration(&mut rec, &response);

        let registration = rec.registration.unwrap();
        assert_eq!(registration.number, "T1234567890123");
        assert_eq!(registration.date, "2023-10-01");
    }

    #[test]
    fn test_apply_registration_is_idempotent() {
        let body = r#"{
            "count": "1",
            "announcement": [
                {"registratedNumber": "T1234567890123", "registrationDate": "2023-10-01"}
            ]
        }"#;
        let response = parse_invoice_response(body).unwrap();

        let mut rec = record("1234567890123");
        apply_registration(&mut rec, &response);
        let first = rec.registration.clone();
        apply_registration(&mut rec, &response);

        assert_eq!(rec.registration, first);
    }

    #[test]
    fn test_count_as_json_number_is_accepted() {
        let body = r#"{
            "count": 2,
            "announcement": [
                {"registratedNumber": "T1111111111111", "registrationDate": "2023-10-01"},
                {"registratedNumber": "T2222222222222", "registrationDate": "2023-11-01"}
            ]
        }"#;
        let response = parse_invoice_response(body).unwrap();
        assert_eq!(response.count, 2);

        // 先頭のannouncementだけを使う
        let mut rec = record("1111111111111");
        apply_registration(&mut rec, &response);
        assert_eq!(rec.registration.unwrap().number, "T1111111111111");
    }

    #[test]
    fn test_nonzero_count_without_announcement_keeps_none() {
        let response = parse_invoice_response(r#"{"count": "1"}"#).unwrap();
        let mut rec = record("1234567890123");
        apply_registration(&mut rec, &response);
        assert!(rec.registration.is_none());
    }

    #[test]
    fn test_invalid_count_text_is_error() {
        let result = parse_invoice_response(r#"{"count": "abc"}"#);
        assert!(matches!(result, Err(InvoiceError::JsonParse(_))));
    }
}
