//! 法人番号APIによる法人番号の検索
//!
//! 取引先の法人名と市区町村コードで名前検索し、ヒットした法人ごとに
//! 1レコードを作る（0件なら出力なし、複数件ならその分だけ増える）。

use crate::counterparty::Counterparty;
use crate::error::{InvoiceError, Result};

pub const HOUJIN_API_URL: &str = "https://api.houjin-bangou.nta.go.jp/4/name";

/// 名前検索のリクエスト種別
const REQUEST_TYPE: &str = "12";
/// 変更履歴を含めない
const NO_HISTORY: &str = "0";

/// 法人番号APIで得た法人1件分のレコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorporateRecord {
    /// 取引先一覧のID（元の行に遡れるよう引き継ぐ）
    pub id: String,
    pub corporate_number: String,
    pub name: String,
    /// 都道府県名＋市区町村名＋丁目番地等を区切りなしで連結した住所
    pub address: String,
    pub registration: Option<Registration>,
}

/// インボイスの登録番号と登録年月日
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub number: String,
    pub date: String,
}

/// 検索結果
#[derive(Debug)]
pub struct ResolveOutcome {
    pub records: Vec<CorporateRecord>,
    /// 法人番号が1件も見つからなかった取引先の (ID, 法人名)
    ///
    /// 同名の取引先を区別できるようIDも持ち回す。
    pub unmatched: Vec<(String, String)>,
}

/// XMLレスポンス中のcorporation要素1つ分
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Corporation {
    pub corporate_number: String,
    pub name: String,
    pub address: String,
}

/// 取引先ごとに法人番号APIへ名前検索をかける
///
/// `url` は通常 [`HOUJIN_API_URL`]。リクエストは1件ずつ順番に送る
/// （並列化しない）。ステータスが2xx以外なら即エラーで打ち切る。
pub async fn resolve_corporate_numbers(
    client: &reqwest::Client,
    url: &str,
    counterparties: &[Counterparty],
    application_id: &str,
    verbose: bool,
) -> Result<ResolveOutcome> {
    let mut records = Vec::new();
    let mut unmatched = Vec::new();

    for counterparty in counterparties {
        let region_code = counterparty.region_code.as_deref().unwrap_or_default();
        if verbose {
            println!("  検索中: {} (住所コード: {})", counterparty.name, region_code);
        }

        let response = client
            .get(url)
            .query(&[
                ("id", application_id),
                ("type", REQUEST_TYPE),
                ("history", NO_HISTORY),
                ("name", counterparty.name.as_str()),
                ("address", region_code),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(InvoiceError::HoujinApi(response.status().as_u16()));
        }

        let body = response.text().await?;
        let corporations = parse_corporations(&body)?;

        if corporations.is_empty() {
            unmatched.push((counterparty.id.clone(), counterparty.name.clone()));
        }
        for corporation in corporations {
            records.push(CorporateRecord {
                id: counterparty.id.clone(),
                corporate_number: corporation.corporate_number,
                name: corporation.name,
                address: corporation.address,
                registration: None,
            });
        }
    }

    Ok(ResolveOutcome { records, unmatched })
}

/// レスポンスXMLからcorporation要素をすべて取り出す
pub(crate) fn parse_corporations(xml: &str) -> Result<Vec<Corporation>> {
    let document =
        roxmltree::Document::parse(xml).map_err(|e| InvoiceError::XmlParse(e.to_string()))?;

    let mut corporations = Vec::new();
    for node in document
        .descendants()
        .filter(|n| n.has_tag_name("corporation"))
    {
        let child_text = |tag: &str| {
            node.children()
                .find(|c| c.has_tag_name(tag))
                .and_then(|c| c.text())
                .unwrap_or("")
                .to_string()
        };

        let address = format!(
            "{}{}{}",
            child_text("prefectureName"),
            child_text("cityName"),
            child_text("streetNumber")
        );
        corporations.push(Corporation {
            corporate_number: child_text("corporateNumber"),
            name: child_text("name"),
            address,
        });
    }

    Ok(corporations)
}
