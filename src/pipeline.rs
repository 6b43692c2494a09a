//! パイプライン本体
//!
//! 参照データ取得→取引先読み込み→法人番号検索→インボイス照会→Excel出力を
//! この順で直列に実行する。途中のエラーはそのまま上に返し、出力は書かない。

use crate::config::Config;
use crate::error::Result;
use crate::{counterparty, export, houjin, invoice, reference};
use std::time::Duration;

pub async fn run(config: &Config) -> Result<()> {
    println!("🧾 invoice-lookup - 取引先インボイス情報取得\n");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()?;

    // 1. 郵便番号→市区町村コードの参照テーブル
    println!("[1/5] 郵便番号データを取得中...");
    let mut table = reference::fetch_reference_table(
        &client,
        reference::KEN_ALL_URL,
        reference::KEN_ALL_POSTAL_COLUMN,
    )
    .await?;
    let jigyosyo = reference::fetch_reference_table(
        &client,
        reference::JIGYOSYO_URL,
        reference::JIGYOSYO_POSTAL_COLUMN,
    )
    .await?;
    table.extend(jigyosyo);
    println!("✔ {}件の郵便番号を取得\n", table.len());

    // 2. 取引先一覧の読み込みと市区町村コードの結合
    println!("[2/5] 取引先一覧を読み込み中...");
    let counterparties = counterparty::load_counterparties(&config.input_path, &config.sheet_name)?;
    let outcome = counterparty::join_region_codes(counterparties, &table);
    if !outcome.unmatched.is_empty() {
        counterparty::write_error_report(&outcome.unmatched, &config.error_report_path)?;
        println!(
            "市区町村コードが存在しない法人がありました。{}を確認してください。",
            config.error_report_path.display()
        );
    }
    println!("✔ {}件の取引先を読み込み\n", outcome.matched.len());

    // 3. 法人番号の検索
    println!("[3/5] 法人番号を検索中...");
    let resolved = houjin::resolve_corporate_numbers(
        &client,
        houjin::HOUJIN_API_URL,
        &outcome.matched,
        &config.application_id,
        config.verbose,
    )
    .await?;
    for (id, name) in &resolved.unmatched {
        println!("⚠ 法人番号が見つかりませんでした: {} (ID: {})", name, id);
    }
    println!("✔ {}件の法人番号を取得\n", resolved.records.len());

    // 4. インボイス登録情報の照会
    println!("[4/5] インボイス登録情報を取得中...");
    let records = invoice::augment_registrations(
        &client,
        invoice::INVOICE_API_URL,
        resolved.records,
        &config.application_id,
        config.verbose,
    )
    .await?;
    println!("✔ 照会完了\n");

    // 5. Excel出力
    println!("[5/5] 結果を出力中...");
    export::write_invoice_workbook(&records, &config.output_path)?;
    println!("✔ 出力: {}", config.output_path.display());

    println!("\n✅ 完了しました");
    Ok(())
}
