//! 取引先一覧の読み込みと市区町村コードの結合
//!
//! Excelのセルはすべて文字列として扱う（郵便番号などの識別子が
//! 数値化されて桁落ちするのを避けるため）。

use crate::error::{InvoiceError, Result};
use crate::reference::ReferenceEntry;
use calamine::{open_workbook, Data, Reader, Xlsx};
use encoding_rs::SHIFT_JIS;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;

pub const ID_COLUMN: &str = "ID";
pub const NAME_COLUMN: &str = "法人名";
pub const POSTAL_CODE_COLUMN: &str = "郵便番号";
pub const REGION_CODE_COLUMN: &str = "市区町村コード";

/// 取引先1件分のレコード
///
/// `extras` は必須3列以外の列を元の順序のまま持ち回す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterparty {
    pub id: String,
    pub name: String,
    pub postal_code: String,
    pub extras: IndexMap<String, String>,
    pub region_code: Option<String>,
}

/// 結合結果
///
/// `unmatched` は市区町村コードが引けなかった行（エラー.csv行き）。
#[derive(Debug)]
pub struct JoinOutcome {
    pub matched: Vec<Counterparty>,
    pub unmatched: Vec<Counterparty>,
}

/// 取引先一覧シートを読み込む
pub fn load_counterparties(path: &Path, sheet_name: &str) -> Result<Vec<Counterparty>> {
    if !path.exists() {
        return Err(InvoiceError::FileNotFound(path.display().to_string()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e: calamine::XlsxError| InvoiceError::ExcelLoad(e.to_string()))?;
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|_| InvoiceError::SheetNotFound(sheet_name.to_string()))?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| InvoiceError::ExcelLoad(format!("シートが空です: {}", sheet_name)))?;
    let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();

    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| InvoiceError::MissingColumn(name.to_string()))
    };
    let id_index = column_index(ID_COLUMN)?;
    let name_index = column_index(NAME_COLUMN)?;
    let postal_index = column_index(POSTAL_CODE_COLUMN)?;

    let mut counterparties = Vec::new();
    for row in rows {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }

        let mut extras = IndexMap::new();
        for (index, header) in headers.iter().enumerate() {
            if index == id_index || index == name_index || index == postal_index {
                continue;
            }
            if header.is_empty() {
                continue;
            }
            extras.insert(header.clone(), cells.get(index).cloned().unwrap_or_default());
        }

        counterparties.push(Counterparty {
            id: cells.get(id_index).cloned().unwrap_or_default(),
            name: cells.get(name_index).cloned().unwrap_or_default(),
            postal_code: cells.get(postal_index).cloned().unwrap_or_default(),
            extras,
            region_code: None,
        });
    }

    Ok(counterparties)
}

/// 郵便番号をキーに参照テーブルと左外部結合する
///
/// 同じ郵便番号に複数の市区町村コードがあるときは、その数だけ行を複製する。
/// 一致しない行は `unmatched` に回す（`region_code` はNoneのまま）。
pub fn join_region_codes(
    counterparties: Vec<Counterparty>,
    reference: &[ReferenceEntry],
) -> JoinOutcome {
    let mut region_codes: HashMap<&str, Vec<&str>> = HashMap::new();
    for entry in reference {
        region_codes
            .entry(entry.postal_code.as_str())
            .or_default()
            .push(entry.region_code.as_str());
    }

    let mut matched = Vec::new();
    let mut unmatched = Vec::new();
    for counterparty in counterparties {
        match region_codes.get(counterparty.postal_code.as_str()) {
            Some(codes) => {
                for code in codes {
                    let mut copy = counterparty.clone();
                    copy.region_code = Some(code.to_string());
                    matched.push(copy);
                }
            }
            None => unmatched.push(counterparty),
        }
    }

    JoinOutcome { matched, unmatched }
}

/// 市区町村コードが引けなかった取引先をCP932のCSVに書き出す
///
/// Excelでそのまま開けるようCP932で出力する。
pub fn write_error_report(counterparties: &[Counterparty], path: &Path) -> Result<()> {
    let mut header: Vec<&str> = vec![ID_COLUMN, NAME_COLUMN, POSTAL_CODE_COLUMN];
    if let Some(first) = counterparties.first() {
        header.extend(first.extras.keys().map(|k| k.as_str()));
    }
    header.push(REGION_CODE_COLUMN);

    let mut buffer = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(&header)?;
        for counterparty in counterparties {
            let mut record: Vec<&str> = vec![
                &counterparty.id,
                &counterparty.name,
                &counterparty.postal_code,
            ];
            record.extend(counterparty.extras.values().map(|v| v.as_str()));
            record.push(""); // 市区町村コードは未解決
            writer.write_record(&record)?;
        }
        writer.flush()?;
    }

    let text = String::from_utf8_lossy(&buffer);
    let (encoded, _, _) = SHIFT_JIS.encode(&text);
    std::fs::write(path, &encoded)?;

    Ok(())
}

/// セルを文字列化する
///
/// 整数値として読まれた数値は小数点なしで表記する（郵便番号対策）。
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Int(i) => i.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
