//! 結果リストのExcel出力
//!
//! 列は全レコードを走査して最初に現れた順に並べる。登録番号・登録年月日は
//! 登録済みのレコードが1件もなければ列自体が出力されない。

use crate::counterparty::ID_COLUMN;
use crate::error::{InvoiceError, Result};
use crate::houjin::CorporateRecord;
use indexmap::IndexMap;
use rust_xlsxwriter::Workbook;
use std::path::Path;

pub const CORPORATE_NUMBER_COLUMN: &str = "法人番号";
pub const NAME_COLUMN: &str = "法人名";
pub const ADDRESS_COLUMN: &str = "住所";
pub const REGISTRATION_NUMBER_COLUMN: &str = "登録番号";
pub const REGISTRATION_DATE_COLUMN: &str = "登録年月日";

/// 最終レコードをExcelに書き出す
pub fn write_invoice_workbook(records: &[CorporateRecord], path: &Path) -> Result<()> {
    let rows: Vec<IndexMap<String, String>> = records.iter().map(to_row).collect();
    let columns = discover_columns(&rows);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in columns.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, name)
            .map_err(|e| InvoiceError::ExcelGeneration(e.to_string()))?;
    }
    for (row_index, row) in rows.iter().enumerate() {
        for (col, name) in columns.iter().enumerate() {
            if let Some(value) = row.get(name) {
                worksheet
                    .write_string((row_index + 1) as u32, col as u16, value)
                    .map_err(|e| InvoiceError::ExcelGeneration(e.to_string()))?;
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| InvoiceError::ExcelGeneration(e.to_string()))?;

    Ok(())
}

fn to_row(record: &CorporateRecord) -> IndexMap<String, String> {
    let mut row = IndexMap::new();
    row.insert(ID_COLUMN.to_string(), record.id.clone());
    row.insert(
        CORPORATE_NUMBER_COLUMN.to_string(),
        record.corporate_number.clone(),
    );
    row.insert(NAME_COLUMN.to_string(), record.name.clone());
    row.insert(ADDRESS_COLUMN.to_string(), record.address.clone());
    if let Some(registration) = &record.registration {
        row.insert(
            REGISTRATION_NUMBER_COLUMN.to_string(),
            registration.number.clone(),
        );
        row.insert(
            REGISTRATION_DATE_COLUMN.to_string(),
            registration.date.clone(),
        );
    }
    row
}

/// 全行を走査して列名を初出順に集める
fn discover_columns(rows: &[IndexMap<String, String>]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::houjin::Registration;

    fn record(id: &str, registered: bool) -> CorporateRecord {
        CorporateRecord {
            id: id.to_string(),
            corporate_number: "1234567890123".to_string(),
            name: "Acme Inc".to_string(),
            address: "TokyoChiyoda1-1".to_string(),
            registration: registered.then(|| Registration {
                number: "T1234567890123".to_string(),
                date: "2023-10-01".to_string(),
            }),
        }
    }

    #[test]
    fn test_columns_in_discovery_order() {
        // 登録情報のない行が先でも、登録列は基本4列の後ろに現れる
        let rows: Vec<_> = [record("1", false), record("2", true)]
            .iter()
            .map(to_row)
            .collect();
        let columns = discover_columns(&rows);

        assert_eq!(
            columns,
            vec![
                ID_COLUMN,
                CORPORATE_NUMBER_COLUMN,
                NAME_COLUMN,
                ADDRESS_COLUMN,
                REGISTRATION_NUMBER_COLUMN,
                REGISTRATION_DATE_COLUMN,
            ]
        );
    }

    #[test]
    fn test_registration_columns_absent_when_unregistered() {
        let rows: Vec<_> = [record("1", false), record("2", false)]
            .iter()
            .map(to_row)
            .collect();
        let columns = discover_columns(&rows);

        assert_eq!(columns.len(), 4);
        assert!(!columns.iter().any(|c| c == REGISTRATION_NUMBER_COLUMN));
    }

    #[test]
    fn test_to_row_values() {
        let row = to_row(&record("1", true));
        assert_eq!(row.get(ID_COLUMN).unwrap(), "1");
        assert_eq!(row.get(CORPORATE_NUMBER_COLUMN).unwrap(), "1234567890123");
        assert_eq!(row.get(REGISTRATION_DATE_COLUMN).unwrap(), "2023-10-01");
    }
}
