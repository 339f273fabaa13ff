// ==========================================
// 海运整柜定价系统 - Master 工作簿输出
// ==========================================
// 工作表:
// - Master  : 现行宽表 + 每柜型 VIEW 展示列 + 隐藏的 DELTA 数值列
// - Old_Rate: 全量历史宽表（无环比）
// - 版本页  : 版本号 / 行数 / 整理日期 / RAW 文件清单
// 日期在表上渲染为 DD-MMM 大写；不做字体颜色等样式
// ==========================================

use crate::domain::rate::{MasterRow, MasterTables};
use crate::domain::types::MASTER_CONTAINER_ORDER;
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;
use thiserror::Error;

/// 导出层错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Excel 写出失败: {0}")]
    Excel(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

fn xl<T>(result: Result<T, rust_xlsxwriter::XlsxError>) -> ExportResult<T> {
    result.map_err(|e| ExportError::Excel(e.to_string()))
}

const KEY_HEADERS: [&str; 10] = [
    "POL",
    "POD",
    "PlaceOfDelivery",
    "RoutingNote",
    "Carrier",
    "EffectiveDate",
    "ExpirationDate",
    "ContractIdentifier",
    "CommodityType",
    "RateType",
];

/// DD-MMM 大写（表上展示用）
fn short_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d-%b").to_string().to_uppercase(),
        None => String::new(),
    }
}

fn write_key_cells(sheet: &mut Worksheet, row_idx: u32, row: &MasterRow) -> ExportResult<()> {
    xl(sheet.write_string(row_idx, 0, &row.pol))?;
    xl(sheet.write_string(row_idx, 1, &row.pod))?;
    xl(sheet.write_string(row_idx, 2, &row.place_of_delivery))?;
    xl(sheet.write_string(row_idx, 3, row.routing_note.as_deref().unwrap_or("")))?;
    xl(sheet.write_string(row_idx, 4, &row.carrier))?;
    xl(sheet.write_string(row_idx, 5, &short_date(row.effective_date)))?;
    xl(sheet.write_string(row_idx, 6, &short_date(row.expiration_date)))?;
    xl(sheet.write_string(row_idx, 7, row.contract_identifier.as_deref().unwrap_or("")))?;
    xl(sheet.write_string(row_idx, 8, row.commodity_type.as_deref().unwrap_or("")))?;
    xl(sheet.write_string(row_idx, 9, &row.rate_type.to_string()))?;
    Ok(())
}

fn write_master_sheet(sheet: &mut Worksheet, rows: &[MasterRow]) -> ExportResult<()> {
    xl(sheet.set_name("Master"))?;
    let header_format = Format::new().set_bold();

    let container_base = KEY_HEADERS.len() as u16;
    let view_base = container_base + MASTER_CONTAINER_ORDER.len() as u16;
    let delta_base = view_base + MASTER_CONTAINER_ORDER.len() as u16;

    // 表头: 键列 + 柜型价格列 + VIEW 列 + DELTA 数值列
    for (col, header) in KEY_HEADERS.iter().enumerate() {
        xl(sheet.write_string_with_format(0, col as u16, *header, &header_format))?;
    }
    for (offset, container) in MASTER_CONTAINER_ORDER.iter().enumerate() {
        xl(sheet.write_string_with_format(
            0,
            container_base + offset as u16,
            container.to_string(),
            &header_format,
        ))?;
        xl(sheet.write_string_with_format(
            0,
            view_base + offset as u16,
            format!("{}_VIEW", container),
            &header_format,
        ))?;
        xl(sheet.write_string_with_format(
            0,
            delta_base + offset as u16,
            format!("DELTA_{}", container),
            &header_format,
        ))?;
    }

    for (row_offset, row) in rows.iter().enumerate() {
        let row_idx = (row_offset + 1) as u32;
        write_key_cells(sheet, row_idx, row)?;

        for (offset, container) in MASTER_CONTAINER_ORDER.iter().enumerate() {
            if let Some(amount) = row.rate(*container) {
                xl(sheet.write_number(row_idx, container_base + offset as u16, amount))?;
            }
            if let Some(delta) = row.deltas.get(container) {
                xl(sheet.write_string(row_idx, view_base + offset as u16, delta.display()))?;
                xl(sheet.write_number(row_idx, delta_base + offset as u16, delta.value))?;
            }
        }
    }

    // 销售只看 VIEW 列，DELTA 数值列隐藏
    for offset in 0..MASTER_CONTAINER_ORDER.len() {
        xl(sheet.set_column_hidden(delta_base + offset as u16))?;
    }

    xl(sheet.set_column_width(2, 24))?;
    xl(sheet.set_column_width(8, 20))?;
    Ok(())
}

fn write_history_sheet(sheet: &mut Worksheet, rows: &[MasterRow]) -> ExportResult<()> {
    xl(sheet.set_name("Old_Rate"))?;
    let header_format = Format::new().set_bold();

    let container_base = KEY_HEADERS.len() as u16;
    for (col, header) in KEY_HEADERS.iter().enumerate() {
        xl(sheet.write_string_with_format(0, col as u16, *header, &header_format))?;
    }
    for (offset, container) in MASTER_CONTAINER_ORDER.iter().enumerate() {
        xl(sheet.write_string_with_format(
            0,
            container_base + offset as u16,
            container.to_string(),
            &header_format,
        ))?;
    }

    for (row_offset, row) in rows.iter().enumerate() {
        let row_idx = (row_offset + 1) as u32;
        write_key_cells(sheet, row_idx, row)?;
        for (offset, container) in MASTER_CONTAINER_ORDER.iter().enumerate() {
            if let Some(amount) = row.rate(*container) {
                xl(sheet.write_number(row_idx, container_base + offset as u16, amount))?;
            }
        }
    }
    Ok(())
}

fn write_version_sheet(
    sheet: &mut Worksheet,
    version_label: &str,
    history_rows: usize,
    raw_files: &[String],
    today: NaiveDate,
) -> ExportResult<()> {
    xl(sheet.set_name(version_label))?;

    xl(sheet.write_string(0, 0, "价格表版本"))?;
    xl(sheet.write_string(0, 1, version_label))?;
    xl(sheet.write_string(2, 0, "总行数"))?;
    xl(sheet.write_number(2, 1, history_rows as f64))?;
    xl(sheet.write_string(3, 0, "整理日期"))?;
    xl(sheet.write_string(
        3,
        1,
        today.format("%d-%b-%Y").to_string().to_uppercase(),
    ))?;

    for (idx, raw) in raw_files.iter().enumerate() {
        xl(sheet.write_string((5 + idx) as u32, 0, format!("RAW: {}", raw)))?;
    }
    Ok(())
}

/// 写出 Master 工作簿
pub fn write_master_workbook(
    path: &Path,
    tables: &MasterTables,
    version_label: &str,
    raw_files: &[String],
    today: NaiveDate,
) -> ExportResult<()> {
    let mut workbook = Workbook::new();

    let master_sheet = workbook.add_worksheet();
    write_master_sheet(master_sheet, &tables.current)?;

    let history_sheet = workbook.add_worksheet();
    write_history_sheet(history_sheet, &tables.history)?;

    let version_sheet = workbook.add_worksheet();
    write_version_sheet(
        version_sheet,
        version_label,
        tables.history.len(),
        raw_files,
        today,
    )?;

    xl(workbook.save(path))?;
    Ok(())
}

// ==========================================
// 版本号提取
// ==========================================

/// 从最新 FAK 文件名提取版本号
///
/// 'FAK_US CANADA_ 2025 10 DEC NO 2.xlsx' -> '10DECNO2'
/// （大写去空格/下划线后匹配 数字{1,2}+月份缩写+NO+序号）
/// 未命中 -> '<DDMON>.NOX'
pub fn extract_version_from_filename(fname: &str, today: NaiveDate) -> String {
    let name: Vec<char> = fname
        .to_uppercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '_')
        .collect();

    for start in 0..name.len() {
        if let Some(end) = match_version_at(&name, start) {
            return name[start..end].iter().collect();
        }
    }

    format!("{}.NOX", today.format("%d%b").to_string().to_uppercase())
}

/// 在 start 位置尝试匹配 \d{1,2}[A-Z]{3}NO\.?\d+
fn match_version_at(chars: &[char], start: usize) -> Option<usize> {
    for digit_count in [2usize, 1] {
        let mut pos = start;

        // 日数字
        if chars.len() < pos + digit_count
            || !chars[pos..pos + digit_count].iter().all(|c| c.is_ascii_digit())
        {
            continue;
        }
        pos += digit_count;

        // 月份缩写 3 字母
        if chars.len() < pos + 3 || !chars[pos..pos + 3].iter().all(|c| c.is_ascii_alphabetic()) {
            continue;
        }
        pos += 3;

        // NO
        if chars.len() < pos + 2 || chars[pos] != 'N' || chars[pos + 1] != 'O' {
            continue;
        }
        pos += 2;

        // 可选 '.'
        if chars.get(pos) == Some(&'.') {
            pos += 1;
        }

        // 序号
        let mut digits = 0;
        while chars.get(pos + digits).map(|c| c.is_ascii_digit()) == Some(true) {
            digits += 1;
        }
        if digits == 0 {
            continue;
        }
        return Some(pos + digits);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rate::RateDelta;
    use crate::domain::types::{ContainerType, RateType};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        "2025-12-08".parse().unwrap()
    }

    #[test]
    fn test_extract_version_from_filename() {
        assert_eq!(
            extract_version_from_filename("FAK_US CANADA_ 2025 10 DEC NO 2.xlsx", today()),
            "10DECNO2"
        );
        assert_eq!(
            extract_version_from_filename("FAK 7 DEC NO.3.xlsx", today()),
            "7DECNO.3"
        );
        // 未命中 -> 按当日兜底
        assert_eq!(
            extract_version_from_filename("FAK_PLAIN.xlsx", today()),
            "08DEC.NOX"
        );
    }

    #[test]
    fn test_short_date_format() {
        let d: NaiveDate = "2025-12-01".parse().unwrap();
        assert_eq!(short_date(Some(d)), "01-DEC");
        assert_eq!(short_date(None), "");
    }

    #[test]
    fn test_write_master_workbook_smoke() {
        let mut rates = BTreeMap::new();
        rates.insert(ContainerType::Gp40, 2500.0);
        let mut deltas = BTreeMap::new();
        deltas.insert(ContainerType::Gp40, RateDelta::classify(2500.0, 2400.0));

        let row = MasterRow {
            pol: "HCM".into(),
            pod: "USLAX".into(),
            place_of_delivery: "LOS ANGELES".into(),
            routing_note: None,
            carrier: "CMA".into(),
            effective_date: Some("2025-12-01".parse().unwrap()),
            expiration_date: None,
            contract_identifier: None,
            commodity_type: Some("FAK".into()),
            rate_type: RateType::Fak,
            rates,
            deltas,
        };
        let tables = MasterTables {
            current: vec![row.clone()],
            history: vec![row],
        };

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Master_FullPricing.xlsx");
        write_master_workbook(
            &path,
            &tables,
            "10DECNO2",
            &["FAK_TEST.xlsx".to_string()],
            today(),
        )
        .unwrap();
        assert!(path.exists());
    }
}
