// ==========================================
// 海运整柜定价系统 - 运价表解析器
// ==========================================
// 职责: 定列提取 + 类型转换 + 宽转长（melt）
// 规则:
// - 金额去千分位逗号，非数字/空白 -> 丢弃该柜型
// - 日期解析失败 -> 按缺失处理（开放有效期），不报错
// - 一行所有柜型金额均无效 -> 整行丢弃
// - FAK/ONE 表自带 PUC 列块：SOC 行按船司白名单入表时扣减
// ==========================================

use crate::domain::rate::RateRecord;
use crate::domain::types::{ContainerType, RateType};
use crate::engine::puc::is_soc_carrier;
use crate::importer::file_parser::RawGrid;
use crate::importer::layout::{layout_for, RateSheetLayout};
use chrono::NaiveDate;

/// 取单元格文本（越界/空白 -> None）
fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn cell_opt(row: &[String], idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| cell(row, i)).map(|v| v.to_string())
}

/// 金额清洗：去逗号/空白，TBA、N/A 等占位符按缺失处理
pub fn clean_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.to_uppercase().as_str() {
        "TBA" | "N/A" | "NA" | "-" => return None,
        _ => {}
    }
    cleaned.parse::<f64>().ok()
}

/// 日期清洗
///
/// 兼容 YYYY-MM-DD / DD/MM/YYYY / YYYYMMDD / DD-MMM-YYYY，
/// 以及 Excel 日期序列号文本。解析失败返回 None。
pub fn parse_date_cell(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // 截掉时间部分（"2025-12-01 00:00:00"）
    let date_part = trimmed.split_whitespace().next().unwrap_or(trimmed);

    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y%m%d", "%d-%b-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(date_part, fmt) {
            return Some(d);
        }
    }

    // Excel 序列号（1899-12-30 起算）
    if let Ok(serial) = date_part.parse::<f64>() {
        if (20_000.0..80_000.0).contains(&serial) {
            let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
            return epoch.checked_add_days(chrono::Days::new(serial as u64));
        }
    }

    None
}

/// 解析单个运价表网格为长表记录
///
/// grid 为原始行列网格（含表头行）；表头行数由版式表决定。
pub fn parse_rate_grid(grid: &RawGrid, rate_type: RateType, source_file: &str) -> Vec<RateRecord> {
    let layout = layout_for(rate_type);

    if grid.len() <= layout.header_rows {
        return Vec::new();
    }

    let mut records = Vec::new();
    for row in grid.iter().skip(layout.header_rows) {
        parse_row(row, layout, source_file, &mut records);
    }
    records
}

fn parse_row(
    row: &[String],
    layout: &RateSheetLayout,
    source_file: &str,
    out: &mut Vec<RateRecord>,
) {
    let pol = cell(row, layout.pol).unwrap_or_default().to_string();
    let pod = cell(row, layout.pod).unwrap_or_default().to_string();

    // 区域表尾部说明行：POL/POD 全空直接跳过
    if pol.is_empty() && pod.is_empty() {
        return;
    }

    let place_of_delivery = cell(row, layout.place_of_delivery)
        .unwrap_or_default()
        .to_string();
    let routing_note = cell_opt(row, layout.routing_note);

    let carrier = match layout.carrier {
        Some(idx) => cell(row, idx).unwrap_or_default().to_string(),
        None => layout.fixed_carrier.unwrap_or_default().to_string(),
    };

    let effective_date = cell(row, layout.effective_date).and_then(parse_date_cell);
    let expiration_date = cell(row, layout.expiration_date).and_then(parse_date_cell);
    let contract_identifier = cell_opt(row, layout.contract);

    // ONE 固定价表：货种统一打 FIX RATE
    let commodity_type = match layout.rate_type {
        RateType::OneSpecialRate => Some("FIX RATE".to_string()),
        _ => cell_opt(row, layout.commodity),
    };

    // 入表时 PUC 扣减（仅 SOC 行 + 白名单船司，45 尺柜族不参与）
    let puc_deduction = layout
        .puc_block
        .filter(|_| row_is_soc(&carrier, routing_note.as_deref()))
        .map(|block| RowPuc {
            c20: cell(row, block.c20).and_then(clean_amount).unwrap_or(0.0),
            c40: cell(row, block.c40).and_then(clean_amount).unwrap_or(0.0),
            c40hq: cell(row, block.c40hq).and_then(clean_amount).unwrap_or(0.0),
        });

    for (container_type, amount_col) in layout.amounts {
        let Some(raw_amount) = cell(row, *amount_col) else {
            continue;
        };
        let Some(mut amount) = clean_amount(raw_amount) else {
            continue;
        };

        if let Some(puc) = &puc_deduction {
            amount -= match container_type {
                ContainerType::Gp20 => puc.c20,
                ContainerType::Gp40 => puc.c40,
                ContainerType::Hq40 => puc.c40hq,
                _ => 0.0,
            };
        }

        out.push(RateRecord {
            pol: pol.clone(),
            pod: pod.clone(),
            place_of_delivery: place_of_delivery.clone(),
            routing_note: routing_note.clone(),
            carrier: carrier.clone(),
            effective_date,
            expiration_date,
            contract_identifier: contract_identifier.clone(),
            commodity_type: commodity_type.clone(),
            container_type: *container_type,
            amount,
            rate_type: layout.rate_type,
            source_file: source_file.to_string(),
        });
    }
}

struct RowPuc {
    c20: f64,
    c40: f64,
    c40hq: f64,
}

fn row_is_soc(carrier: &str, routing_note: Option<&str>) -> bool {
    is_soc_carrier(carrier)
        && routing_note
            .map(|n| n.to_uppercase().contains("SOC"))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fak_row(cols: &[(usize, &str)]) -> Vec<String> {
        let mut row = vec![String::new(); 42];
        for (idx, value) in cols {
            row[*idx] = value.to_string();
        }
        row
    }

    fn fak_grid(rows: Vec<Vec<String>>) -> RawGrid {
        let mut grid = vec![vec![String::new(); 42], vec![String::new(); 42]];
        // 表头占位（定列解析不读表头文字）
        grid[0][0] = "POL".to_string();
        grid.extend(rows);
        grid
    }

    #[test]
    fn test_clean_amount_thousands_separator() {
        assert_eq!(clean_amount("2,500"), Some(2500.0));
        assert_eq!(clean_amount(" 1,234.5 "), Some(1234.5));
        assert_eq!(clean_amount("TBA"), None);
        assert_eq!(clean_amount("abc"), None);
        assert_eq!(clean_amount(""), None);
    }

    #[test]
    fn test_parse_date_cell_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(parse_date_cell("2025-12-01"), Some(expected));
        assert_eq!(parse_date_cell("01/12/2025"), Some(expected));
        assert_eq!(parse_date_cell("20251201"), Some(expected));
        assert_eq!(parse_date_cell("2025-12-01 00:00:00"), Some(expected));
        assert_eq!(parse_date_cell("garbage"), None);
    }

    #[test]
    fn test_parse_fak_grid_melts_per_container() {
        let grid = fak_grid(vec![fak_row(&[
            (0, "HCM"),
            (1, "USLAX"),
            (2, "LOS ANGELES, CA"),
            (5, "CMA"),
            (6, "2025-12-01"),
            (7, "2025-12-14"),
            (9, "FAK"),
            (11, "C123"),
            (12, "2,000"),
            (13, "2,500"),
            (14, "2,600"),
        ])]);

        let records = parse_rate_grid(&grid, RateType::Fak, "FAK_TEST.xlsx");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].container_type, ContainerType::Gp20);
        assert_eq!(records[0].amount, 2000.0);
        assert_eq!(records[1].container_type, ContainerType::Gp40);
        assert_eq!(records[2].amount, 2600.0);
        assert_eq!(records[0].carrier, "CMA");
        assert_eq!(
            records[0].expiration_date,
            NaiveDate::from_ymd_opt(2025, 12, 14)
        );
    }

    #[test]
    fn test_parse_row_without_amounts_dropped() {
        let grid = fak_grid(vec![fak_row(&[
            (0, "HCM"),
            (1, "USLAX"),
            (2, "LOS ANGELES"),
            (5, "CMA"),
            (12, "TBA"),
        ])]);

        let records = parse_rate_grid(&grid, RateType::Fak, "FAK_TEST.xlsx");
        assert!(records.is_empty());
    }

    #[test]
    fn test_bad_date_degrades_to_open_validity() {
        let grid = fak_grid(vec![fak_row(&[
            (0, "HCM"),
            (1, "USLAX"),
            (2, "LOS ANGELES"),
            (5, "CMA"),
            (6, "??"),
            (7, "??"),
            (12, "2000"),
        ])]);

        let records = parse_rate_grid(&grid, RateType::Fak, "FAK_TEST.xlsx");
        assert_eq!(records.len(), 1);
        assert!(records[0].effective_date.is_none());
        assert!(records[0].expiration_date.is_none());
    }

    #[test]
    fn test_ingestion_puc_deduction_for_soc_rows() {
        let grid = fak_grid(vec![fak_row(&[
            (0, "HCM"),
            (1, "USLAX"),
            (2, "LOS ANGELES"),
            (3, "VIA SOC"),
            (5, "ONE"),
            (12, "2000"),
            (13, "2500"),
            (15, "3000"), // 45HQ 不参与扣减
            (38, "100"),
            (39, "150"),
            (41, "999"),
        ])]);

        let records = parse_rate_grid(&grid, RateType::Fak, "FAK_TEST.xlsx");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].amount, 1900.0); // 20GP: 2000 - 100
        assert_eq!(records[1].amount, 2350.0); // 40GP: 2500 - 150
        assert_eq!(records[2].amount, 3000.0); // 45HQ 原价
    }

    #[test]
    fn test_non_soc_row_keeps_raw_amount() {
        let grid = fak_grid(vec![fak_row(&[
            (0, "HCM"),
            (1, "USLAX"),
            (2, "LOS ANGELES"),
            (3, "DIRECT"),
            (5, "ONE"),
            (12, "2000"),
            (38, "100"),
        ])]);

        let records = parse_rate_grid(&grid, RateType::Fak, "FAK_TEST.xlsx");
        assert_eq!(records[0].amount, 2000.0);
    }

    #[test]
    fn test_one_special_rate_forces_fix_rate_commodity() {
        let grid = fak_grid(vec![fak_row(&[
            (0, "HCM"),
            (1, "USNYC"),
            (2, "NEW YORK"),
            (5, "ONE"),
            (12, "3000"),
        ])]);

        let records = parse_rate_grid(&grid, RateType::OneSpecialRate, "ONE_FIX.xlsx");
        assert_eq!(records[0].commodity_type.as_deref(), Some("FIX RATE"));
    }

    #[test]
    fn test_scfi_layout_uses_fixed_carrier() {
        let mut grid: RawGrid = vec![vec![String::new(); 8], vec![String::new(); 8]];
        grid.push(
            ["HPH", "USSEA", "SEATTLE", "2025-12-01", "2025-12-31", "1,800", "2,200", "2,300"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );

        let records = parse_rate_grid(&grid, RateType::HplScfi, "HPL_SCFI.xlsx");
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.carrier == "HPL"));
        assert!(records.iter().all(|r| r.rate_type == RateType::HplScfi));
    }
}
