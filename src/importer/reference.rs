// ==========================================
// 海运整柜定价系统 - 参考表加载器
// ==========================================
// 参考表（表头驱动，区别于定列运价表）:
// - PUC_SOC: 城市 -> 20DC/40HC 档港口使用费
// - Port_Code_Mapping: 港口名称 -> 港口代码
// - Schedule: 船期表（服务串 + 周列船名）
// ==========================================

use crate::domain::schedule::ScheduleRow;
use crate::engine::puc::{PucEntry, PucTable};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{ExcelGridParser, RawGrid};
use crate::importer::rate_parser::clean_amount;
use std::collections::HashMap;
use std::path::Path;

/// 在表头行中按名称定位列（大小写不敏感）
fn find_column(header: &[String], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|cell| cell.trim().eq_ignore_ascii_case(name))
}

fn load_grid(path: &Path) -> ImportResult<RawGrid> {
    ExcelGridParser.parse_to_grid(path)
}

// ==========================================
// PUC_SOC 参考表
// ==========================================
pub fn load_puc_table(path: &Path) -> ImportResult<PucTable> {
    let grid = load_grid(path)?;
    if grid.is_empty() {
        return Ok(PucTable::default());
    }

    let header = &grid[0];
    let place_col = find_column(header, "PlaceOfDelivery");
    let c20_col = find_column(header, "20DC");
    let c40_col = find_column(header, "40HC");

    let mut missing = Vec::new();
    if place_col.is_none() {
        missing.push("PlaceOfDelivery".to_string());
    }
    if c20_col.is_none() {
        missing.push("20DC".to_string());
    }
    if c40_col.is_none() {
        missing.push("40HC".to_string());
    }
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns {
            file: path.display().to_string(),
            columns: missing,
        });
    }

    let (place_col, c20_col, c40_col) =
        (place_col.unwrap_or(0), c20_col.unwrap_or(0), c40_col.unwrap_or(0));

    let mut entries = Vec::new();
    for row in grid.iter().skip(1) {
        let Some(place) = row.get(place_col).map(|v| v.trim()).filter(|v| !v.is_empty())
        else {
            continue;
        };
        entries.push(PucEntry {
            city_key: place.to_uppercase(),
            charge_20: row.get(c20_col).and_then(|v| clean_amount(v)),
            charge_40: row.get(c40_col).and_then(|v| clean_amount(v)),
        });
    }

    Ok(PucTable::from_entries(entries))
}

// ==========================================
// 港口名称 -> 港口代码映射表
// ==========================================
pub fn load_port_mapping(path: &Path) -> ImportResult<HashMap<String, String>> {
    let grid = load_grid(path)?;
    if grid.is_empty() {
        return Ok(HashMap::new());
    }

    let header = &grid[0];
    let name_col = find_column(header, "PORTNAME").ok_or_else(|| ImportError::MissingColumns {
        file: path.display().to_string(),
        columns: vec!["PORTNAME".to_string()],
    })?;
    let code_col = find_column(header, "PORTCODE").ok_or_else(|| ImportError::MissingColumns {
        file: path.display().to_string(),
        columns: vec!["PORTCODE".to_string()],
    })?;

    let mut mapping = HashMap::new();
    for row in grid.iter().skip(1) {
        let name = row.get(name_col).map(|v| v.trim()).unwrap_or_default();
        let code = row.get(code_col).map(|v| v.trim()).unwrap_or_default();
        if name.is_empty() || code.is_empty() {
            continue;
        }
        mapping.insert(name.to_uppercase(), code.to_string());
    }

    Ok(mapping)
}

// ==========================================
// 船期表
// ==========================================
// CARRIER NAME（退回 CARRIER）/ SERVICE / POD + W 开头的周列
pub fn load_schedule_rows(path: &Path) -> ImportResult<Vec<ScheduleRow>> {
    let grid = load_grid(path)?;
    if grid.is_empty() {
        return Ok(Vec::new());
    }

    let header = &grid[0];
    let carrier_col = find_column(header, "CARRIER NAME")
        .or_else(|| find_column(header, "CARRIER"))
        .ok_or_else(|| ImportError::MissingColumns {
            file: path.display().to_string(),
            columns: vec!["CARRIER NAME".to_string()],
        })?;
    let service_col = find_column(header, "SERVICE").ok_or_else(|| ImportError::MissingColumns {
        file: path.display().to_string(),
        columns: vec!["SERVICE".to_string()],
    })?;
    let pod_col = find_column(header, "POD").ok_or_else(|| ImportError::MissingColumns {
        file: path.display().to_string(),
        columns: vec!["POD".to_string()],
    })?;

    // 周列: 表头以 W 开头，如 "W49 (07 DEC - 13 DEC)"
    let week_cols: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.trim().to_uppercase().starts_with('W'))
        .map(|(idx, cell)| (idx, cell.trim().to_string()))
        .collect();

    let mut rows = Vec::new();
    for row in grid.iter().skip(1) {
        let carrier_raw = row.get(carrier_col).map(|v| v.trim()).unwrap_or_default();
        let service_raw = row.get(service_col).map(|v| v.trim()).unwrap_or_default();
        let pod_raw = row.get(pod_col).map(|v| v.trim()).unwrap_or_default();

        if carrier_raw.is_empty() || service_raw.is_empty() || pod_raw.is_empty() {
            continue;
        }

        let weeks: Vec<(String, String)> = week_cols
            .iter()
            .filter_map(|(idx, label)| {
                let vessel = row.get(*idx).map(|v| v.trim()).unwrap_or_default();
                if vessel.is_empty() || vessel.to_uppercase().starts_with("BLANK") {
                    None
                } else {
                    Some((label.clone(), vessel.to_string()))
                }
            })
            .collect();

        rows.push(ScheduleRow {
            carrier_raw: carrier_raw.to_string(),
            service_raw: service_raw.to_string(),
            pod_raw: pod_raw.to_string(),
            weeks,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_column_case_insensitive() {
        let header = vec![
            "PlaceOfDelivery".to_string(),
            "20DC".to_string(),
            "40HC".to_string(),
        ];
        assert_eq!(find_column(&header, "placeofdelivery"), Some(0));
        assert_eq!(find_column(&header, "40HC"), Some(2));
        assert_eq!(find_column(&header, "45HC"), None);
    }
}
