// ==========================================
// 海运整柜定价系统 - SOC 港口使用费调整引擎
// ==========================================
// 适用范围: 白名单船司 + RoutingNote 含 SOC 的记录
// 档位: 20 尺柜族走 20DC 档，40GP/40HQ 走 40HC 档；
//       45HQ / 40NOR 不参与调整
// 城市键: 最长包含匹配，失败退回 "(" 或 "," 前缀
// 查不到城市或无费用 -> 按 0 处理，不剔除记录
// ==========================================

use crate::domain::rate::RateRecord;
use crate::domain::types::ContainerType;
use tracing::debug;

/// SOC 调整适用的船司白名单
pub const SOC_CARRIERS: &[&str] = &["CMA", "ONE", "YML"];

/// 船司是否在 SOC 白名单内（精确匹配，大小写不敏感）
pub fn is_soc_carrier(carrier: &str) -> bool {
    let upper = carrier.trim().to_uppercase();
    SOC_CARRIERS.iter().any(|c| upper == *c)
}

/// 调整方向：入表时扣减 / 报价整合时加回
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PucAdjustment {
    Deduct,
    Add,
}

// ==========================================
// PUC 参考表
// ==========================================
#[derive(Debug, Clone)]
pub struct PucEntry {
    /// 城市键（已大写去空白）
    pub city_key: String,
    pub charge_20: Option<f64>,
    pub charge_40: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct PucTable {
    entries: Vec<PucEntry>,
}

impl PucTable {
    pub fn from_entries(entries: Vec<PucEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 解析 PlaceOfDelivery 的城市键
    ///
    /// (a) 对已知城市做包含匹配，取最长命中
    /// (b) 无命中时退回 "(" 或 "," 之前的前缀
    pub fn resolve_city_key(&self, place_of_delivery: &str) -> String {
        let up = place_of_delivery.trim().to_uppercase();
        if up.is_empty() {
            return String::new();
        }

        let mut best: Option<&str> = None;
        for entry in &self.entries {
            if up.contains(&entry.city_key) {
                match best {
                    Some(current) if current.len() >= entry.city_key.len() => {}
                    _ => best = Some(&entry.city_key),
                }
            }
        }
        if let Some(city) = best {
            return city.to_string();
        }

        let base = up.split('(').next().unwrap_or(&up);
        let base = base.split(',').next().unwrap_or(base);
        base.trim().to_string()
    }

    /// 按柜型档位取费用（45HQ/40NOR/冷柜 -> None）
    pub fn charge_for(&self, city_key: &str, container: ContainerType) -> Option<f64> {
        let entry = self.entries.iter().find(|e| e.city_key == city_key)?;
        if container.is_20_class() {
            entry.charge_20
        } else if container.is_40_class() {
            entry.charge_40
        } else {
            None
        }
    }
}

/// 对长表记录批量应用 PUC 调整
///
/// 仅白名单船司 + SOC 行生效；其余记录原样通过。
pub fn apply_port_use_charge(
    records: Vec<RateRecord>,
    puc_table: &PucTable,
    adjustment: PucAdjustment,
) -> Vec<RateRecord> {
    if puc_table.is_empty() {
        return records;
    }

    records
        .into_iter()
        .map(|mut record| {
            let is_soc_row = is_soc_carrier(&record.carrier)
                && record
                    .routing_note
                    .as_deref()
                    .map(|n| n.to_uppercase().contains("SOC"))
                    .unwrap_or(false);
            if !is_soc_row {
                return record;
            }

            let city_key = puc_table.resolve_city_key(&record.place_of_delivery);
            let charge = puc_table
                .charge_for(&city_key, record.container_type)
                .unwrap_or(0.0);

            if charge != 0.0 {
                debug!(
                    carrier = %record.carrier,
                    city = %city_key,
                    container = %record.container_type,
                    charge,
                    "PUC 调整"
                );
            }

            match adjustment {
                PucAdjustment::Deduct => record.amount -= charge,
                PucAdjustment::Add => record.amount += charge,
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RateType;

    fn table() -> PucTable {
        PucTable::from_entries(vec![
            PucEntry {
                city_key: "LOS ANGELES".into(),
                charge_20: Some(100.0),
                charge_40: Some(150.0),
            },
            PucEntry {
                city_key: "LONG BEACH".into(),
                charge_20: Some(120.0),
                charge_40: None,
            },
        ])
    }

    fn soc_record(container: ContainerType, carrier: &str) -> RateRecord {
        RateRecord {
            pol: "HCM".into(),
            pod: "USLAX".into(),
            place_of_delivery: "LOS ANGELES, CA (RAMP)".into(),
            routing_note: Some("VIA SOC".into()),
            carrier: carrier.into(),
            effective_date: None,
            expiration_date: None,
            contract_identifier: None,
            commodity_type: None,
            container_type: container,
            amount: 2000.0,
            rate_type: RateType::Fak,
            source_file: "FAK_TEST.xlsx".into(),
        }
    }

    #[test]
    fn test_resolve_city_key_longest_containment() {
        let table = table();
        assert_eq!(
            table.resolve_city_key("LOS ANGELES, CA"),
            "LOS ANGELES".to_string()
        );
        // 无命中时退回 "(" / "," 前缀
        assert_eq!(table.resolve_city_key("CHICAGO (RAMP)"), "CHICAGO".to_string());
        assert_eq!(table.resolve_city_key("DALLAS, TX"), "DALLAS".to_string());
    }

    #[test]
    fn test_add_adjustment_on_soc_rows() {
        let out = apply_port_use_charge(
            vec![soc_record(ContainerType::Gp20, "ONE")],
            &table(),
            PucAdjustment::Add,
        );
        assert_eq!(out[0].amount, 2100.0);
    }

    #[test]
    fn test_deduct_adjustment() {
        let out = apply_port_use_charge(
            vec![soc_record(ContainerType::Hq40, "CMA")],
            &table(),
            PucAdjustment::Deduct,
        );
        assert_eq!(out[0].amount, 1850.0); // 40HC 档 150
    }

    #[test]
    fn test_45_class_excluded() {
        let out = apply_port_use_charge(
            vec![soc_record(ContainerType::Hq45, "ONE")],
            &table(),
            PucAdjustment::Add,
        );
        assert_eq!(out[0].amount, 2000.0);
    }

    #[test]
    fn test_non_listed_carrier_untouched() {
        let out = apply_port_use_charge(
            vec![soc_record(ContainerType::Gp20, "MSC")],
            &table(),
            PucAdjustment::Add,
        );
        assert_eq!(out[0].amount, 2000.0);
    }

    #[test]
    fn test_missing_charge_treated_as_zero() {
        let mut rec = soc_record(ContainerType::Hq40, "YML");
        rec.place_of_delivery = "LONG BEACH".into(); // 40HC 档缺失
        let out = apply_port_use_charge(vec![rec], &table(), PucAdjustment::Add);
        assert_eq!(out[0].amount, 2000.0);
    }

    #[test]
    fn test_coc_row_untouched() {
        let mut rec = soc_record(ContainerType::Gp20, "ONE");
        rec.routing_note = Some("DIRECT".into());
        let out = apply_port_use_charge(vec![rec], &table(), PucAdjustment::Add);
        assert_eq!(out[0].amount, 2000.0);
    }
}
