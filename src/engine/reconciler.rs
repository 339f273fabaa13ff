// ==========================================
// 海运整柜定价系统 - Master 整合引擎
// ==========================================
// 职责: 全量长表 -> (Master 现行宽表, Old_Rate 历史宽表)
// 步骤:
// 1. 按 航线+船司+合约+货种+表类型+柜型 分组
// 2. 组内按 EffectiveDate/ExpirationDate 排序定序
// 3. current = ExpirationDate 为空或 >= cutoff（include_expired 则全量）
// 4. previous = 同组内紧邻前一期的 Amount
// 5. 长转宽透视（同键同柜型冲突取先到者）
// 6. 按柜型计算环比变动并分类
// 不变式: 历史只增不改；空输入 -> 空输出（不报错）
// ==========================================

use crate::domain::rate::{MasterRow, MasterTables, PivotKey, RateDelta, RateRecord, SequenceKey};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::warn;

/// 组内排序键：缺失日期排在最后（视为最新一期）
fn chrono_sort_key(record: &RateRecord) -> (bool, Option<NaiveDate>, bool, Option<NaiveDate>) {
    (
        record.effective_date.is_none(),
        record.effective_date,
        record.expiration_date.is_none(),
        record.expiration_date,
    )
}

/// 带前一期价格的长表记录
#[derive(Debug, Clone)]
struct SequencedRecord {
    record: RateRecord,
    previous_amount: Option<f64>,
}

/// 分组 + 定序 + 取前一期价格
fn sequence_records(records: Vec<RateRecord>) -> Vec<SequencedRecord> {
    let mut groups: BTreeMap<SequenceKey, Vec<RateRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.sequence_key()).or_default().push(record);
    }

    let mut sequenced = Vec::new();
    for (_, mut group) in groups {
        group.sort_by(|a, b| chrono_sort_key(a).cmp(&chrono_sort_key(b)));

        let mut previous: Option<f64> = None;
        for record in group {
            let amount = record.amount;
            sequenced.push(SequencedRecord {
                record,
                previous_amount: previous,
            });
            previous = Some(amount);
        }
    }
    sequenced
}

/// 长转宽透视
///
/// with_delta = true 时按 previous_amount 填充环比变动。
/// 同键同柜型冲突取先到者；金额不一致时记 WARN 暴露歧义。
fn pivot_wide(items: &[SequencedRecord], with_delta: bool) -> Vec<MasterRow> {
    let mut wide: BTreeMap<PivotKey, MasterRow> = BTreeMap::new();

    for item in items {
        let record = &item.record;
        let key = record.pivot_key();

        let row = wide.entry(key).or_insert_with(|| MasterRow {
            pol: record.pol.clone(),
            pod: record.pod.clone(),
            place_of_delivery: record.place_of_delivery.clone(),
            routing_note: record.routing_note.clone(),
            carrier: record.carrier.clone(),
            effective_date: record.effective_date,
            expiration_date: record.expiration_date,
            contract_identifier: record.contract_identifier.clone(),
            commodity_type: record.commodity_type.clone(),
            rate_type: record.rate_type,
            rates: BTreeMap::new(),
            deltas: BTreeMap::new(),
        });

        if let Some(existing) = row.rates.get(&record.container_type) {
            if (existing - record.amount).abs() > f64::EPSILON {
                warn!(
                    pol = %record.pol,
                    place = %record.place_of_delivery,
                    carrier = %record.carrier,
                    container = %record.container_type,
                    kept = existing,
                    dropped = record.amount,
                    "透视键冲突: 同键同柜型出现不同价格, 保留先到者"
                );
            }
            continue;
        }

        row.rates.insert(record.container_type, record.amount);
        if with_delta {
            if let Some(previous) = item.previous_amount {
                row.deltas.insert(
                    record.container_type,
                    RateDelta::classify(record.amount, previous),
                );
            }
        }
    }

    wide.into_values().collect()
}

/// Master 整合入口
///
/// 返回 (current, history)：current 为现行 Master 宽表，
/// history 为全量历史宽表（无环比、无有效期过滤）。
pub fn reconcile(
    records: Vec<RateRecord>,
    cutoff_date: NaiveDate,
    include_expired: bool,
) -> MasterTables {
    if records.is_empty() {
        return MasterTables::default();
    }

    let sequenced = sequence_records(records);

    // Old_Rate: 全量历史
    let history = pivot_wide(&sequenced, false);

    // Master: 有效期过滤后的现行视图
    let current_items: Vec<SequencedRecord> = sequenced
        .into_iter()
        .filter(|item| {
            if include_expired {
                return true;
            }
            match item.record.expiration_date {
                None => true,
                Some(exp) => exp >= cutoff_date,
            }
        })
        .collect();

    let current = pivot_wide(&current_items, true);

    MasterTables { current, history }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ContainerType, DeltaDirection, RateType};

    fn record(
        container: ContainerType,
        amount: f64,
        eff: Option<&str>,
        exp: Option<&str>,
    ) -> RateRecord {
        RateRecord {
            pol: "HCM".into(),
            pod: "USLAX".into(),
            place_of_delivery: "LOS ANGELES".into(),
            routing_note: None,
            carrier: "CMA".into(),
            effective_date: eff.map(|d| d.parse().unwrap()),
            expiration_date: exp.map(|d| d.parse().unwrap()),
            contract_identifier: Some("C1".into()),
            commodity_type: Some("FAK".into()),
            container_type: container,
            amount,
            rate_type: RateType::Fak,
            source_file: "FAK_TEST.xlsx".into(),
        }
    }

    fn cutoff() -> NaiveDate {
        "2025-12-10".parse().unwrap()
    }

    #[test]
    fn test_empty_input_yields_empty_tables() {
        let tables = reconcile(Vec::new(), cutoff(), false);
        assert!(tables.current.is_empty());
        assert!(tables.history.is_empty());
    }

    #[test]
    fn test_expired_rows_only_in_history() {
        let expired = record(
            ContainerType::Gp40,
            2400.0,
            Some("2025-11-01"),
            Some("2025-11-30"),
        );
        let current = record(
            ContainerType::Gp40,
            2500.0,
            Some("2025-12-01"),
            Some("2025-12-31"),
        );
        let tables = reconcile(vec![expired, current], cutoff(), false);

        assert_eq!(tables.current.len(), 1);
        assert_eq!(
            tables.current[0].effective_date,
            Some("2025-12-01".parse().unwrap())
        );
        // 历史保留两期
        assert_eq!(tables.history.len(), 2);
    }

    #[test]
    fn test_include_expired_disables_filter() {
        let expired = record(
            ContainerType::Gp40,
            2400.0,
            Some("2025-11-01"),
            Some("2025-11-30"),
        );
        let tables = reconcile(vec![expired], cutoff(), true);
        assert_eq!(tables.current.len(), 1);
    }

    #[test]
    fn test_delta_against_previous_period() {
        let older = record(
            ContainerType::Gp40,
            2400.0,
            Some("2025-11-01"),
            Some("2025-11-30"),
        );
        let newer = record(
            ContainerType::Gp40,
            2500.0,
            Some("2025-12-01"),
            Some("2025-12-31"),
        );
        let tables = reconcile(vec![newer, older], cutoff(), false);

        assert_eq!(tables.current.len(), 1);
        let delta = tables.current[0]
            .deltas
            .get(&ContainerType::Gp40)
            .expect("delta present");
        assert_eq!(delta.direction, DeltaDirection::Increase);
        assert_eq!(delta.magnitude, 100.0);
    }

    #[test]
    fn test_first_period_has_no_delta() {
        let only = record(
            ContainerType::Gp40,
            2500.0,
            Some("2025-12-01"),
            Some("2025-12-31"),
        );
        let tables = reconcile(vec![only], cutoff(), false);
        assert!(tables.current[0].deltas.is_empty());
    }

    #[test]
    fn test_pivot_merges_containers_into_one_row() {
        let r20 = record(
            ContainerType::Gp20,
            2000.0,
            Some("2025-12-01"),
            Some("2025-12-31"),
        );
        let r40 = record(
            ContainerType::Gp40,
            2500.0,
            Some("2025-12-01"),
            Some("2025-12-31"),
        );
        let tables = reconcile(vec![r20, r40], cutoff(), false);

        assert_eq!(tables.current.len(), 1);
        let row = &tables.current[0];
        assert_eq!(row.rate(ContainerType::Gp20), Some(2000.0));
        assert_eq!(row.rate(ContainerType::Gp40), Some(2500.0));
    }

    #[test]
    fn test_pivot_collision_first_wins() {
        let first = record(
            ContainerType::Gp40,
            2500.0,
            Some("2025-12-01"),
            Some("2025-12-31"),
        );
        let mut second = record(
            ContainerType::Gp40,
            2600.0,
            Some("2025-12-01"),
            Some("2025-12-31"),
        );
        second.source_file = "FAK_OTHER.xlsx".into();

        let tables = reconcile(vec![first, second], cutoff(), false);
        assert_eq!(tables.current.len(), 1);
        assert_eq!(tables.current[0].rate(ContainerType::Gp40), Some(2500.0));
    }

    #[test]
    fn test_missing_expiration_always_current() {
        let open_ended = record(ContainerType::Gp40, 2500.0, Some("2025-01-01"), None);
        let tables = reconcile(vec![open_ended], cutoff(), false);
        assert_eq!(tables.current.len(), 1);
    }
}
