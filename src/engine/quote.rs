// ==========================================
// 海运整柜定价系统 - 报价引擎
// ==========================================
// 职责: Master 快照 -> 过滤 -> 计价 -> 排序 -> 选项列表
// 结构: 有序纯过滤阶段流水线；任一阶段清空候选集即
//       短路返回带阶段信息的业务失败码（绝不抛异常）
// 选择策略:
// - 未指定船司: 每船司取最便宜一行，再全局取前 5
// - 指定船司  : 不做每船司去重，全局取前 max_options
// ==========================================

use crate::domain::quote::{
    ContainerBreakdown, ContainerPlanItem, CostPreview, CostPreviewRow, QuoteDebugInfo,
    QuoteEvaluation, QuoteFailure, QuoteOption, QuoteRequest, QuoteSummary, ShipmentRequest,
};
use crate::domain::rate::MasterRow;
use crate::domain::types::{CommodityFilter, ContainerType, QuoteErrorCode};
use crate::engine::schedule::ScheduleIndex;
use chrono::NaiveDate;
use std::collections::HashMap;

// ==========================================
// 过滤阶段（纯函数，逐级收窄）
// ==========================================

fn stage_pol(rows: Vec<MasterRow>, pol: &str) -> Result<Vec<MasterRow>, QuoteFailure> {
    let pol_upper = pol.trim().to_uppercase();
    let rows: Vec<MasterRow> = rows
        .into_iter()
        .filter(|row| row.pol.trim().to_uppercase() == pol_upper)
        .collect();
    if rows.is_empty() {
        return Err(QuoteFailure::no_rate(format!(
            "未找到 POL = {} 的价格行。",
            pol
        )));
    }
    Ok(rows)
}

fn stage_place(rows: Vec<MasterRow>, place: &str) -> Result<Vec<MasterRow>, QuoteFailure> {
    let place_key = place.trim().to_uppercase();
    let rows: Vec<MasterRow> = rows
        .into_iter()
        .filter(|row| row.place_of_delivery.to_uppercase().contains(&place_key))
        .collect();
    if rows.is_empty() {
        return Err(QuoteFailure::no_rate(format!(
            "没有 PlaceOfDelivery 包含 {} 的价格行。",
            place
        )));
    }
    Ok(rows)
}

fn stage_pod(rows: Vec<MasterRow>, shipment: &ShipmentRequest) -> Result<Vec<MasterRow>, QuoteFailure> {
    let Some(pod) = shipment.pod.as_deref().map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(rows);
    };
    let pod_key = pod.to_uppercase();
    let rows: Vec<MasterRow> = rows
        .into_iter()
        .filter(|row| row.pod.to_uppercase().contains(&pod_key))
        .collect();
    if rows.is_empty() {
        return Err(QuoteFailure::no_rate(format!(
            "PlaceOfDelivery='{}' 下没有 POD 包含 {} 的价格行。",
            shipment.place_of_delivery, pod
        )));
    }
    Ok(rows)
}

fn stage_commodity(rows: Vec<MasterRow>, commodity: &str) -> Result<Vec<MasterRow>, QuoteFailure> {
    let filter = CommodityFilter::from_request(commodity);
    if filter == CommodityFilter::Any {
        return Ok(rows);
    }
    let rows: Vec<MasterRow> = rows
        .into_iter()
        .filter(|row| {
            let commodity_upper = row
                .commodity_type
                .as_deref()
                .unwrap_or_default()
                .to_uppercase();
            filter.matches(&commodity_upper)
        })
        .collect();
    if rows.is_empty() {
        return Err(QuoteFailure::no_rate(format!(
            "没有 CommodityType = {} 且满足其余条件的价格行。",
            commodity
        )));
    }
    Ok(rows)
}

fn stage_soc(rows: Vec<MasterRow>, exclude_soc: bool) -> Result<Vec<MasterRow>, QuoteFailure> {
    if !exclude_soc {
        return Ok(rows);
    }
    let rows: Vec<MasterRow> = rows
        .into_iter()
        .filter(|row| {
            !row.routing_note
                .as_deref()
                .unwrap_or_default()
                .to_uppercase()
                .contains("SOC")
        })
        .collect();
    if rows.is_empty() {
        return Err(QuoteFailure::no_rate("剔除 SOC 后没有剩余价格行。"));
    }
    Ok(rows)
}

fn stage_carriers(
    rows: Vec<MasterRow>,
    preferred: &[String],
    excluded: &[String],
) -> Result<Vec<MasterRow>, QuoteFailure> {
    let mut rows = rows;

    if !preferred.is_empty() {
        let pref: Vec<String> = preferred.iter().map(|c| c.trim().to_uppercase()).collect();
        rows.retain(|row| pref.contains(&row.carrier.trim().to_uppercase()));
        if rows.is_empty() {
            return Err(QuoteFailure::no_rate(format!(
                "没有属于指定船司 {:?} 的价格行。",
                preferred
            )));
        }
    }

    if !excluded.is_empty() {
        let excl: Vec<String> = excluded.iter().map(|c| c.trim().to_uppercase()).collect();
        rows.retain(|row| !excl.contains(&row.carrier.trim().to_uppercase()));
        if rows.is_empty() {
            return Err(QuoteFailure::no_rate("所有价格行均属于被排除的船司。"));
        }
    }

    Ok(rows)
}

fn stage_validity(
    rows: Vec<MasterRow>,
    cargo_ready: Option<NaiveDate>,
) -> Result<Vec<MasterRow>, QuoteFailure> {
    let Some(cargo_day) = cargo_ready else {
        return Ok(rows);
    };
    // 无失效日期的行永远有效
    let rows: Vec<MasterRow> = rows
        .into_iter()
        .filter(|row| match row.expiration_date {
            None => true,
            Some(exp) => exp >= cargo_day,
        })
        .collect();
    if rows.is_empty() {
        return Err(QuoteFailure::no_rate(format!(
            "货好日 {} 之后没有仍然有效的价格行。",
            cargo_day
        )));
    }
    Ok(rows)
}

// ==========================================
// 计价
// ==========================================

/// 柜型基础单价（冷柜回退: 20RF -> 20GP, 40RF -> 40HQ -> 40GP）
fn base_rate(row: &MasterRow, container: ContainerType) -> Option<f64> {
    match container {
        ContainerType::Rf20 => [ContainerType::Rf20, ContainerType::Gp20]
            .iter()
            .find_map(|c| row.rate(*c)),
        ContainerType::Rf40 => [ContainerType::Rf40, ContainerType::Hq40, ContainerType::Gp40]
            .iter()
            .find_map(|c| row.rate(*c)),
        other => row.rate(other),
    }
}

/// 含 mark-up 实际单价
fn effective_rate(
    row: &MasterRow,
    container: ContainerType,
    markup_map: &HashMap<String, f64>,
) -> Option<f64> {
    let base = base_rate(row, container)?;
    let extra = markup_map
        .get(&row.carrier.trim().to_uppercase())
        .copied()
        .unwrap_or(0.0);
    Some(base + extra)
}

/// 整计划总价；任一柜型缺价 -> None
fn compute_total(
    row: &MasterRow,
    containers: &[ContainerPlanItem],
    markup_map: &HashMap<String, f64>,
) -> Option<f64> {
    let mut total = 0.0;
    for item in containers {
        let rate = effective_rate(row, item.container_type, markup_map)?;
        total += rate * f64::from(item.quantity);
    }
    Some(total)
}

/// 按总价升序排序（同价按船司名稳定排序）
fn sort_by_total(rows: &mut Vec<(MasterRow, f64)>) {
    rows.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.carrier.cmp(&b.0.carrier))
    });
}

/// 每船司保留最便宜一行
fn cheapest_per_carrier(rows: Vec<(MasterRow, f64)>) -> Vec<(MasterRow, f64)> {
    let mut best: HashMap<String, (MasterRow, f64)> = HashMap::new();
    for (row, total) in rows {
        let key = row.carrier.trim().to_uppercase();
        match best.get(&key) {
            Some((_, existing)) if *existing <= total => {}
            _ => {
                best.insert(key, (row, total));
            }
        }
    }
    best.into_values().collect()
}

fn containers_summary(containers: &[ContainerPlanItem]) -> String {
    containers
        .iter()
        .map(|item| format!("{} x {}", item.quantity, item.container_type))
        .collect::<Vec<_>>()
        .join(", ")
}

/// RateType + RoutingNote 拼备注
fn build_notes(row: &MasterRow) -> String {
    let mut parts = vec![row.rate_type.to_string()];
    if let Some(routing) = row.routing_note.as_deref() {
        let trimmed = routing.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }
    parts.join(" / ")
}

// ==========================================
// 报价入口
// ==========================================

/// 核心报价计算
///
/// 返回未盖章的评估结果（报价号/报价日期由 API 层补）。
pub fn generate_quote(
    master: &[MasterRow],
    schedule: &ScheduleIndex,
    request: &QuoteRequest,
    today: NaiveDate,
) -> Result<QuoteEvaluation, QuoteFailure> {
    let shipment = &request.shipment;
    let options_cfg = &request.engine_options;

    if shipment.place_of_delivery.trim().is_empty() {
        return Err(QuoteFailure {
            error: QuoteErrorCode::MissingPlaceOfDelivery,
            message: "Place of Delivery 为必填项。".to_string(),
        });
    }

    let markup_map = options_cfg.normalized_markup();

    // ---- 过滤流水线 ----
    let rows = stage_pol(master.to_vec(), &shipment.pol)?;
    let rows = stage_place(rows, &shipment.place_of_delivery)?;
    let rows = stage_pod(rows, shipment)?;
    let rows = stage_commodity(rows, &shipment.commodity_type)?;
    let rows = stage_soc(rows, shipment.is_soc_excluded)?;
    let rows = stage_carriers(
        rows,
        &options_cfg.preferred_carriers,
        &options_cfg.excluded_carriers,
    )?;
    let rows = stage_validity(rows, shipment.cargo_ready_date)?;
    let rows_after_filters = rows.len();

    // ---- 计划完备性 + 计价 ----
    let mut priced: Vec<(MasterRow, f64)> = rows
        .into_iter()
        .filter_map(|row| {
            compute_total(&row, &request.containers, &markup_map).map(|total| (row, total))
        })
        .collect();
    let rows_with_full_rates = priced.len();
    if priced.is_empty() {
        return Err(QuoteFailure {
            error: QuoteErrorCode::NoValidRateForPlan,
            message: "没有任何价格行能覆盖柜型计划中的所有柜型。".to_string(),
        });
    }

    // ---- 选择策略 ----
    let selected: Vec<(MasterRow, f64)> = if options_cfg.preferred_carriers.is_empty() {
        let mut per_carrier = cheapest_per_carrier(priced);
        sort_by_total(&mut per_carrier);
        per_carrier.into_iter().take(5).collect()
    } else {
        sort_by_total(&mut priced);
        let max_n = options_cfg.max_options_per_quote.max(1);
        priced.into_iter().take(max_n).collect()
    };

    // ---- 组装选项 ----
    let mut options = Vec::new();
    for (index, (row, total)) in selected.iter().enumerate() {
        let option_index = index + 1;

        let mut container_rates = std::collections::BTreeMap::new();
        let mut container_plan = Vec::new();
        for item in &request.containers {
            // 完备性已过滤，此处必有价
            let Some(unit_rate) = effective_rate(row, item.container_type, &markup_map) else {
                continue;
            };
            container_rates.insert(item.container_type, unit_rate);
            container_plan.push(ContainerBreakdown {
                container_type: item.container_type,
                quantity: item.quantity,
                unit_rate,
                amount: unit_rate * f64::from(item.quantity),
            });
        }

        // 船期缺失 = "schedule unknown"，不影响选项本身
        let schedule_result = schedule.get_schedule_for(
            &row.carrier,
            &shipment.pol,
            &row.pod,
            shipment.cargo_ready_date,
            today,
        );

        options.push(QuoteOption {
            index: option_index,
            is_recommended: option_index == 1,
            carrier: row.carrier.clone(),
            rate_type: row.rate_type,
            pol: row.pol.clone(),
            pod: row.pod.clone(),
            place_of_delivery: row.place_of_delivery.clone(),
            contract_identifier: row.contract_identifier.clone(),
            commodity_type: row.commodity_type.clone(),
            valid_from: row.effective_date,
            valid_to: row.expiration_date,
            container_rates,
            container_plan,
            total_ocean_amount: *total,
            currency: options_cfg.currency.clone(),
            schedule: schedule_result,
            notes: build_notes(row),
        });
    }

    let summary = QuoteSummary {
        customer_name: request.customer.name.clone(),
        customer_email: request.customer.email.clone(),
        contact_person: request.customer.contact_person.clone(),
        sales_person: request.customer.sales_person.clone(),
        route: format!("{} → {}", shipment.pol, shipment.place_of_delivery),
        pol: shipment.pol.clone(),
        pod: shipment.pod.clone(),
        place_of_delivery: shipment.place_of_delivery.clone(),
        containers_summary: containers_summary(&request.containers),
        incoterm: shipment.incoterm.clone(),
        commodity_type: shipment.commodity_type.clone(),
        is_soc_excluded: shipment.is_soc_excluded,
        currency: options_cfg.currency.clone(),
    };

    let debug = QuoteDebugInfo {
        rows_after_filters,
        rows_with_full_rates,
        rows_returned: options.len(),
    };

    Ok(QuoteEvaluation {
        summary,
        options,
        debug,
    })
}

// ==========================================
// 成本预览（内部口径，不含 mark-up）
// ==========================================

/// 每船司最便宜基础成本预览
///
/// 过滤口径与报价一致（POL/Place/POD/货种/SOC），不做
/// 船司偏好/排除与有效期过滤，不设 TOP 上限。
pub fn preview_cost_by_carrier(
    master: &[MasterRow],
    shipment: &ShipmentRequest,
    containers: &[ContainerPlanItem],
) -> Result<CostPreview, QuoteFailure> {
    if shipment.place_of_delivery.trim().is_empty() {
        return Err(QuoteFailure {
            error: QuoteErrorCode::MissingPlaceOfDelivery,
            message: "Place of Delivery 为必填项。".to_string(),
        });
    }

    let rows = stage_pol(master.to_vec(), &shipment.pol)?;
    let rows = stage_place(rows, &shipment.place_of_delivery)?;
    let rows = stage_pod(rows, shipment)?;
    let rows = stage_commodity(rows, &shipment.commodity_type)?;
    let rows = stage_soc(rows, shipment.is_soc_excluded)?;
    let rows_after_filters = rows.len();

    let no_markup = HashMap::new();
    let priced: Vec<(MasterRow, f64)> = rows
        .into_iter()
        .filter_map(|row| compute_total(&row, containers, &no_markup).map(|total| (row, total)))
        .collect();
    let rows_with_full_rates = priced.len();
    if priced.is_empty() {
        return Err(QuoteFailure {
            error: QuoteErrorCode::NoValidRateForPlan,
            message: "没有任何价格行能覆盖柜型计划中的所有柜型。".to_string(),
        });
    }

    let mut per_carrier = cheapest_per_carrier(priced);
    sort_by_total(&mut per_carrier);

    let rows: Vec<CostPreviewRow> = per_carrier
        .into_iter()
        .map(|(row, total)| CostPreviewRow {
            carrier: row.carrier.clone(),
            total_base: total,
            pol: row.pol.clone(),
            pod: row.pod.clone(),
            place_of_delivery: row.place_of_delivery.clone(),
            rate_type: row.rate_type,
            contract_identifier: row.contract_identifier.clone(),
            commodity_type: row.commodity_type.clone(),
            valid_from: row.effective_date,
            valid_to: row.expiration_date,
            routing_note: row.routing_note.clone(),
        })
        .collect();

    let debug = QuoteDebugInfo {
        rows_after_filters,
        rows_with_full_rates,
        rows_returned: rows.len(),
    };

    Ok(CostPreview { rows, debug })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::{CustomerInfo, EngineOptions};
    use crate::domain::types::RateType;
    use std::collections::BTreeMap;

    fn master_row(carrier: &str, rates: &[(ContainerType, f64)]) -> MasterRow {
        MasterRow {
            pol: "HCM".into(),
            pod: "USLAX".into(),
            place_of_delivery: "LOS ANGELES, CA".into(),
            routing_note: None,
            carrier: carrier.into(),
            effective_date: None,
            expiration_date: None,
            contract_identifier: Some("C1".into()),
            commodity_type: Some("FAK".into()),
            rate_type: RateType::Fak,
            rates: rates.iter().copied().collect::<BTreeMap<_, _>>(),
            deltas: BTreeMap::new(),
        }
    }

    fn request(shipment: ShipmentRequest, containers: Vec<ContainerPlanItem>) -> QuoteRequest {
        QuoteRequest {
            customer: CustomerInfo {
                name: "Sorachi Logistics Co., Ltd".into(),
                ..CustomerInfo::default()
            },
            shipment,
            containers,
            engine_options: EngineOptions::default(),
        }
    }

    fn today() -> NaiveDate {
        "2025-12-01".parse().unwrap()
    }

    #[test]
    fn test_hand_computed_total_with_markup() {
        // POL=HCM, Place=LOS ANGELES, 1 x 40HQ @ 2500, markup 50 => 2550
        let master = vec![master_row("CMA", &[(ContainerType::Hq40, 2500.0)])];
        let mut req = request(
            ShipmentRequest::new("HCM", "LOS ANGELES"),
            vec![ContainerPlanItem::new(ContainerType::Hq40, 1)],
        );
        req.engine_options
            .markup_per_carrier
            .insert("CMA".into(), 50.0);

        let eval = generate_quote(&master, &ScheduleIndex::default(), &req, today()).unwrap();
        assert_eq!(eval.options.len(), 1);
        assert_eq!(eval.options[0].total_ocean_amount, 2550.0);
        assert_eq!(
            eval.options[0].container_rates.get(&ContainerType::Hq40),
            Some(&2550.0)
        );
        assert!(eval.options[0].is_recommended);
    }

    #[test]
    fn test_missing_place_of_delivery() {
        let master = vec![master_row("CMA", &[(ContainerType::Hq40, 2500.0)])];
        let req = request(
            ShipmentRequest::new("HCM", "  "),
            vec![ContainerPlanItem::new(ContainerType::Hq40, 1)],
        );
        let err = generate_quote(&master, &ScheduleIndex::default(), &req, today()).unwrap_err();
        assert_eq!(err.error, QuoteErrorCode::MissingPlaceOfDelivery);
    }

    #[test]
    fn test_no_rate_for_unknown_place() {
        let master = vec![master_row("CMA", &[(ContainerType::Hq40, 2500.0)])];
        let req = request(
            ShipmentRequest::new("HCM", "HOUSTON"),
            vec![ContainerPlanItem::new(ContainerType::Hq40, 1)],
        );
        let err = generate_quote(&master, &ScheduleIndex::default(), &req, today()).unwrap_err();
        assert_eq!(err.error, QuoteErrorCode::NoRateFound);
        assert!(err.message.contains("HOUSTON"));
    }

    #[test]
    fn test_per_carrier_dedupe_and_top5() {
        // 6 家船司各两行，应各留最便宜一行且最多 5 个选项
        let mut master = Vec::new();
        for (idx, carrier) in ["CMA", "ONE", "YML", "HPL", "EMC", "MSC"].iter().enumerate() {
            master.push(master_row(
                carrier,
                &[(ContainerType::Hq40, 2000.0 + idx as f64 * 100.0)],
            ));
            master.push(master_row(
                carrier,
                &[(ContainerType::Hq40, 3000.0 + idx as f64 * 100.0)],
            ));
        }

        let req = request(
            ShipmentRequest::new("HCM", "LOS ANGELES"),
            vec![ContainerPlanItem::new(ContainerType::Hq40, 1)],
        );
        let eval = generate_quote(&master, &ScheduleIndex::default(), &req, today()).unwrap();

        assert_eq!(eval.options.len(), 5);
        // 每船司只出现一次
        let mut carriers: Vec<&str> = eval.options.iter().map(|o| o.carrier.as_str()).collect();
        carriers.dedup();
        assert_eq!(carriers.len(), 5);
        // 升序排列且推荐第一
        assert!(eval
            .options
            .windows(2)
            .all(|w| w[0].total_ocean_amount <= w[1].total_ocean_amount));
        assert!(eval.options[0].is_recommended);
        assert!(!eval.options[1].is_recommended);
    }

    #[test]
    fn test_preferred_carriers_skip_dedupe() {
        let master = vec![
            master_row("CMA", &[(ContainerType::Hq40, 2000.0)]),
            master_row("CMA", &[(ContainerType::Hq40, 2100.0)]),
            master_row("ONE", &[(ContainerType::Hq40, 1900.0)]),
        ];
        let mut req = request(
            ShipmentRequest::new("HCM", "LOS ANGELES"),
            vec![ContainerPlanItem::new(ContainerType::Hq40, 1)],
        );
        req.engine_options.preferred_carriers = vec!["CMA".into()];
        req.engine_options.max_options_per_quote = 2;

        let eval = generate_quote(&master, &ScheduleIndex::default(), &req, today()).unwrap();
        assert_eq!(eval.options.len(), 2);
        assert!(eval.options.iter().all(|o| o.carrier == "CMA"));
    }

    #[test]
    fn test_excluded_carriers_removed() {
        let master = vec![
            master_row("CMA", &[(ContainerType::Hq40, 2000.0)]),
            master_row("ONE", &[(ContainerType::Hq40, 1900.0)]),
        ];
        let mut req = request(
            ShipmentRequest::new("HCM", "LOS ANGELES"),
            vec![ContainerPlanItem::new(ContainerType::Hq40, 1)],
        );
        req.engine_options.excluded_carriers = vec!["one".into()];

        let eval = generate_quote(&master, &ScheduleIndex::default(), &req, today()).unwrap();
        assert_eq!(eval.options.len(), 1);
        assert_eq!(eval.options[0].carrier, "CMA");
    }

    #[test]
    fn test_soc_exclusion() {
        let mut soc_row = master_row("ONE", &[(ContainerType::Hq40, 1800.0)]);
        soc_row.routing_note = Some("VIA SOC".into());
        let master = vec![soc_row, master_row("CMA", &[(ContainerType::Hq40, 2000.0)])];

        let mut shipment = ShipmentRequest::new("HCM", "LOS ANGELES");
        shipment.is_soc_excluded = true;
        let req = request(shipment, vec![ContainerPlanItem::new(ContainerType::Hq40, 1)]);

        let eval = generate_quote(&master, &ScheduleIndex::default(), &req, today()).unwrap();
        assert_eq!(eval.options.len(), 1);
        assert_eq!(eval.options[0].carrier, "CMA");
    }

    #[test]
    fn test_validity_filter_by_cargo_ready() {
        let mut expiring = master_row("CMA", &[(ContainerType::Hq40, 1800.0)]);
        expiring.expiration_date = Some("2025-12-05".parse().unwrap());
        let mut open = master_row("ONE", &[(ContainerType::Hq40, 2000.0)]);
        open.expiration_date = None;
        let master = vec![expiring, open];

        let mut shipment = ShipmentRequest::new("HCM", "LOS ANGELES");
        shipment.cargo_ready_date = Some("2025-12-10".parse().unwrap());
        let req = request(shipment, vec![ContainerPlanItem::new(ContainerType::Hq40, 1)]);

        let eval = generate_quote(&master, &ScheduleIndex::default(), &req, today()).unwrap();
        assert_eq!(eval.options.len(), 1);
        assert_eq!(eval.options[0].carrier, "ONE");
    }

    #[test]
    fn test_plan_completeness_reefer_fallback() {
        // 无 40RF 专列 -> 回退 40HQ
        let master = vec![master_row("CMA", &[(ContainerType::Hq40, 3000.0)])];
        let req = request(
            ShipmentRequest::new("HCM", "LOS ANGELES"),
            vec![ContainerPlanItem::new(ContainerType::Rf40, 2)],
        );
        let eval = generate_quote(&master, &ScheduleIndex::default(), &req, today()).unwrap();
        assert_eq!(eval.options[0].total_ocean_amount, 6000.0);
    }

    #[test]
    fn test_no_valid_rate_for_plan() {
        // 只有 20GP 价，计划要 45HQ
        let master = vec![master_row("CMA", &[(ContainerType::Gp20, 2000.0)])];
        let req = request(
            ShipmentRequest::new("HCM", "LOS ANGELES"),
            vec![ContainerPlanItem::new(ContainerType::Hq45, 1)],
        );
        let err = generate_quote(&master, &ScheduleIndex::default(), &req, today()).unwrap_err();
        assert_eq!(err.error, QuoteErrorCode::NoValidRateForPlan);
    }

    #[test]
    fn test_multi_item_plan_total() {
        let master = vec![master_row(
            "CMA",
            &[(ContainerType::Gp20, 2000.0), (ContainerType::Hq40, 2500.0)],
        )];
        let req = request(
            ShipmentRequest::new("HCM", "LOS ANGELES"),
            vec![
                ContainerPlanItem::new(ContainerType::Gp20, 2),
                ContainerPlanItem::new(ContainerType::Hq40, 1),
            ],
        );
        let eval = generate_quote(&master, &ScheduleIndex::default(), &req, today()).unwrap();
        assert_eq!(eval.options[0].total_ocean_amount, 6500.0);
        assert_eq!(eval.summary.containers_summary, "2 x 20GP, 1 x 40HQ");
    }

    #[test]
    fn test_preview_cost_no_markup_per_carrier() {
        let master = vec![
            master_row("CMA", &[(ContainerType::Hq40, 2500.0)]),
            master_row("CMA", &[(ContainerType::Hq40, 2300.0)]),
            master_row("ONE", &[(ContainerType::Hq40, 2400.0)]),
        ];
        let preview = preview_cost_by_carrier(
            &master,
            &ShipmentRequest::new("HCM", "LOS ANGELES"),
            &[ContainerPlanItem::new(ContainerType::Hq40, 1)],
        )
        .unwrap();

        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[0].carrier, "CMA");
        assert_eq!(preview.rows[0].total_base, 2300.0);
        assert_eq!(preview.rows[1].total_base, 2400.0);
    }
}
