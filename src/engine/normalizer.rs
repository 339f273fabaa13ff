// ==========================================
// 海运整柜定价系统 - 货种/航线标准化引擎
// ==========================================
// 职责: 把各船司自由文本货种改写为统一口径
// 规则表: 每船司一组有序规则，首个命中即生效；
//         细分规则（如 GROUP A 限定）必须排在其泛化规则之前
// 不变式: 幂等 —— 已标准化的值再跑一遍不得改变
// ==========================================

use crate::domain::rate::RateRecord;
use std::collections::HashMap;

/// 单条货种改写规则：所有 requires 子串（大小写不敏感）命中才生效
#[derive(Debug, Clone, Copy)]
pub struct CommodityRule {
    pub requires: &'static [&'static str],
    pub canonical: &'static str,
}

/// 单船司的有序规则组（carrier_key 为船司名包含匹配）
#[derive(Debug, Clone, Copy)]
pub struct CarrierRuleSet {
    pub carrier_key: &'static str,
    pub rules: &'static [CommodityRule],
}

// YML FAK 完整描述串（GROUP A 限定与泛化规则共用）
const YML_FAK_PATTERN: &str = "FAK (NON-HAZ, EXCLUDING REEFER/ SHIPS/ BOATS/ VEHICLES/ CARS)";

/// 全量货种改写规则表
///
/// 顺序即优先级：YML 的 GROUP A 限定在泛化 FAK 之前，
/// 否则泛化规则抢先命中导致错标。
pub static COMMODITY_RULES: &[CarrierRuleSet] = &[
    CarrierRuleSet {
        carrier_key: "ONE",
        rules: &[
            CommodityRule {
                requires: &["GARMENT"],
                canonical: "FAK: TPE1 - FAK Straight",
            },
            CommodityRule {
                requires: &["FAK: TPE1 - FAK STRAIGHT"],
                canonical: "FAK: TPE1 - FAK Straight",
            },
            CommodityRule {
                requires: &["REEFER FAK"],
                canonical: "REEFER FAK",
            },
            CommodityRule {
                requires: &["SHORT TERM GDSM"],
                canonical: "SHORT TERM GDSM",
            },
            CommodityRule {
                requires: &["TPE9", "GROUP SOC"],
                canonical: "S1– TPE9 – Group SOC",
            },
        ],
    },
    CarrierRuleSet {
        carrier_key: "COSCO",
        rules: &[
            CommodityRule {
                requires: &["FAK (EXCLUDING GARMENT)"],
                canonical: "FAK",
            },
            CommodityRule {
                requires: &["GARMENTS/TEXTILE/CONSOL"],
                canonical: "GARMENT",
            },
        ],
    },
    CarrierRuleSet {
        carrier_key: "EMC",
        rules: &[CommodityRule {
            requires: &["RATE 1 - GENERAL CARGO"],
            canonical: "RATE 1",
        }],
    },
    CarrierRuleSet {
        carrier_key: "HPL",
        rules: &[CommodityRule {
            requires: &["FAK INCLUDING GARMENT"],
            canonical: "FAK",
        }],
    },
    CarrierRuleSet {
        carrier_key: "YML",
        rules: &[
            CommodityRule {
                requires: &["GROUP A", YML_FAK_PATTERN],
                canonical: "GROUP A",
            },
            CommodityRule {
                requires: &[YML_FAK_PATTERN],
                canonical: "FAK",
            },
        ],
    },
];

/// 对单条货种文本应用某船司的规则组，返回改写值（未命中 -> None）
fn rewrite_commodity(carrier_upper: &str, commodity: &str) -> Option<&'static str> {
    let commodity_upper = commodity.to_uppercase();
    for rule_set in COMMODITY_RULES {
        if !carrier_upper.contains(rule_set.carrier_key) {
            continue;
        }
        for rule in rule_set.rules {
            if rule
                .requires
                .iter()
                .all(|pattern| commodity_upper.contains(&pattern.to_uppercase()))
            {
                return Some(rule.canonical);
            }
        }
    }
    None
}

/// 货种标准化（纯函数；无规则的船司原样通过）
pub fn normalize_commodity(records: Vec<RateRecord>) -> Vec<RateRecord> {
    records
        .into_iter()
        .map(|mut record| {
            if let Some(commodity) = &record.commodity_type {
                let carrier_upper = record.carrier.to_uppercase();
                if let Some(canonical) = rewrite_commodity(&carrier_upper, commodity) {
                    record.commodity_type = Some(canonical.to_string());
                }
            }
            record
        })
        .collect()
}

/// POD 标准化：命中港口名称映射则替换为港口代码，否则去空白原样保留
pub fn normalize_pod(records: Vec<RateRecord>, port_mapping: &HashMap<String, String>) -> Vec<RateRecord> {
    records
        .into_iter()
        .map(|mut record| {
            let key = record.pod.trim().to_uppercase();
            record.pod = match port_mapping.get(&key) {
                Some(code) => code.clone(),
                None => record.pod.trim().to_string(),
            };
            record
        })
        .collect()
}

/// PlaceOfDelivery 标准化：统一大写去空白
pub fn normalize_place_of_delivery(records: Vec<RateRecord>) -> Vec<RateRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.place_of_delivery = record.place_of_delivery.trim().to_uppercase();
            record
        })
        .collect()
}
