// ==========================================
// 海运整柜定价系统 - 运价实体
// ==========================================
// RateRecord: 长表记录（解析产物，整合后即弃）
// MasterRow : 宽表记录（Master / Old_Rate 持久化）
// ==========================================

use crate::domain::types::{ContainerType, DeltaDirection, RateType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 长表运价记录
// ==========================================
// 一条记录 = 一家船司在一条航线/合约/货种组合上
// 对一种柜型在一个有效期窗口内的一口价
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub pol: String,
    pub pod: String,
    pub place_of_delivery: String,
    pub routing_note: Option<String>,
    pub carrier: String,
    // 日期解析失败按缺失处理（开放有效期），不报错
    pub effective_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub contract_identifier: Option<String>,
    pub commodity_type: Option<String>,
    pub container_type: ContainerType,
    pub amount: f64,
    pub rate_type: RateType,
    pub source_file: String,
}

impl RateRecord {
    /// 分组键（不含柜型与日期）：同组内按时间排序取前一期价格
    pub fn sequence_key(&self) -> SequenceKey {
        SequenceKey {
            pol: self.pol.clone(),
            pod: self.pod.clone(),
            place_of_delivery: self.place_of_delivery.clone(),
            routing_note: self.routing_note.clone().unwrap_or_default(),
            carrier: self.carrier.clone(),
            contract_identifier: self.contract_identifier.clone().unwrap_or_default(),
            commodity_type: self.commodity_type.clone().unwrap_or_default(),
            rate_type: self.rate_type,
            container_type: self.container_type,
        }
    }

    /// 宽表透视键（含有效期，不含柜型）
    pub fn pivot_key(&self) -> PivotKey {
        PivotKey {
            pol: self.pol.clone(),
            pod: self.pod.clone(),
            place_of_delivery: self.place_of_delivery.clone(),
            routing_note: self.routing_note.clone().unwrap_or_default(),
            carrier: self.carrier.clone(),
            effective_date: self.effective_date,
            expiration_date: self.expiration_date,
            contract_identifier: self.contract_identifier.clone().unwrap_or_default(),
            commodity_type: self.commodity_type.clone().unwrap_or_default(),
            rate_type: self.rate_type,
        }
    }
}

/// 同期序列分组键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceKey {
    pub pol: String,
    pub pod: String,
    pub place_of_delivery: String,
    pub routing_note: String,
    pub carrier: String,
    pub contract_identifier: String,
    pub commodity_type: String,
    pub rate_type: RateType,
    pub container_type: ContainerType,
}

/// 宽表透视键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PivotKey {
    pub pol: String,
    pub pod: String,
    pub place_of_delivery: String,
    pub routing_note: String,
    pub carrier: String,
    pub effective_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub contract_identifier: String,
    pub commodity_type: String,
    pub rate_type: RateType,
}

// ==========================================
// 环比变动 (Rate Delta)
// ==========================================
// value 保留符号用于筛选/测试；展示串只含方向+幅度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateDelta {
    pub value: f64,
    pub direction: DeltaDirection,
    pub magnitude: f64,
}

impl RateDelta {
    /// 由当前价与上一期价分类
    pub fn classify(current: f64, previous: f64) -> Self {
        let value = current - previous;
        if value.abs() < f64::EPSILON {
            Self {
                value: 0.0,
                direction: DeltaDirection::Unchanged,
                magnitude: 0.0,
            }
        } else if value > 0.0 {
            Self {
                value,
                direction: DeltaDirection::Increase,
                magnitude: value,
            }
        } else {
            Self {
                value,
                direction: DeltaDirection::Decrease,
                magnitude: -value,
            }
        }
    }

    /// 人工查阅用展示串，如 "⬆️ 200" / "↔️ 0"
    pub fn display(&self) -> String {
        let mag = if self.magnitude.fract() == 0.0 {
            format!("{}", self.magnitude as i64)
        } else {
            format!("{:.2}", self.magnitude)
        };
        format!("{} {}", self.direction, mag)
    }
}

// ==========================================
// Master 宽表行
// ==========================================
// 不变式: 一行内所有柜型价格属于同一
// 航线+船司+合约+货种+运价表类型+有效期窗口
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterRow {
    pub pol: String,
    pub pod: String,
    pub place_of_delivery: String,
    pub routing_note: Option<String>,
    pub carrier: String,
    pub effective_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub contract_identifier: Option<String>,
    pub commodity_type: Option<String>,
    pub rate_type: RateType,
    /// 柜型 -> 单价
    pub rates: BTreeMap<ContainerType, f64>,
    /// 柜型 -> 环比变动（仅 current 行，且该组存在上一期时）
    pub deltas: BTreeMap<ContainerType, RateDelta>,
}

impl MasterRow {
    /// 取某柜型单价
    pub fn rate(&self, container: ContainerType) -> Option<f64> {
        self.rates.get(&container).copied()
    }

    /// 在整合截止日视角下是否仍有效
    pub fn is_current(&self, cutoff: NaiveDate) -> bool {
        match self.expiration_date {
            None => true,
            Some(exp) => exp >= cutoff,
        }
    }
}

/// 整合结果：current = Master 表，history = Old_Rate 全量历史
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterTables {
    pub current: Vec<MasterRow>,
    pub history: Vec<MasterRow>,
}
