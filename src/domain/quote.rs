// ==========================================
// 海运整柜定价系统 - 报价实体
// ==========================================
// 报价请求（客户/货载/柜型计划/引擎选项）与
// 报价结果（选项列表或失败码）
// ==========================================

use crate::domain::types::{ContainerType, QuoteErrorCode, RateType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::domain::schedule::ScheduleResult;

// ==========================================
// 客户信息
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub sales_person: Option<String>,
}

// ==========================================
// 货载请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub pol: String,
    pub pod: Option<String>,
    pub place_of_delivery: String,
    pub cargo_ready_date: Option<NaiveDate>,
    pub incoterm: Option<String>,
    /// "ANY" / "FAK" / "REEFER" / 具名货种
    pub commodity_type: String,
    /// true = 剔除 SOC 行（只留 COC）
    pub is_soc_excluded: bool,
}

impl ShipmentRequest {
    pub fn new(pol: &str, place_of_delivery: &str) -> Self {
        Self {
            pol: pol.to_string(),
            pod: None,
            place_of_delivery: place_of_delivery.to_string(),
            cargo_ready_date: None,
            incoterm: None,
            commodity_type: "ANY".to_string(),
            is_soc_excluded: false,
        }
    }
}

// ==========================================
// 柜型计划
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerPlanItem {
    pub container_type: ContainerType,
    pub quantity: u32,
}

impl ContainerPlanItem {
    pub fn new(container_type: ContainerType, quantity: u32) -> Self {
        Self {
            container_type,
            quantity,
        }
    }
}

// ==========================================
// 引擎选项
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineOptions {
    pub preferred_carriers: Vec<String>,
    pub excluded_carriers: Vec<String>,
    pub max_options_per_quote: usize,
    pub currency: String,
    /// 船司 -> 每柜 mark-up（USD）
    pub markup_per_carrier: HashMap<String, f64>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            preferred_carriers: Vec::new(),
            excluded_carriers: Vec::new(),
            max_options_per_quote: 5,
            currency: "USD".to_string(),
            markup_per_carrier: HashMap::new(),
        }
    }
}

impl EngineOptions {
    /// 标准化 mark-up 表: {CARRIER_UPPER -> USD}
    pub fn normalized_markup(&self) -> HashMap<String, f64> {
        self.markup_per_carrier
            .iter()
            .map(|(k, v)| (k.trim().to_uppercase(), *v))
            .collect()
    }
}

// ==========================================
// 报价请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub customer: CustomerInfo,
    pub shipment: ShipmentRequest,
    pub containers: Vec<ContainerPlanItem>,
    pub engine_options: EngineOptions,
}

// ==========================================
// 报价失败（业务结果，不是异常）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteFailure {
    pub error: QuoteErrorCode,
    pub message: String,
}

impl QuoteFailure {
    pub fn no_rate(message: impl Into<String>) -> Self {
        Self {
            error: QuoteErrorCode::NoRateFound,
            message: message.into(),
        }
    }
}

// ==========================================
// 报价选项
// ==========================================
/// 单柜型明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerBreakdown {
    pub container_type: ContainerType,
    pub quantity: u32,
    pub unit_rate: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteOption {
    pub index: usize,
    pub is_recommended: bool,
    pub carrier: String,
    pub rate_type: RateType,
    pub pol: String,
    pub pod: String,
    pub place_of_delivery: String,
    pub contract_identifier: Option<String>,
    pub commodity_type: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    /// 计划内每柜型的含 mark-up 单价
    pub container_rates: BTreeMap<ContainerType, f64>,
    pub container_plan: Vec<ContainerBreakdown>,
    pub total_ocean_amount: f64,
    pub currency: String,
    /// 船期缺失 = "schedule unknown"，不影响报价
    pub schedule: Option<ScheduleResult>,
    pub notes: String,
}

// ==========================================
// 报价摘要与调试信息
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub contact_person: Option<String>,
    pub sales_person: Option<String>,
    pub route: String,
    pub pol: String,
    pub pod: Option<String>,
    pub place_of_delivery: String,
    pub containers_summary: String,
    pub incoterm: Option<String>,
    pub commodity_type: String,
    pub is_soc_excluded: bool,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuoteDebugInfo {
    pub rows_after_filters: usize,
    pub rows_with_full_rates: usize,
    pub rows_returned: usize,
}

/// 引擎评估产物（未盖章）：API 层补 quote_ref_no / quote_date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteEvaluation {
    pub summary: QuoteSummary,
    pub options: Vec<QuoteOption>,
    pub debug: QuoteDebugInfo,
}

/// 对外成功报价
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSuccess {
    pub quote_ref_no: String,
    pub quote_date: NaiveDate,
    pub summary: QuoteSummary,
    pub options: Vec<QuoteOption>,
    pub debug: QuoteDebugInfo,
}

// ==========================================
// 成本预览（内部口径，不含 mark-up）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostPreviewRow {
    pub carrier: String,
    pub total_base: f64,
    pub pol: String,
    pub pod: String,
    pub place_of_delivery: String,
    pub rate_type: RateType,
    pub contract_identifier: Option<String>,
    pub commodity_type: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub routing_note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostPreview {
    pub rows: Vec<CostPreviewRow>,
    pub debug: QuoteDebugInfo,
}
