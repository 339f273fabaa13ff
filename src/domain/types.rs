// ==========================================
// 海运整柜定价系统 - 领域类型定义
// ==========================================
// 柜型/运价表类型/涨跌方向/报价失败码等核心枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 柜型 (Container Type)
// ==========================================
// Master 宽表的柜型列顺序即此枚举顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContainerType {
    #[serde(rename = "20GP")]
    Gp20,
    #[serde(rename = "40GP")]
    Gp40,
    #[serde(rename = "40HQ")]
    Hq40,
    #[serde(rename = "45HQ")]
    Hq45,
    #[serde(rename = "40NOR")]
    Nor40,
    #[serde(rename = "20RF")]
    Rf20,
    #[serde(rename = "40RF")]
    Rf40,
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerType::Gp20 => write!(f, "20GP"),
            ContainerType::Gp40 => write!(f, "40GP"),
            ContainerType::Hq40 => write!(f, "40HQ"),
            ContainerType::Hq45 => write!(f, "45HQ"),
            ContainerType::Nor40 => write!(f, "40NOR"),
            ContainerType::Rf20 => write!(f, "20RF"),
            ContainerType::Rf40 => write!(f, "40RF"),
        }
    }
}

/// Master 宽表固定柜型列（报价柜 20RF/40RF 不在其中，报价时回退）
pub const MASTER_CONTAINER_ORDER: [ContainerType; 5] = [
    ContainerType::Gp20,
    ContainerType::Gp40,
    ContainerType::Hq40,
    ContainerType::Hq45,
    ContainerType::Nor40,
];

impl ContainerType {
    /// 从自由文本标签解析柜型（兼容 20FT/20DC/40HC 等别名）
    pub fn from_label(label: &str) -> Option<Self> {
        let norm = label
            .trim()
            .to_uppercase()
            .replace(' ', "")
            .replace('\'', "");
        match norm.as_str() {
            "20" | "20FT" | "20DC" | "20DV" | "20GP" => Some(ContainerType::Gp20),
            "40" | "40FT" | "40DC" | "40DV" | "40GP" => Some(ContainerType::Gp40),
            "40HC" | "40HQ" | "40HCFT" | "40HQFT" => Some(ContainerType::Hq40),
            "45" | "45FT" | "45HC" | "45HQ" => Some(ContainerType::Hq45),
            "40NOR" => Some(ContainerType::Nor40),
            "20RF" => Some(ContainerType::Rf20),
            "40RF" => Some(ContainerType::Rf40),
            _ => None,
        }
    }

    /// 20 尺柜族（PUC 取 20DC 档）
    pub fn is_20_class(&self) -> bool {
        matches!(self, ContainerType::Gp20)
    }

    /// 40 尺普柜族（PUC 取 40HC 档；40NOR/45HQ 不参与 PUC 调整）
    pub fn is_40_class(&self) -> bool {
        matches!(self, ContainerType::Gp40 | ContainerType::Hq40)
    }
}

// ==========================================
// 运价表类型 (Rate Type)
// ==========================================
// 由原始文件名推断，决定列布局
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RateType {
    #[serde(rename = "FAK")]
    Fak,
    #[serde(rename = "ONE_SPECIAL RATE")]
    OneSpecialRate,
    #[serde(rename = "HPL_SCFI")]
    HplScfi,
}

impl fmt::Display for RateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateType::Fak => write!(f, "FAK"),
            RateType::OneSpecialRate => write!(f, "ONE_SPECIAL RATE"),
            RateType::HplScfi => write!(f, "HPL_SCFI"),
        }
    }
}

impl RateType {
    /// 从数据库存储字符串解析
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "FAK" => Some(RateType::Fak),
            "ONE_SPECIAL RATE" => Some(RateType::OneSpecialRate),
            "HPL_SCFI" => Some(RateType::HplScfi),
            _ => None,
        }
    }
}

// ==========================================
// 涨跌方向 (Delta Direction)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeltaDirection {
    Increase,  // 涨价
    Decrease,  // 降价
    Unchanged, // 持平
}

impl fmt::Display for DeltaDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeltaDirection::Increase => write!(f, "⬆️"),
            DeltaDirection::Decrease => write!(f, "⬇️"),
            DeltaDirection::Unchanged => write!(f, "↔️"),
        }
    }
}

// ==========================================
// 美线区域 (POD Region)
// ==========================================
// 区域决定预估航程天数档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    West,  // 美西
    East,  // 美东
    Gulf,  // 美湾
    Other, // 其他
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::West => write!(f, "WEST"),
            Region::East => write!(f, "EAST"),
            Region::Gulf => write!(f, "GULF"),
            Region::Other => write!(f, "OTHER"),
        }
    }
}

// ==========================================
// 报价失败码 (Quote Error Code)
// ==========================================
// "查无价" 是业务结果不是异常，作为数据返回
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteErrorCode {
    NoRateFound,
    NoValidRateForPlan,
    MissingPlaceOfDelivery,
}

impl fmt::Display for QuoteErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteErrorCode::NoRateFound => write!(f, "NO_RATE_FOUND"),
            QuoteErrorCode::NoValidRateForPlan => write!(f, "NO_VALID_RATE_FOR_PLAN"),
            QuoteErrorCode::MissingPlaceOfDelivery => write!(f, "MISSING_PLACE_OF_DELIVERY"),
        }
    }
}

// ==========================================
// 货种筛选规则 (Commodity Filter)
// ==========================================
// FAK 筛选需排除 REEFER；具名货种走等值匹配
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommodityFilter {
    Any,
    Fak,
    Reefer,
    FixRate,
    ShortTermGdsm,
    Named(String),
}

impl CommodityFilter {
    /// 从报价请求的货种字符串解析筛选规则
    pub fn from_request(commodity: &str) -> Self {
        let upper = commodity.trim().to_uppercase();
        match upper.as_str() {
            "" | "ANY" => CommodityFilter::Any,
            "FAK" => CommodityFilter::Fak,
            "REEFER" => CommodityFilter::Reefer,
            "FIX RATE" => CommodityFilter::FixRate,
            "SHORT TERM GDSM" => CommodityFilter::ShortTermGdsm,
            _ => CommodityFilter::Named(upper),
        }
    }

    /// 判断 Master 行的货种（已大写）是否命中
    pub fn matches(&self, commodity_upper: &str) -> bool {
        match self {
            CommodityFilter::Any => true,
            CommodityFilter::Fak => {
                commodity_upper.contains("FAK") && !commodity_upper.contains("REEFER")
            }
            CommodityFilter::Reefer => commodity_upper.contains("REEFER"),
            CommodityFilter::FixRate => commodity_upper.contains("FIX RATE"),
            CommodityFilter::ShortTermGdsm => commodity_upper.contains("SHORT TERM GDSM"),
            CommodityFilter::Named(name) => commodity_upper == name,
        }
    }
}
