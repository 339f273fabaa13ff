// ==========================================
// 海运整柜定价系统 - 船期实体
// ==========================================
// 船期表原始行 / 服务串解析结果 / 航次槽位 / 预估结果
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// 船期表原始行（导入层产物）
// ==========================================
// CARRIER 可为 "CMA/APL" 斜杠列表，POD 为 ";" 分隔，
// 周列为 (周标签, 船名) 对
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub carrier_raw: String,
    pub service_raw: String,
    pub pod_raw: String,
    pub weeks: Vec<(String, String)>,
}

// ==========================================
// 服务串解析结果
// ==========================================
// 形如 "PS3 (HCM) (SAT)"：服务名 + 可选 POL 标签 + 开船星期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service_name: String,
    /// "HCM" / "HPH" / "ANY"
    pub pol_tag: String,
    /// MON/TUE/.../SUN
    pub weekday: String,
}

// ==========================================
// 航次槽位（船期索引条目）
// ==========================================
// 一条 = (船司, 服务, POL 标签, 星期, POD 代码, 周号, 船名)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SailingSlot {
    pub carrier: String,
    pub service_name: String,
    pub pol_tag: String,
    pub weekday: String,
    pub pod_code: String,
    pub week_no: u32,
    pub week_label: String,
    pub vessel: String,
}

// ==========================================
// 船期预估结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub carrier: String,
    pub service: String,
    pub pol_tag: String,
    pub weekday: String,
    pub pod_code: String,
    pub week_no: u32,
    pub week_label: String,
    pub vessel: String,
    pub etd: chrono::NaiveDate,
    pub eta: Option<chrono::NaiveDate>,
    pub transit_min: u32,
    pub transit_max: u32,
}
