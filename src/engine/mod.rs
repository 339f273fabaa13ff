// ==========================================
// 海运整柜定价系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: "查无价"走业务失败码返回, 不抛异常
// ==========================================

pub mod normalizer;
pub mod puc;
pub mod quote;
pub mod quote_ref;
pub mod reconciler;
pub mod schedule;

// 重导出核心引擎
pub use normalizer::{normalize_commodity, normalize_place_of_delivery, normalize_pod};
pub use puc::{apply_port_use_charge, is_soc_carrier, PucAdjustment, PucEntry, PucTable, SOC_CARRIERS};
pub use quote::{generate_quote, preview_cost_by_carrier};
pub use quote_ref::{build_quote_ref, date_code, normalize_customer_key};
pub use reconciler::reconcile;
pub use schedule::{classify_region, estimate_transit, expand_pod_candidates, ScheduleIndex};
