// ==========================================
// 海运整柜定价系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod quote;
pub mod rate;
pub mod schedule;
pub mod types;

// 重导出核心类型
pub use quote::{
    ContainerBreakdown, ContainerPlanItem, CostPreview, CostPreviewRow, CustomerInfo,
    EngineOptions, QuoteDebugInfo, QuoteEvaluation, QuoteFailure, QuoteOption, QuoteRequest,
    QuoteSuccess, QuoteSummary, ShipmentRequest,
};
pub use rate::{MasterRow, MasterTables, PivotKey, RateDelta, RateRecord, SequenceKey};
pub use schedule::{SailingSlot, ScheduleResult, ScheduleRow, ServiceInfo};
pub use types::{
    CommodityFilter, ContainerType, DeltaDirection, QuoteErrorCode, RateType, Region,
    MASTER_CONTAINER_ORDER,
};
