// ==========================================
// 海运整柜定价系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + calamine/rust_xlsxwriter
// 系统定位: 运价主表整合 + 报价决策引擎
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - Master 工作簿输出
pub mod export;

// 配置层 - 工作目录与文件布局
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    CommodityFilter, ContainerType, DeltaDirection, QuoteErrorCode, RateType, Region,
};

// 领域实体
pub use domain::{
    ContainerPlanItem, CustomerInfo, EngineOptions, MasterRow, MasterTables, QuoteFailure,
    QuoteOption, QuoteRequest, QuoteSuccess, RateDelta, RateRecord, ScheduleResult,
    ShipmentRequest,
};

// 引擎
pub use engine::{
    apply_port_use_charge, build_quote_ref, generate_quote, normalize_commodity, reconcile,
    PucAdjustment, PucTable, ScheduleIndex,
};

// API
pub use api::{ImportApi, PricingContext, QuoteApi, QuoteReply};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "海运整柜定价系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
