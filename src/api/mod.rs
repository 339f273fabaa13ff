// ==========================================
// 海运整柜定价系统 - API 层
// ==========================================
// 职责: 面向调用方的业务接口（整合 / 报价）
// ==========================================

pub mod error;
pub mod import_api;
pub mod quote_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, NormalizeReport};
pub use quote_api::{PricingContext, QuoteApi, QuoteReply};
