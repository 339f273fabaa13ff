// ==========================================
// 海运整柜定价系统 - 配置层
// ==========================================
// 职责: 解析定价工作目录布局与约定文件名
// ==========================================

pub mod paths;

pub use paths::PricingPaths;
