// ==========================================
// 海运整柜定价系统 - 导入层
// ==========================================
// 职责: 外部数据导入,生成内部数据
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod layout;
pub mod rate_parser;
pub mod reference;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvGridParser, ExcelGridParser, RawGrid, UniversalGridParser};
pub use layout::{detect_rate_type, layout_for, RateSheetLayout};
pub use rate_parser::{clean_amount, parse_date_cell, parse_rate_grid};
pub use reference::{load_port_mapping, load_puc_table, load_schedule_rows};
