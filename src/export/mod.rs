// ==========================================
// 海运整柜定价系统 - 导出层
// ==========================================
// 职责: Master 工作簿输出（查阅版）
// ==========================================

pub mod master_workbook;

pub use master_workbook::{
    extract_version_from_filename, write_master_workbook, ExportError, ExportResult,
};
