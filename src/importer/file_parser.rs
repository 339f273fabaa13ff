// ==========================================
// 海运整柜定价系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 运价表为"定列"版式：按原始行列网格读取，不做表头推断
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// 原始行列网格：grid[row][col] 为去除首尾空白的单元格文本
pub type RawGrid = Vec<Vec<String>>;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvGridParser;

impl CsvGridParser {
    pub fn parse_to_grid(&self, file_path: &Path) -> ImportResult<RawGrid> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 打开 CSV 文件（无表头，允许行长度不一致）
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut grid = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();

            // 跳过完全空白的行
            if row.iter().all(|v| v.is_empty()) {
                continue;
            }
            grid.push(row);
        }

        Ok(grid)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 优先读取名为 RATE 的工作表，找不到则退回第一个
pub struct ExcelGridParser;

impl ExcelGridParser {
    pub fn parse_to_grid(&self, file_path: &Path) -> ImportResult<RawGrid> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 打开 Excel 文件
        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError("Excel 文件无工作表".to_string()));
        }

        // 优先 RATE 工作表
        let sheet_name = sheet_names
            .iter()
            .find(|name| name.trim().eq_ignore_ascii_case("RATE"))
            .cloned()
            .unwrap_or_else(|| sheet_names[0].clone());

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut grid = Vec::new();
        for data_row in range.rows() {
            let row: Vec<String> = data_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect();

            // 跳过完全空白的行
            if row.iter().all(|v| v.is_empty()) {
                continue;
            }
            grid.push(row);
        }

        Ok(grid)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalGridParser;

impl UniversalGridParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawGrid> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvGridParser.parse_to_grid(path),
            "xlsx" | "xls" => ExcelGridParser.parse_to_grid(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
