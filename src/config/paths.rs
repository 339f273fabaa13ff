// ==========================================
// 海运整柜定价系统 - 工作目录布局
// ==========================================
// 约定:
// - Raw/    运价原始表（各船司各版式）
// - Data/   主数据（Master 库 / PUC / 港口映射 / 船期表）
// - Output/ 报价输出（内部留档）
// ==========================================

use std::path::{Path, PathBuf};

/// 定价系统工作目录布局
#[derive(Debug, Clone)]
pub struct PricingPaths {
    pub base_dir: PathBuf,
    pub raw_dir: PathBuf,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl PricingPaths {
    /// 基于显式 base_dir 构建布局
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        let base = base_dir.as_ref().to_path_buf();
        Self {
            raw_dir: base.join("Raw"),
            data_dir: base.join("Data"),
            output_dir: base.join("Output"),
            base_dir: base,
        }
    }

    /// 解析默认工作目录
    ///
    /// 优先级:
    /// 1. 环境变量 OCEAN_PRICING_BASE_DIR
    /// 2. 用户数据目录/ocean-pricing-system
    /// 3. 当前目录 ./ocean-pricing-data
    pub fn resolve_default() -> Self {
        if let Ok(path) = std::env::var("OCEAN_PRICING_BASE_DIR") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Self::new(trimmed);
            }
        }

        if let Some(data_dir) = dirs::data_dir() {
            return Self::new(data_dir.join("ocean-pricing-system"));
        }

        Self::new("./ocean-pricing-data")
    }

    /// 确保 Raw/Data/Output 目录存在
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.raw_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Master 数据库（SQLite）
    pub fn master_db_path(&self) -> PathBuf {
        self.data_dir.join("master_pricing.db")
    }

    /// Master 工作簿（对外查阅版）
    pub fn master_workbook_path(&self) -> PathBuf {
        self.data_dir.join("Master_FullPricing.xlsx")
    }

    /// SOC 港口使用费参考表
    pub fn puc_file(&self) -> PathBuf {
        self.data_dir.join("PUC_SOC.xlsx")
    }

    /// 港口名称 -> 港口代码映射表
    pub fn port_mapping_file(&self) -> PathBuf {
        self.data_dir.join("Port_Code_Mapping_Final.xlsx")
    }

    /// 船期表
    pub fn schedule_file(&self) -> PathBuf {
        self.data_dir.join("Schedule.xlsx")
    }
}
