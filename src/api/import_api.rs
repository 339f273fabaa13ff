// ==========================================
// 海运整柜定价系统 - 运价整合接口
// ==========================================
// 职责: Raw 目录 -> 解析 -> 标准化 -> PUC -> 整合
//       -> 落库 -> 工作簿输出 的端到端编排
// 失败语义: 单个坏文件记警告跳过，N 个文件的导入不因
//           一个坏文件中止；Raw 目录为空得到空表，不报错
// ==========================================

use crate::api::error::ApiResult;
use crate::config::PricingPaths;
use crate::engine::normalizer::{
    normalize_commodity, normalize_place_of_delivery, normalize_pod,
};
use crate::engine::puc::{apply_port_use_charge, PucAdjustment, PucTable};
use crate::engine::reconciler::reconcile;
use crate::export::master_workbook::{extract_version_from_filename, write_master_workbook};
use crate::importer::file_parser::UniversalGridParser;
use crate::importer::layout::detect_rate_type;
use crate::importer::rate_parser::parse_rate_grid;
use crate::importer::reference::{load_port_mapping, load_puc_table};
use crate::repository::master_repo::MasterRateRepository;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

/// 整合运行报告
#[derive(Debug, Clone)]
pub struct NormalizeReport {
    pub files_processed: Vec<String>,
    pub files_skipped: Vec<String>,
    pub record_count: usize,
    pub master_rows: usize,
    pub history_rows: usize,
    pub version_label: String,
    pub workbook_path: PathBuf,
}

pub struct ImportApi {
    paths: PricingPaths,
}

impl ImportApi {
    pub fn new(paths: PricingPaths) -> Self {
        Self { paths }
    }

    /// 整合 Raw 目录下全部运价表
    ///
    /// cutoff_date 为整合截止日（通常取当日），
    /// include_expired = true 时 Master 不做有效期过滤。
    pub fn normalize_all(
        &self,
        cutoff_date: NaiveDate,
        include_expired: bool,
    ) -> ApiResult<NormalizeReport> {
        self.paths.ensure_dirs()?;

        // ---- 枚举 Raw 文件 ----
        let mut raw_files: Vec<PathBuf> = std::fs::read_dir(&self.paths.raw_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default();
                // 跳过 Excel 临时锁文件
                if name.starts_with("~$") {
                    return false;
                }
                matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("xlsx") | Some("xls") | Some("csv")
                )
            })
            .collect();
        raw_files.sort();

        if raw_files.is_empty() {
            warn!(dir = %self.paths.raw_dir.display(), "Raw 目录无可处理文件");
        }

        // ---- 逐文件解析（坏文件跳过不中止）----
        let mut all_records = Vec::new();
        let mut files_processed = Vec::new();
        let mut files_skipped = Vec::new();

        for path in &raw_files {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();

            let Some(rate_type) = detect_rate_type(&file_name) else {
                warn!(file = %file_name, "无法从文件名识别运价表类型, 跳过");
                files_skipped.push(file_name);
                continue;
            };

            let grid = match UniversalGridParser.parse(path) {
                Ok(grid) => grid,
                Err(err) => {
                    warn!(file = %file_name, error = %err, "文件读取失败, 跳过");
                    files_skipped.push(file_name);
                    continue;
                }
            };

            let records = parse_rate_grid(&grid, rate_type, &file_name);
            info!(
                file = %file_name,
                rate_type = %rate_type,
                rows = records.len(),
                "解析完成 (长表)"
            );
            all_records.extend(records);
            files_processed.push(file_name);
        }

        // ---- PUC 加回（城市参考表口径）----
        let puc_path = self.paths.puc_file();
        let puc_table = if puc_path.exists() {
            load_puc_table(&puc_path)?
        } else {
            warn!(file = %puc_path.display(), "缺少 PUC_SOC 参考表, 跳过 PUC 调整");
            PucTable::default()
        };
        let records = apply_port_use_charge(all_records, &puc_table, PucAdjustment::Add);

        // ---- POD / Place / 货种标准化 ----
        let mapping_path = self.paths.port_mapping_file();
        let port_mapping = if mapping_path.exists() {
            load_port_mapping(&mapping_path)?
        } else {
            warn!(file = %mapping_path.display(), "缺少港口映射表, POD 原样保留");
            HashMap::new()
        };
        let records = normalize_pod(records, &port_mapping);
        let records = normalize_place_of_delivery(records);
        let records = normalize_commodity(records);
        let record_count = records.len();

        // ---- 整合 + 落库 ----
        let tables = reconcile(records, cutoff_date, include_expired);
        info!(
            master_rows = tables.current.len(),
            history_rows = tables.history.len(),
            "整合完成"
        );

        let db_path = self.paths.master_db_path();
        let repo = MasterRateRepository::new(&db_path.to_string_lossy())?;
        repo.replace_all(&tables)?;

        // ---- 工作簿输出（版本号取最新 FAK 文件名）----
        let fak_files: Vec<String> = files_processed
            .iter()
            .filter(|name| name.to_uppercase().contains("FAK"))
            .cloned()
            .collect();
        let version_label = match fak_files.last() {
            Some(latest) => extract_version_from_filename(latest, cutoff_date),
            None => extract_version_from_filename("", cutoff_date),
        };

        let workbook_path = self.paths.master_workbook_path();
        write_master_workbook(&workbook_path, &tables, &version_label, &fak_files, cutoff_date)?;
        info!(workbook = %workbook_path.display(), version = %version_label, "Master 工作簿已写出");

        Ok(NormalizeReport {
            files_processed,
            files_skipped,
            record_count,
            master_rows: tables.current.len(),
            history_rows: tables.history.len(),
            version_label,
            workbook_path,
        })
    }
}
