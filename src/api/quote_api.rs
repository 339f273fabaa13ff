// ==========================================
// 海运整柜定价系统 - 报价接口
// ==========================================
// 职责: 组装 PricingContext（Master 快照 + 船期索引），
//       编排报价计算、报价编号盖章与内部留档
// 说明: "查无价"以 QuoteReply::Failure 数据返回；
//       Master 库缺失 / 序号库不可写才是 ApiError 硬故障
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::PricingPaths;
use crate::domain::quote::{
    ContainerPlanItem, CostPreview, QuoteFailure, QuoteRequest, QuoteSuccess, ShipmentRequest,
};
use crate::domain::rate::MasterRow;
use crate::engine::quote::{generate_quote, preview_cost_by_carrier};
use crate::engine::quote_ref::build_quote_ref;
use crate::engine::schedule::ScheduleIndex;
use crate::importer::reference::load_schedule_rows;
use crate::repository::master_repo::MasterRateRepository;
use crate::repository::quote_counter_repo::QuoteCounterRepository;
use crate::repository::quote_log_repo::QuoteLogRepository;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ==========================================
// 报价上下文（显式传入，核心无全局状态）
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PricingContext {
    pub master: Vec<MasterRow>,
    pub schedule: ScheduleIndex,
}

impl PricingContext {
    pub fn new(master: Vec<MasterRow>, schedule: ScheduleIndex) -> Self {
        Self { master, schedule }
    }

    /// 从工作目录装载上下文
    ///
    /// Master 库缺失是硬故障；船期表缺失降级为"船期未知"。
    pub fn load(paths: &PricingPaths) -> ApiResult<Self> {
        let db_path = paths.master_db_path();
        if !db_path.exists() {
            return Err(ApiError::NotFound(format!(
                "Master 库不存在: {}（请先执行 normalize）",
                db_path.display()
            )));
        }

        let repo = MasterRateRepository::new(&db_path.to_string_lossy())?;
        let master = repo.load_master()?;

        let schedule_path = paths.schedule_file();
        let schedule = if schedule_path.exists() {
            ScheduleIndex::build(&load_schedule_rows(&schedule_path)?)
        } else {
            warn!(file = %schedule_path.display(), "缺少船期表, 报价将不带船期");
            ScheduleIndex::default()
        };

        Ok(Self { master, schedule })
    }

    /// 成本预览（内部口径，不含 mark-up，纯计算无副作用）
    pub fn preview_cost(
        &self,
        shipment: &ShipmentRequest,
        containers: &[ContainerPlanItem],
    ) -> Result<CostPreview, QuoteFailure> {
        preview_cost_by_carrier(&self.master, shipment, containers)
    }
}

// ==========================================
// 报价结果（成功 / 业务失败二选一）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuoteReply {
    Success(Box<QuoteSuccess>),
    Failure(QuoteFailure),
}

impl QuoteReply {
    pub fn is_success(&self) -> bool {
        matches!(self, QuoteReply::Success(_))
    }
}

// ==========================================
// 报价接口
// ==========================================
pub struct QuoteApi {
    counter_repo: QuoteCounterRepository,
    log_repo: QuoteLogRepository,
}

impl QuoteApi {
    pub fn new(paths: &PricingPaths) -> ApiResult<Self> {
        let db_path = paths.master_db_path();
        let db_str = db_path.to_string_lossy();
        Ok(Self {
            counter_repo: QuoteCounterRepository::new(&db_str)?,
            log_repo: QuoteLogRepository::new(&db_str)?,
        })
    }

    /// 生成报价
    ///
    /// 成功路径副作用: 报价序号递增一次 + 追加一条留档。
    /// 业务"查无价"以 Failure 数据返回，不算错误。
    pub fn generate_quote(
        &self,
        ctx: &PricingContext,
        request: &QuoteRequest,
        today: NaiveDate,
    ) -> ApiResult<QuoteReply> {
        match generate_quote(&ctx.master, &ctx.schedule, request, today) {
            Ok(evaluation) => {
                let quote_ref_no =
                    build_quote_ref(&self.counter_repo, &request.customer.name, today)?;

                let success = QuoteSuccess {
                    quote_ref_no,
                    quote_date: today,
                    summary: evaluation.summary,
                    options: evaluation.options,
                    debug: evaluation.debug,
                };

                self.log_repo.append(&success)?;
                info!(
                    quote_ref = %success.quote_ref_no,
                    options = success.options.len(),
                    "报价生成成功"
                );
                Ok(QuoteReply::Success(Box::new(success)))
            }
            Err(failure) => {
                info!(code = %failure.error, message = %failure.message, "报价无结果");
                Ok(QuoteReply::Failure(failure))
            }
        }
    }
}
