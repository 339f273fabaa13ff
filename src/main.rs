// ==========================================
// 海运整柜定价系统 - 命令行入口
// ==========================================
// 子命令:
// - normalize : 整合 Raw 目录运价表, 更新 Master 库与工作簿
// - quote-demo: 用当前 Master 跑一单演示报价
// ==========================================

use chrono::NaiveDate;
use ocean_pricing_system::api::{ImportApi, PricingContext, QuoteApi, QuoteReply};
use ocean_pricing_system::config::PricingPaths;
use ocean_pricing_system::domain::quote::{
    ContainerPlanItem, CustomerInfo, EngineOptions, QuoteRequest, ShipmentRequest,
};
use ocean_pricing_system::domain::types::ContainerType;
use ocean_pricing_system::logging;

fn print_usage() {
    println!("==================================================");
    println!("海运整柜定价系统 v{}", ocean_pricing_system::VERSION);
    println!("==================================================");
    println!();
    println!("用法:");
    println!("  ocean-pricing-system normalize [--include-expired] [--cutoff YYYY-MM-DD] [--base-dir DIR]");
    println!("  ocean-pricing-system quote-demo [--base-dir DIR]");
    println!();
    println!("环境变量:");
    println!("  OCEAN_PRICING_BASE_DIR  工作目录（含 Raw/Data/Output）");
    println!("  RUST_LOG                日志级别（默认 info）");
}

/// 取 --key value 形式的参数
fn arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|idx| args.get(idx + 1))
        .cloned()
}

fn resolve_paths(args: &[String]) -> PricingPaths {
    match arg_value(args, "--base-dir") {
        Some(dir) => PricingPaths::new(dir),
        None => PricingPaths::resolve_default(),
    }
}

fn run_normalize(args: &[String]) {
    let paths = resolve_paths(args);
    let include_expired = args.iter().any(|a| a == "--include-expired");
    let cutoff: NaiveDate = match arg_value(args, "--cutoff") {
        Some(raw) => raw.parse().expect("--cutoff 需为 YYYY-MM-DD 格式"),
        None => chrono::Local::now().date_naive(),
    };

    tracing::info!(base_dir = %paths.base_dir.display(), cutoff = %cutoff, "开始整合");

    let api = ImportApi::new(paths);
    let report = api
        .normalize_all(cutoff, include_expired)
        .expect("运价整合失败");

    println!("==================================================");
    println!("整合完成");
    println!("  处理文件: {}", report.files_processed.len());
    println!("  跳过文件: {}", report.files_skipped.len());
    println!("  长表记录: {}", report.record_count);
    println!("  Master 行: {}", report.master_rows);
    println!("  历史行  : {}", report.history_rows);
    println!("  版本    : {}", report.version_label);
    println!("  工作簿  : {}", report.workbook_path.display());
    println!("==================================================");
}

fn run_quote_demo(args: &[String]) {
    let paths = resolve_paths(args);
    let today = chrono::Local::now().date_naive();

    let ctx = PricingContext::load(&paths).expect("无法装载 Master 上下文");
    let api = QuoteApi::new(&paths).expect("无法初始化报价接口");

    let request = QuoteRequest {
        customer: CustomerInfo {
            name: "Demo Customer".to_string(),
            email: Some("demo@example.com".to_string()),
            ..CustomerInfo::default()
        },
        shipment: ShipmentRequest::new("HCM", "LOS ANGELES"),
        containers: vec![ContainerPlanItem::new(ContainerType::Hq40, 1)],
        engine_options: EngineOptions::default(),
    };

    let reply = api
        .generate_quote(&ctx, &request, today)
        .expect("报价执行失败");

    match &reply {
        QuoteReply::Success(quote) => {
            println!("==================================================");
            println!("QUOTE REF : {}", quote.quote_ref_no);
            println!("QUOTE DATE: {}", quote.quote_date);
            println!("ROUTE     : {}", quote.summary.route);
            println!("CONTAINERS: {}", quote.summary.containers_summary);
            println!("--------------------------------------------------");
            for option in &quote.options {
                let tag = if option.is_recommended {
                    " (RECOMMENDED)"
                } else {
                    ""
                };
                println!("Option {}{}", option.index, tag);
                println!("  Carrier : {}", option.carrier);
                println!("  Total   : {} {}", option.total_ocean_amount, option.currency);
                if let Some(schedule) = &option.schedule {
                    println!(
                        "  ETD/ETA : {} / {}",
                        schedule.etd,
                        schedule
                            .eta
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "-".to_string())
                    );
                }
                println!("  Notes   : {}", option.notes);
            }
            println!("==================================================");
        }
        QuoteReply::Failure(failure) => {
            println!("[{}] {}", failure.error, failure.message);
        }
    }
}

fn main() {
    // 初始化日志系统
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("normalize") => run_normalize(&args[1..]),
        Some("quote-demo") => run_quote_demo(&args[1..]),
        _ => print_usage(),
    }
}
