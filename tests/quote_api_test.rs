// ==========================================
// 报价接口集成测试
// ==========================================
// 测试目标: 报价编号盖章与序号递增 / 留档 /
//           业务失败以数据返回 / TOP5 选择策略
// ==========================================


use chrono::NaiveDate;
use ocean_pricing_system::api::{PricingContext, QuoteApi, QuoteReply};
use ocean_pricing_system::domain::quote::{
    ContainerPlanItem, CustomerInfo, EngineOptions, QuoteRequest, ShipmentRequest,
};
use ocean_pricing_system::domain::rate::MasterTables;
use ocean_pricing_system::domain::types::{ContainerType, QuoteErrorCode};
use ocean_pricing_system::engine::schedule::ScheduleIndex;
use ocean_pricing_system::repository::master_repo::MasterRateRepository;
use ocean_pricing_system::repository::quote_log_repo::QuoteLogRepository;
use test_helpers::{create_test_workspace, master_row};

fn seed_master(paths: &ocean_pricing_system::config::PricingPaths) {
    let tables = MasterTables {
        current: vec![
            master_row("HCM", "LOS ANGELES, CA", "CMA", &[(ContainerType::Hq40, 2500.0)]),
            master_row("HCM", "LOS ANGELES, CA", "ONE", &[(ContainerType::Hq40, 2400.0)]),
            master_row("HCM", "LOS ANGELES, CA", "YML", &[(ContainerType::Hq40, 2700.0)]),
        ],
        history: Vec::new(),
    };
    let repo = MasterRateRepository::new(&paths.master_db_path().to_string_lossy()).unwrap();
    repo.replace_all(&tables).unwrap();
}

fn demo_request() -> QuoteRequest {
    QuoteRequest {
        customer: CustomerInfo {
            name: "Sorachi Logistics Co., Ltd".into(),
            ..CustomerInfo::default()
        },
        shipment: ShipmentRequest::new("HCM", "LOS ANGELES"),
        containers: vec![ContainerPlanItem::new(ContainerType::Hq40, 1)],
        engine_options: EngineOptions::default(),
    }
}

fn today() -> NaiveDate {
    "2025-11-27".parse().unwrap()
}

#[test]
fn test_quote_refs_strictly_increasing_same_day() {
    let (_temp_dir, paths) = create_test_workspace();
    seed_master(&paths);

    let ctx = PricingContext::load(&paths).unwrap();
    let api = QuoteApi::new(&paths).unwrap();

    let mut refs = Vec::new();
    for _ in 0..3 {
        match api.generate_quote(&ctx, &demo_request(), today()).unwrap() {
            QuoteReply::Success(quote) => refs.push(quote.quote_ref_no.clone()),
            QuoteReply::Failure(failure) => panic!("unexpected failure: {:?}", failure),
        }
    }

    assert_eq!(
        refs,
        vec!["SORACHI-27NOV-1", "SORACHI-27NOV-2", "SORACHI-27NOV-3"]
    );

    // 换日从 1 重新起算
    let next_day: NaiveDate = "2025-11-28".parse().unwrap();
    match api.generate_quote(&ctx, &demo_request(), next_day).unwrap() {
        QuoteReply::Success(quote) => assert_eq!(quote.quote_ref_no, "SORACHI-28NOV-1"),
        QuoteReply::Failure(failure) => panic!("unexpected failure: {:?}", failure),
    }
}

#[test]
fn test_successful_quote_is_logged() {
    let (_temp_dir, paths) = create_test_workspace();
    seed_master(&paths);

    let ctx = PricingContext::load(&paths).unwrap();
    let api = QuoteApi::new(&paths).unwrap();
    let reply = api.generate_quote(&ctx, &demo_request(), today()).unwrap();
    assert!(reply.is_success());

    let log_repo = QuoteLogRepository::new(&paths.master_db_path().to_string_lossy()).unwrap();
    let entries = log_repo.list_recent(10).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].quote_ref_no, "SORACHI-27NOV-1");
}

#[test]
fn test_no_match_returns_failure_data_not_error() {
    let (_temp_dir, paths) = create_test_workspace();
    seed_master(&paths);

    let ctx = PricingContext::load(&paths).unwrap();
    let api = QuoteApi::new(&paths).unwrap();

    let mut request = demo_request();
    request.shipment.place_of_delivery = "NOWHERE".into();

    match api.generate_quote(&ctx, &request, today()).unwrap() {
        QuoteReply::Failure(failure) => {
            assert_eq!(failure.error, QuoteErrorCode::NoRateFound);
            assert!(!failure.message.is_empty());
        }
        QuoteReply::Success(_) => panic!("expected failure"),
    }

    // 失败不消耗报价序号
    match api.generate_quote(&ctx, &demo_request(), today()).unwrap() {
        QuoteReply::Success(quote) => assert_eq!(quote.quote_ref_no, "SORACHI-27NOV-1"),
        QuoteReply::Failure(failure) => panic!("unexpected failure: {:?}", failure),
    }
}

#[test]
fn test_options_sorted_one_per_carrier() {
    let (_temp_dir, paths) = create_test_workspace();
    seed_master(&paths);

    let ctx = PricingContext::load(&paths).unwrap();
    let api = QuoteApi::new(&paths).unwrap();

    match api.generate_quote(&ctx, &demo_request(), today()).unwrap() {
        QuoteReply::Success(quote) => {
            assert_eq!(quote.options.len(), 3);
            assert_eq!(quote.options[0].carrier, "ONE");
            assert!(quote.options[0].is_recommended);
            assert!(quote
                .options
                .windows(2)
                .all(|w| w[0].total_ocean_amount <= w[1].total_ocean_amount));
        }
        QuoteReply::Failure(failure) => panic!("unexpected failure: {:?}", failure),
    }
}

#[test]
fn test_missing_master_db_is_hard_error() {
    let (_temp_dir, paths) = create_test_workspace();
    // 未执行 normalize -> Master 库不存在
    let result = PricingContext::load(&paths);
    assert!(result.is_err());
}

#[test]
fn test_preview_cost_uses_base_rates() {
    let (_temp_dir, paths) = create_test_workspace();
    seed_master(&paths);

    let ctx = PricingContext::load(&paths).unwrap();
    let preview = ctx
        .preview_cost(
            &ShipmentRequest::new("HCM", "LOS ANGELES"),
            &[ContainerPlanItem::new(ContainerType::Hq40, 1)],
        )
        .unwrap();

    assert_eq!(preview.rows.len(), 3);
    assert_eq!(preview.rows[0].carrier, "ONE");
    assert_eq!(preview.rows[0].total_base, 2400.0);
}

#[test]
fn test_schedule_attached_when_index_present() {
    let (_temp_dir, paths) = create_test_workspace();
    seed_master(&paths);

    let repo = MasterRateRepository::new(&paths.master_db_path().to_string_lossy()).unwrap();
    let master = repo.load_master().unwrap();

    let rows = vec![ocean_pricing_system::domain::schedule::ScheduleRow {
        carrier_raw: "ONE".into(),
        service_raw: "PS3 (HCM) (SAT)".into(),
        pod_raw: "USLAX".into(),
        weeks: vec![("W50 (14 DEC - 20 DEC)".into(), "VESSEL B".into())],
    }];
    let ctx = PricingContext::new(master, ScheduleIndex::build(&rows));

    let api = QuoteApi::new(&paths).unwrap();
    match api.generate_quote(&ctx, &demo_request(), today()).unwrap() {
        QuoteReply::Success(quote) => {
            let one_option = quote
                .options
                .iter()
                .find(|o| o.carrier == "ONE")
                .expect("ONE option");
            let schedule = one_option.schedule.as_ref().expect("schedule attached");
            assert_eq!(schedule.vessel, "VESSEL B");
            assert_eq!(schedule.transit_min, 20);
            assert_eq!(schedule.transit_max, 24);

            // 其他船司没有船期 -> "schedule unknown"，选项照常返回
            let cma_option = quote.options.iter().find(|o| o.carrier == "CMA").unwrap();
            assert!(cma_option.schedule.is_none());
        }
        QuoteReply::Failure(failure) => panic!("unexpected failure: {:?}", failure),
    }
}
