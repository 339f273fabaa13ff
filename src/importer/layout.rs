// ==========================================
// 海运整柜定价系统 - 运价表版式表
// ==========================================
// 运价表为"定列"版式（列偏移固定，不看表头文字）。
// 每种运价表类型一份列映射；新增表类型改这里的数据即可。
// ==========================================

use crate::domain::types::{ContainerType, RateType};

/// 原始 PUC 列块（随 FAK/ONE 表自带，入表时对 SOC 行做扣减）
#[derive(Debug, Clone, Copy)]
pub struct PucBlockColumns {
    pub c20: usize,
    pub c40: usize,
    pub c40hq: usize,
    pub c45: usize,
}

/// 单一运价表类型的列映射
#[derive(Debug, Clone)]
pub struct RateSheetLayout {
    pub rate_type: RateType,
    /// 跳过的表头行数
    pub header_rows: usize,
    pub pol: usize,
    pub pod: usize,
    pub place_of_delivery: usize,
    pub routing_note: Option<usize>,
    /// None 时用 fixed_carrier
    pub carrier: Option<usize>,
    pub fixed_carrier: Option<&'static str>,
    pub effective_date: usize,
    pub expiration_date: usize,
    pub commodity: Option<usize>,
    pub contract: Option<usize>,
    /// (柜型, 金额列) 对
    pub amounts: &'static [(ContainerType, usize)],
    pub puc_block: Option<PucBlockColumns>,
}

static FAK_AMOUNTS: [(ContainerType, usize); 5] = [
    (ContainerType::Gp20, 12),
    (ContainerType::Gp40, 13),
    (ContainerType::Hq40, 14),
    (ContainerType::Hq45, 15),
    (ContainerType::Nor40, 16),
];

static SCFI_AMOUNTS: [(ContainerType, usize); 3] = [
    (ContainerType::Gp20, 5),
    (ContainerType::Gp40, 6),
    (ContainerType::Hq40, 7),
];

static FAK_LAYOUT: RateSheetLayout = RateSheetLayout {
    rate_type: RateType::Fak,
    header_rows: 2,
    pol: 0,
    pod: 1,
    place_of_delivery: 2,
    routing_note: Some(3),
    carrier: Some(5),
    fixed_carrier: None,
    effective_date: 6,
    expiration_date: 7,
    commodity: Some(9),
    contract: Some(11),
    amounts: &FAK_AMOUNTS,
    puc_block: Some(PucBlockColumns {
        c20: 38,
        c40: 39,
        c40hq: 40,
        c45: 41,
    }),
};

// ONE 固定价表与 FAK 同列布局，但货种列不取（统一打 FIX RATE）
static ONE_SPECIAL_LAYOUT: RateSheetLayout = RateSheetLayout {
    rate_type: RateType::OneSpecialRate,
    header_rows: 2,
    pol: 0,
    pod: 1,
    place_of_delivery: 2,
    routing_note: Some(3),
    carrier: Some(5),
    fixed_carrier: None,
    effective_date: 6,
    expiration_date: 7,
    commodity: None,
    contract: Some(11),
    amounts: &FAK_AMOUNTS,
    puc_block: Some(PucBlockColumns {
        c20: 38,
        c40: 39,
        c40hq: 40,
        c45: 41,
    }),
};

static SCFI_LAYOUT: RateSheetLayout = RateSheetLayout {
    rate_type: RateType::HplScfi,
    header_rows: 2,
    pol: 0,
    pod: 1,
    place_of_delivery: 2,
    routing_note: None,
    carrier: None,
    fixed_carrier: Some("HPL"),
    effective_date: 3,
    expiration_date: 4,
    commodity: None,
    contract: None,
    amounts: &SCFI_AMOUNTS,
    puc_block: None,
};

/// 取运价表类型对应的列映射
pub fn layout_for(rate_type: RateType) -> &'static RateSheetLayout {
    match rate_type {
        RateType::Fak => &FAK_LAYOUT,
        RateType::OneSpecialRate => &ONE_SPECIAL_LAYOUT,
        RateType::HplScfi => &SCFI_LAYOUT,
    }
}

/// 从文件名推断运价表类型
///
/// 未命中任何模式 -> None（上层记警告并跳过该文件，不报错）
pub fn detect_rate_type(file_name: &str) -> Option<RateType> {
    let name_upper = file_name.to_uppercase();

    if name_upper.contains("SCFI") {
        return Some(RateType::HplScfi);
    }
    if name_upper.contains("FAK") {
        return Some(RateType::Fak);
    }

    if name_upper.contains("ONE_SPECIAL RATE") {
        return Some(RateType::OneSpecialRate);
    }
    if name_upper.contains("ONE_SPECIAL") && name_upper.contains("RATE") {
        return Some(RateType::OneSpecialRate);
    }

    if name_upper.contains("ONE_FIX")
        || name_upper.contains("ONE FIX")
        || name_upper.contains("ONE-FIX")
    {
        return Some(RateType::OneSpecialRate);
    }
    if name_upper.contains("FIX") && name_upper.contains("ONE") {
        return Some(RateType::OneSpecialRate);
    }
    if name_upper.contains("FIX") {
        return Some(RateType::OneSpecialRate);
    }

    None
}
