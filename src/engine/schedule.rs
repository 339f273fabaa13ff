// ==========================================
// 海运整柜定价系统 - 船期预估引擎
// ==========================================
// 职责: 船期表 -> 航次索引; 按 船司+POL+POD+货好日 解析
//       最近航次与预估航程区间
// 规则:
// - POD 可为 5 位码 / 斜杠列表 / 3 位简写 / USEC/USWC 区域别名
// - 周选择: 取 ISO 周号 >= 货好周的最早周，无则退回最早可用周
// - 给定货好日时 ETD 不得早于货好日（按周班期前推）
// - 任一环节无匹配 -> None（"船期未知"，不是报价失败）
// ==========================================

use crate::domain::schedule::{SailingSlot, ScheduleResult, ScheduleRow, ServiceInfo};
use crate::domain::types::Region;
use chrono::{Datelike, Days, NaiveDate, Weekday};

// ==========================================
// 港口区域表
// ==========================================

/// 美西（含温哥华/塔科马）
pub const WEST_PORTS: &[&str] = &[
    "USLAX", "USLGB", "USOAK", "USTIW", "USSEA", "CAVAN", "CATIW",
];

/// 美东
pub const EC_PORTS: &[&str] = &[
    "USNYC", "USSAV", "USCHS", "USORF", "USJAX", "USBAL", "USPHL",
];

/// 美湾
pub const GULF_PORTS: &[&str] = &["USHOU", "USMOB", "USNOL", "USNOLA"];

/// 3 位简写 -> 5 位港口代码
pub const THREE_TO_FIVE: &[(&str, &str)] = &[
    // 美东/美湾
    ("CHS", "USCHS"),
    ("SAV", "USSAV"),
    ("NYC", "USNYC"),
    ("ORF", "USORF"),
    ("JAX", "USJAX"),
    ("BAL", "USBAL"),
    ("HOU", "USHOU"),
    // 美西
    ("LAX", "USLAX"),
    ("LGB", "USLGB"),
    ("OAK", "USOAK"),
    ("TIW", "USTIW"),
    ("SEA", "USSEA"),
    ("VAN", "CAVAN"),
];

/// 按 POD 代码分区
pub fn classify_region(pod_code: &str) -> Region {
    let pod = pod_code.trim().to_uppercase();
    if WEST_PORTS.contains(&pod.as_str()) {
        return Region::West;
    }
    if EC_PORTS.contains(&pod.as_str()) {
        return Region::East;
    }
    if GULF_PORTS.contains(&pod.as_str()) {
        return Region::Gulf;
    }
    Region::Other
}

/// 航程预估（天）：美西 20-24，美东/美湾 40-45，其他 30-40
pub fn estimate_transit(pod_code: &str) -> (u32, u32) {
    match classify_region(pod_code) {
        Region::West => (20, 24),
        Region::East | Region::Gulf => (40, 45),
        Region::Other => (30, 40),
    }
}

// ==========================================
// 服务串解析
// ==========================================

const DAY_TAGS: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

fn weekday_index(tag: &str) -> Option<u32> {
    DAY_TAGS
        .iter()
        .position(|d| *d == tag)
        .map(|idx| idx as u32)
}

fn weekday_from_index(idx: u32) -> Weekday {
    match idx {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

/// 提取字符串中所有括号内的 token
fn paren_tokens(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_paren = false;
    for ch in raw.chars() {
        match ch {
            '(' => {
                in_paren = true;
                current.clear();
            }
            ')' => {
                if in_paren {
                    tokens.push(current.trim().to_uppercase());
                }
                in_paren = false;
            }
            _ if in_paren => current.push(ch),
            _ => {}
        }
    }
    tokens
}

impl ServiceInfo {
    /// 解析服务串
    ///
    /// "GS2 (SUN)"        -> service=GS2, pol_tag=ANY, weekday=SUN
    /// "PS3 (HCM) (SAT)"  -> service=PS3, pol_tag=HCM, weekday=SAT
    pub fn parse(raw: &str) -> Self {
        let base = raw.split('(').next().unwrap_or("").trim().to_uppercase();

        let mut pol_tag = "ANY".to_string();
        let mut weekday = "SUN".to_string();

        for token in paren_tokens(raw) {
            if token == "HCM" || token == "HPH" {
                pol_tag = token;
            } else {
                let t3: String = token.chars().take(3).collect();
                if weekday_index(&t3).is_some() {
                    weekday = t3;
                }
            }
        }

        ServiceInfo {
            service_name: base,
            pol_tag,
            weekday,
        }
    }
}

// ==========================================
// POD 候选展开
// ==========================================

/// Master 的 POD 字段展开为可匹配的港口代码候选集
///
/// "USSAV/CHS" -> [USSAV, CHS, USCHS]
/// "USEC"      -> 全部美东港
pub fn expand_pod_candidates(pod_raw: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let mut push = |value: String| {
        if !value.is_empty() && !candidates.contains(&value) {
            candidates.push(value);
        }
    };

    for token in pod_raw.to_uppercase().split(['/', ';', ',']) {
        let t = token.trim();
        if t.is_empty() {
            continue;
        }

        // 区域别名
        if t == "USEC" {
            for port in EC_PORTS {
                push(port.to_string());
            }
            continue;
        }
        if t == "USWC" {
            for port in WEST_PORTS {
                push(port.to_string());
            }
            continue;
        }

        // 完整 5 位码（US/CA 前缀）
        if t.len() == 5 && (t.starts_with("US") || t.starts_with("CA")) {
            push(t.to_string());
            continue;
        }

        // 3 位简写
        if t.len() == 3 {
            push(t.to_string());
            match THREE_TO_FIVE.iter().find(|(short, _)| *short == t) {
                Some((_, full)) => push(full.to_string()),
                None => push(format!("US{}", t)),
            }
            continue;
        }

        push(t.to_string());
    }

    candidates
}

// ==========================================
// 航次索引
// ==========================================

/// ISO (年, 周, 星期) -> 具体日期
fn iso_to_date(year: i32, week: u32, weekday_idx: u32) -> Option<NaiveDate> {
    NaiveDate::from_isoywd_opt(year, week, weekday_from_index(weekday_idx))
}

/// 周标签 "W49 (07 DEC - 13 DEC)" -> 周号 49
fn parse_week_no(label: &str) -> Option<u32> {
    let trimmed = label.trim().to_uppercase();
    let digits: String = trimmed
        .strip_prefix('W')?
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// 一次构建、多次复用的船期索引
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    slots: Vec<SailingSlot>,
}

impl ScheduleIndex {
    /// 从船期表原始行构建索引
    ///
    /// 每条槽位 = (船司, 服务, POL 标签, 星期, POD 代码, 周号, 船名)
    pub fn build(rows: &[ScheduleRow]) -> Self {
        let mut slots = Vec::new();

        for row in rows {
            let service = ServiceInfo::parse(&row.service_raw);

            let carriers: Vec<String> = row
                .carrier_raw
                .split('/')
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .collect();
            let pod_codes: Vec<String> = row
                .pod_raw
                .split(';')
                .map(|p| p.trim().to_uppercase())
                .filter(|p| !p.is_empty())
                .collect();

            for (week_label, vessel) in &row.weeks {
                let Some(week_no) = parse_week_no(week_label) else {
                    continue;
                };
                for carrier in &carriers {
                    for pod_code in &pod_codes {
                        slots.push(SailingSlot {
                            carrier: carrier.clone(),
                            service_name: service.service_name.clone(),
                            pol_tag: service.pol_tag.clone(),
                            weekday: service.weekday.clone(),
                            pod_code: pod_code.clone(),
                            week_no,
                            week_label: week_label.clone(),
                            vessel: vessel.clone(),
                        });
                    }
                }
            }
        }

        Self { slots }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 解析指定 船司+POL+POD 的最近航次
    ///
    /// cargo_ready 缺省时以 today 为基准周。无匹配 -> None。
    pub fn get_schedule_for(
        &self,
        carrier: &str,
        pol: &str,
        pod_code: &str,
        cargo_ready: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Option<ScheduleResult> {
        let carrier_up = carrier.trim().to_uppercase();
        let pol_up = pol.trim().to_uppercase();
        let pod_up = pod_code.trim().to_uppercase();

        if carrier_up.is_empty() || pod_up.is_empty() || self.slots.is_empty() {
            return None;
        }

        let candidates = expand_pod_candidates(&pod_up);

        let matching: Vec<&SailingSlot> = self
            .slots
            .iter()
            .filter(|slot| {
                slot.carrier == carrier_up
                    && candidates.contains(&slot.pod_code)
                    && (slot.pol_tag == "ANY" || slot.pol_tag == pol_up)
            })
            .collect();
        if matching.is_empty() {
            return None;
        }

        let cargo_day = cargo_ready.unwrap_or(today);
        let iso = cargo_day.iso_week();
        let cargo_week = iso.week();
        let iso_year = iso.year();

        // 周选择: >= 货好周的最早周，无则退回最早可用周
        let chosen = matching
            .iter()
            .filter(|slot| slot.week_no >= cargo_week)
            .min_by_key(|slot| slot.week_no)
            .or_else(|| matching.iter().min_by_key(|slot| slot.week_no))?;

        let weekday_idx = weekday_index(&chosen.weekday).unwrap_or(6);
        let mut etd = iso_to_date(iso_year, chosen.week_no, weekday_idx)?;

        // 给定货好日时 ETD 不得早于货好日：按周班期前推
        if cargo_ready.is_some() {
            while etd < cargo_day {
                etd = etd.checked_add_days(Days::new(7))?;
            }
        }

        let (transit_min, transit_max) = estimate_transit(&pod_up);
        let eta = etd.checked_add_days(Days::new(u64::from(transit_min + transit_max) / 2));

        Some(ScheduleResult {
            carrier: chosen.carrier.clone(),
            service: chosen.service_name.clone(),
            pol_tag: chosen.pol_tag.clone(),
            weekday: chosen.weekday.clone(),
            pod_code: pod_up,
            week_no: chosen.week_no,
            week_label: chosen.week_label.clone(),
            vessel: chosen.vessel.clone(),
            etd,
            eta,
            transit_min,
            transit_max,
        })
    }
}
