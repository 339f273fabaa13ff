// ==========================================
// 海运整柜定价系统 - 报价编号引擎
// ==========================================
// 格式: <CUSTOMERKEY>-<DDMON>-<SEQ>
// 例如: SORACHI-27NOV-1, SORACHI-27NOV-2
// 序号按 (客户键, 日期码) 由仓储原子递增，同日不复用
// ==========================================

use crate::repository::error::RepositoryResult;
use crate::repository::quote_counter_repo::QuoteCounterRepository;
use chrono::NaiveDate;

/// 客户名 -> 客户键
///
/// 取首个空白分隔 token，去非字母数字后大写；
/// 空结果退回 "CUST"。
pub fn normalize_customer_key(name: &str) -> String {
    let first_word = name.trim().split_whitespace().next().unwrap_or("");
    let key: String = first_word
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if key.is_empty() {
        "CUST".to_string()
    } else {
        key
    }
}

/// 日期码: DD + 月份缩写大写，如 27NOV
pub fn date_code(today: NaiveDate) -> String {
    today.format("%d%b").to_string().to_uppercase()
}

/// 生成报价编号（序号递增为本函数唯一副作用）
pub fn build_quote_ref(
    counter_repo: &QuoteCounterRepository,
    customer_name: &str,
    today: NaiveDate,
) -> RepositoryResult<String> {
    let customer_key = normalize_customer_key(customer_name);
    let code = date_code(today);
    let seq = counter_repo.next_seq(&customer_key, &code)?;
    Ok(format!("{}-{}-{}", customer_key, code, seq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_normalize_customer_key() {
        assert_eq!(normalize_customer_key("Sorachi Logistics Co., Ltd"), "SORACHI");
        assert_eq!(normalize_customer_key("A.B.C Trading"), "ABC");
        assert_eq!(normalize_customer_key("   "), "CUST");
        assert_eq!(normalize_customer_key("!!!"), "CUST");
    }

    #[test]
    fn test_date_code_format() {
        let day: NaiveDate = "2025-11-27".parse().unwrap();
        assert_eq!(date_code(day), "27NOV");
    }

    #[test]
    fn test_build_quote_ref_sequence() {
        let temp = NamedTempFile::new().unwrap();
        let repo = QuoteCounterRepository::new(temp.path().to_str().unwrap()).unwrap();
        let day: NaiveDate = "2025-11-27".parse().unwrap();

        assert_eq!(
            build_quote_ref(&repo, "Sorachi Logistics Co., Ltd", day).unwrap(),
            "SORACHI-27NOV-1"
        );
        assert_eq!(
            build_quote_ref(&repo, "Sorachi Logistics Co., Ltd", day).unwrap(),
            "SORACHI-27NOV-2"
        );

        // 换日从 1 重新起算
        let next_day: NaiveDate = "2025-11-28".parse().unwrap();
        assert_eq!(
            build_quote_ref(&repo, "Sorachi Logistics Co., Ltd", next_day).unwrap(),
            "SORACHI-28NOV-1"
        );
    }
}
