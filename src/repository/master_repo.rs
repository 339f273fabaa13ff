// ==========================================
// 海运整柜定价系统 - Master 运价仓储
// ==========================================
// 职责: 管理 master_rate(现行) / old_rate(全量历史) 两张宽表
// 语义: 每次整合整表覆盖（先清后写），历史只增不改
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::rate::{MasterRow, MasterTables, RateDelta};
use crate::domain::types::{ContainerType, RateType, MASTER_CONTAINER_ORDER};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub struct MasterRateRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MasterRateRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS master_rate (
              row_id INTEGER PRIMARY KEY AUTOINCREMENT,
              pol TEXT NOT NULL,
              pod TEXT NOT NULL,
              place_of_delivery TEXT NOT NULL,
              routing_note TEXT,
              carrier TEXT NOT NULL,
              effective_date TEXT,
              expiration_date TEXT,
              contract_identifier TEXT,
              commodity_type TEXT,
              rate_type TEXT NOT NULL,
              r20gp REAL,
              r40gp REAL,
              r40hq REAL,
              r45hq REAL,
              r40nor REAL,
              deltas_json TEXT NOT NULL DEFAULT '{}'
            );

            CREATE TABLE IF NOT EXISTS old_rate (
              row_id INTEGER PRIMARY KEY AUTOINCREMENT,
              pol TEXT NOT NULL,
              pod TEXT NOT NULL,
              place_of_delivery TEXT NOT NULL,
              routing_note TEXT,
              carrier TEXT NOT NULL,
              effective_date TEXT,
              expiration_date TEXT,
              contract_identifier TEXT,
              commodity_type TEXT,
              rate_type TEXT NOT NULL,
              r20gp REAL,
              r40gp REAL,
              r40hq REAL,
              r45hq REAL,
              r40nor REAL
            );

            CREATE INDEX IF NOT EXISTS idx_master_rate_pol
              ON master_rate(pol);
            CREATE INDEX IF NOT EXISTS idx_master_rate_place
              ON master_rate(place_of_delivery);
            CREATE INDEX IF NOT EXISTS idx_old_rate_pol
              ON old_rate(pol);
            "#,
        )?;
        Ok(())
    }

    /// 整表覆盖写入整合结果（事务内先清后写）
    pub fn replace_all(&self, tables: &MasterTables) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute("DELETE FROM master_rate", [])?;
        tx.execute("DELETE FROM old_rate", [])?;

        for row in &tables.current {
            let deltas_json = serde_json::to_string(&display_keyed_deltas(&row.deltas))?;
            tx.execute(
                r#"
                INSERT INTO master_rate (
                    pol, pod, place_of_delivery, routing_note, carrier,
                    effective_date, expiration_date, contract_identifier,
                    commodity_type, rate_type,
                    r20gp, r40gp, r40hq, r45hq, r40nor, deltas_json
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                "#,
                params![
                    row.pol,
                    row.pod,
                    row.place_of_delivery,
                    row.routing_note,
                    row.carrier,
                    row.effective_date.map(|d| d.to_string()),
                    row.expiration_date.map(|d| d.to_string()),
                    row.contract_identifier,
                    row.commodity_type,
                    row.rate_type.to_string(),
                    row.rate(ContainerType::Gp20),
                    row.rate(ContainerType::Gp40),
                    row.rate(ContainerType::Hq40),
                    row.rate(ContainerType::Hq45),
                    row.rate(ContainerType::Nor40),
                    deltas_json,
                ],
            )?;
        }

        for row in &tables.history {
            tx.execute(
                r#"
                INSERT INTO old_rate (
                    pol, pod, place_of_delivery, routing_note, carrier,
                    effective_date, expiration_date, contract_identifier,
                    commodity_type, rate_type,
                    r20gp, r40gp, r40hq, r45hq, r40nor
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                "#,
                params![
                    row.pol,
                    row.pod,
                    row.place_of_delivery,
                    row.routing_note,
                    row.carrier,
                    row.effective_date.map(|d| d.to_string()),
                    row.expiration_date.map(|d| d.to_string()),
                    row.contract_identifier,
                    row.commodity_type,
                    row.rate_type.to_string(),
                    row.rate(ContainerType::Gp20),
                    row.rate(ContainerType::Gp40),
                    row.rate(ContainerType::Hq40),
                    row.rate(ContainerType::Hq45),
                    row.rate(ContainerType::Nor40),
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// 读取现行 Master 快照
    pub fn load_master(&self) -> RepositoryResult<Vec<MasterRow>> {
        self.load_table("master_rate", true)
    }

    /// 读取全量历史（Old_Rate）
    pub fn load_history(&self) -> RepositoryResult<Vec<MasterRow>> {
        self.load_table("old_rate", false)
    }

    pub fn count_master(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM master_rate", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn load_table(&self, table: &str, with_deltas: bool) -> RepositoryResult<Vec<MasterRow>> {
        let conn = self.get_conn()?;
        let delta_col = if with_deltas {
            ", deltas_json"
        } else {
            ""
        };
        let sql = format!(
            "SELECT pol, pod, place_of_delivery, routing_note, carrier, \
             effective_date, expiration_date, contract_identifier, commodity_type, \
             rate_type, r20gp, r40gp, r40hq, r45hq, r40nor{} FROM {} ORDER BY row_id",
            delta_col, table
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| map_master_row(row, with_deltas))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

/// 环比 JSON 以柜型展示名为键（"40HQ" 等），与工作簿列名一致
fn display_keyed_deltas(deltas: &BTreeMap<ContainerType, RateDelta>) -> BTreeMap<String, RateDelta> {
    deltas
        .iter()
        .map(|(container, delta)| (container.to_string(), *delta))
        .collect()
}

fn parse_date_opt(value: Option<String>) -> Option<NaiveDate> {
    value.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

fn map_master_row(row: &Row<'_>, with_deltas: bool) -> rusqlite::Result<MasterRow> {
    let rate_type_str: String = row.get(9)?;
    let rate_type = RateType::from_db_str(&rate_type_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            9,
            rusqlite::types::Type::Text,
            format!("未知运价表类型: {}", rate_type_str).into(),
        )
    })?;

    let mut rates = BTreeMap::new();
    for (offset, container) in MASTER_CONTAINER_ORDER.iter().enumerate() {
        let value: Option<f64> = row.get(10 + offset)?;
        if let Some(amount) = value {
            rates.insert(*container, amount);
        }
    }

    let mut deltas = BTreeMap::new();
    if with_deltas {
        let deltas_json: String = row.get(15)?;
        let parsed: BTreeMap<String, RateDelta> =
            serde_json::from_str(&deltas_json).unwrap_or_default();
        for (label, delta) in parsed {
            if let Some(container) = ContainerType::from_label(&label) {
                deltas.insert(container, delta);
            }
        }
    }

    Ok(MasterRow {
        pol: row.get(0)?,
        pod: row.get(1)?,
        place_of_delivery: row.get(2)?,
        routing_note: row.get(3)?,
        carrier: row.get(4)?,
        effective_date: parse_date_opt(row.get(5)?),
        expiration_date: parse_date_opt(row.get(6)?),
        contract_identifier: row.get(7)?,
        commodity_type: row.get(8)?,
        rate_type,
        rates,
        deltas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::DeltaDirection;
    use tempfile::NamedTempFile;

    fn sample_tables() -> MasterTables {
        let mut rates = BTreeMap::new();
        rates.insert(ContainerType::Gp40, 2500.0);
        rates.insert(ContainerType::Hq40, 2600.0);

        let mut deltas = BTreeMap::new();
        deltas.insert(ContainerType::Gp40, RateDelta::classify(2500.0, 2400.0));

        let row = MasterRow {
            pol: "HCM".into(),
            pod: "USLAX".into(),
            place_of_delivery: "LOS ANGELES".into(),
            routing_note: Some("DIRECT".into()),
            carrier: "CMA".into(),
            effective_date: Some("2025-12-01".parse().unwrap()),
            expiration_date: Some("2025-12-31".parse().unwrap()),
            contract_identifier: Some("C1".into()),
            commodity_type: Some("FAK".into()),
            rate_type: RateType::Fak,
            rates,
            deltas,
        };

        MasterTables {
            current: vec![row.clone()],
            history: vec![row],
        }
    }

    #[test]
    fn test_replace_and_load_roundtrip() {
        let temp = NamedTempFile::new().unwrap();
        let repo = MasterRateRepository::new(temp.path().to_str().unwrap()).unwrap();

        repo.replace_all(&sample_tables()).unwrap();
        assert_eq!(repo.count_master().unwrap(), 1);

        let loaded = repo.load_master().unwrap();
        assert_eq!(loaded.len(), 1);
        let row = &loaded[0];
        assert_eq!(row.carrier, "CMA");
        assert_eq!(row.rate(ContainerType::Gp40), Some(2500.0));
        assert_eq!(row.rate(ContainerType::Gp20), None);
        assert_eq!(row.effective_date, Some("2025-12-01".parse().unwrap()));

        let delta = row.deltas.get(&ContainerType::Gp40).unwrap();
        assert_eq!(delta.direction, DeltaDirection::Increase);
        assert_eq!(delta.magnitude, 100.0);

        // 历史表不带环比
        let history = repo.load_history().unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].deltas.is_empty());
    }

    #[test]
    fn test_replace_overwrites_previous_master() {
        let temp = NamedTempFile::new().unwrap();
        let repo = MasterRateRepository::new(temp.path().to_str().unwrap()).unwrap();

        repo.replace_all(&sample_tables()).unwrap();
        repo.replace_all(&sample_tables()).unwrap();
        // 二次写入不叠加
        assert_eq!(repo.count_master().unwrap(), 1);
    }

    #[test]
    fn test_empty_tables_roundtrip() {
        let temp = NamedTempFile::new().unwrap();
        let repo = MasterRateRepository::new(temp.path().to_str().unwrap()).unwrap();

        repo.replace_all(&MasterTables::default()).unwrap();
        assert!(repo.load_master().unwrap().is_empty());
        assert!(repo.load_history().unwrap().is_empty());
    }
}
