// ==========================================
// 海运整柜定价系统 - 报价留档仓储
// ==========================================
// 职责: 管理 quote_log 表（只追加的内部留档）
// 说明: 报价结果本身不落库，仅按需留档一条 JSON 快照
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::quote::QuoteSuccess;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 留档条目（列表查询用）
#[derive(Debug, Clone)]
pub struct QuoteLogEntry {
    pub log_id: String,
    pub quote_ref_no: String,
    pub customer_name: String,
    pub route: String,
    pub created_at: String,
}

pub struct QuoteLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl QuoteLogRepository {
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
            CREATE TABLE IF NOT EXISTS quote_log (
              log_id TEXT PRIMARY KEY,
              quote_ref_no TEXT NOT NULL,
              customer_name TEXT NOT NULL,
              route TEXT NOT NULL,
              payload_json TEXT NOT NULL,
              created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_quote_log_ref
              ON quote_log(quote_ref_no);
            CREATE INDEX IF NOT EXISTS idx_quote_log_created_at
              ON quote_log(created_at DESC);
            "#,
        )?;
        Ok(())
    }

    /// 追加一条报价留档
    pub fn append(&self, quote: &QuoteSuccess) -> RepositoryResult<String> {
        let log_id = Uuid::new_v4().to_string();
        let payload = serde_json::to_string(quote)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO quote_log (log_id, quote_ref_no, customer_name, route, payload_json)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                log_id,
                quote.quote_ref_no,
                quote.summary.customer_name,
                quote.summary.route,
                payload,
            ],
        )?;
        Ok(log_id)
    }

    /// 最近 N 条留档（按时间倒序）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<QuoteLogEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT log_id, quote_ref_no, customer_name, route, created_at
            FROM quote_log
            ORDER BY created_at DESC, log_id
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(QuoteLogEntry {
                log_id: row.get(0)?,
                quote_ref_no: row.get(1)?,
                customer_name: row.get(2)?,
                route: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
