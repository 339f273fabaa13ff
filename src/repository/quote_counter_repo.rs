// ==========================================
// 海运整柜定价系统 - 报价序号仓储
// ==========================================
// 职责: 管理 quote_counter 表，(客户键, 日期码) 维度的
//       严格递增序号
// 并发: 单条 upsert + RETURNING，自增在库内原子完成
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct QuoteCounterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl QuoteCounterRepository {
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
            CREATE TABLE IF NOT EXISTS quote_counter (
              customer_key TEXT NOT NULL,
              date_code TEXT NOT NULL,
              counter INTEGER NOT NULL,
              PRIMARY KEY (customer_key, date_code)
            );
            "#,
        )?;
        Ok(())
    }

    /// 取下一个序号（同客户同日严格递增，换日从 1 重新起算）
    pub fn next_seq(&self, customer_key: &str, date_code: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let seq: i64 = conn.query_row(
            r#"
            INSERT INTO quote_counter (customer_key, date_code, counter)
            VALUES (?1, ?2, 1)
            ON CONFLICT(customer_key, date_code)
            DO UPDATE SET counter = counter + 1
            RETURNING counter
            "#,
            params![customer_key, date_code],
            |row| row.get(0),
        )?;
        Ok(seq)
    }

    /// 查询当前序号（无记录 -> None）
    pub fn current_seq(&self, customer_key: &str, date_code: &str) -> RepositoryResult<Option<i64>> {
        use rusqlite::OptionalExtension;
        let conn = self.get_conn()?;
        let seq: Option<i64> = conn
            .query_row(
                "SELECT counter FROM quote_counter WHERE customer_key = ?1 AND date_code = ?2",
                params![customer_key, date_code],
                |row| row.get(0),
            )
            .optional()?;
        Ok(seq)
    }
}
