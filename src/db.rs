//! 通用 SQL 执行助手
//! 执行语句并把结果行转换成与表结构无关的通用记录（列名 -> JSON 值）

use crate::config::DatabaseConfig;
use base64::{engine::general_purpose::STANDARD, Engine};
use secrecy::ExposeSecret;
use serde_json::{Map, Number, Value};
use sqlx::{
    query::Query,
    sqlite::{SqliteArguments, SqlitePoolOptions, SqliteRow},
    Column, Row, Sqlite, SqlitePool, TypeInfo, ValueRef,
};
use std::time::Duration;

/// 一行结果：列名 -> 值
pub type Record = Map<String, Value>;

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// 带位置参数的 SQL 语句
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// 追加一个位置参数
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }
}

/// 数据库句柄
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    echo: bool,
}

impl Database {
    /// 创建连接池
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        tracing::debug!("Creating database connection pool...");

        // 连接不做回收，内存数据库的数据随连接存在
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(config.url.expose_secret())
            .await
            .map_err(|e| {
                tracing::error!("Failed to create database pool: {}", e);
                DbError::ConnectionFailed(e.to_string())
            })?;

        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Database pool created successfully"
        );

        Ok(Self::from_pool(pool, config.echo))
    }

    pub fn from_pool(pool: SqlitePool, echo: bool) -> Self {
        Self { pool, echo }
    }

    /// 在同一个事务中依次执行语句，每条语句对应一组结果记录
    ///
    /// `commit` 为 false 时事务会被回滚，只适合只读查询。
    /// 任一语句失败时整个事务回滚。
    pub async fn exec(
        &self,
        statements: &[Statement],
        commit: bool,
    ) -> Result<Vec<Vec<Record>>, DbError> {
        let mut tx = self.pool.begin().await?;
        let mut results = Vec::with_capacity(statements.len());

        for statement in statements {
            if self.echo {
                tracing::debug!(
                    sql = %statement.sql,
                    params = statement.params.len(),
                    "Executing statement"
                );
            }

            let rows = bind_params(sqlx::query(&statement.sql), &statement.params)
                .fetch_all(&mut *tx)
                .await?;

            let records = rows
                .iter()
                .map(row_to_record)
                .collect::<Result<Vec<_>, _>>()?;
            results.push(records);
        }

        if commit {
            tx.commit().await?;
        } else {
            tx.rollback().await?;
        }

        Ok(results)
    }

    /// 执行单条只读语句
    pub async fn fetch(&self, statement: Statement) -> Result<Vec<Record>, DbError> {
        let mut results = self.exec(std::slice::from_ref(&statement), false).await?;
        Ok(results.pop().unwrap_or_default())
    }

    /// 数据库健康检查
    pub async fn health_check(&self) -> HealthStatus {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => {
                tracing::debug!("Database health check: OK");
                HealthStatus::Healthy
            }
            Err(e) => {
                tracing::warn!("Database health check failed: {}", e);
                HealthStatus::Unhealthy(e.to_string())
            }
        }
    }
}

fn bind_params<'q>(mut query: SqliteQuery<'q>, params: &[Value]) -> SqliteQuery<'q> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => query.bind(i),
                None => query.bind(n.as_f64()),
            },
            Value::String(s) => query.bind(s.clone()),
            // 数组和对象以 JSON 文本绑定
            other => query.bind(other.to_string()),
        };
    }
    query
}

fn row_to_record(row: &SqliteRow) -> Result<Record, DbError> {
    let mut record = Map::new();

    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            let type_name = raw.type_info().name().to_ascii_uppercase();
            match type_name.as_str() {
                "INTEGER" | "INT" | "INT4" | "INT8" | "BIGINT" | "BOOLEAN" => {
                    Value::from(row.try_get_unchecked::<i64, _>(index)?)
                }
                "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => {
                    let f = row.try_get_unchecked::<f64, _>(index)?;
                    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
                }
                "BLOB" => blob_to_value(row.try_get_unchecked::<Vec<u8>, _>(index)?),
                _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
            }
        };

        record.insert(column.name().to_string(), value);
    }

    Ok(record)
}

/// BLOB 按 UTF-8 文本返回，非 UTF-8 的字节才用 base64 编码
fn blob_to_value(bytes: Vec<u8>) -> Value {
    match String::from_utf8(bytes) {
        Ok(text) => Value::String(text),
        Err(e) => Value::String(STANDARD.encode(e.into_bytes())),
    }
}

/// 数据库错误类型
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// 健康状态
#[derive(Debug, Clone)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}
