//! 数据库表列表

use crate::{
    db::{Record, Statement},
    error::AppError,
    middleware::AppState,
    params::{wrap_data, DataEnvelope, QueryParams},
};
use axum::{
    extract::{Query, State},
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;

const MAX_LIMIT: i64 = 500;

fn list_params() -> QueryParams {
    QueryParams::new()
        .declare("limit", 50)
        .declare("offset", 0)
        .declare("prefix", "")
}

/// 列出数据库中的表和视图
pub async fn list_tables(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<DataEnvelope<Record>>, AppError> {
    let params = list_params().coerce(&query)?;

    let limit = params.int("limit").unwrap_or(50);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::InvalidParameter("limit".to_string()));
    }
    let offset = params.int("offset").unwrap_or(0);
    if offset < 0 {
        return Err(AppError::InvalidParameter("offset".to_string()));
    }
    let prefix = params.str("prefix").unwrap_or_default();

    let statement = Statement::new(
        "SELECT name, type FROM sqlite_master \
         WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%' AND substr(name, 1, length(?)) = ? \
         ORDER BY name LIMIT ? OFFSET ?",
    )
    .bind(prefix)
    .bind(prefix)
    .bind(limit)
    .bind(offset);

    let records = state.db.fetch(statement).await?;

    Ok(Json(wrap_data(records)))
}
