//! 查询参数转换与响应包装
//!
//! 路由声明每个查询参数的默认值，默认值的类型决定了参数的目标类型。
//! 参数缺失或为空时使用默认值，无法转换时返回 400 `Invalid parameter <name>`。

use crate::error::AppError;
use serde::Serialize;
use std::collections::HashMap;

/// 查询参数值
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl ParamValue {
    /// 按照自身的类型解析原始字符串
    fn parse_like(&self, raw: &str) -> Option<ParamValue> {
        let trimmed = raw.trim();
        match self {
            ParamValue::Int(_) => trimmed.parse().ok().map(ParamValue::Int),
            // 接受 nan / inf
            ParamValue::Float(_) => trimmed.parse().ok().map(ParamValue::Float),
            ParamValue::Bool(_) => parse_bool(trimmed).map(ParamValue::Bool),
            ParamValue::Str(_) => Some(ParamValue::Str(raw.to_string())),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(f) => Some(*f),
            ParamValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v.into())
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

/// 一个路由声明的查询参数及其默认值
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    declared: Vec<(String, ParamValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(mut self, name: impl Into<String>, default: impl Into<ParamValue>) -> Self {
        self.declared.push((name.into(), default.into()));
        self
    }

    /// 按声明转换查询字符串，未声明的参数被忽略
    pub fn coerce(&self, query: &HashMap<String, String>) -> Result<Params, AppError> {
        let mut values = HashMap::with_capacity(self.declared.len());

        for (name, default) in &self.declared {
            let value = match query.get(name).filter(|raw| !raw.is_empty()) {
                None => default.clone(),
                Some(raw) => default.parse_like(raw).ok_or_else(|| {
                    tracing::debug!(parameter = %name, "Query parameter failed to coerce");
                    AppError::InvalidParameter(name.clone())
                })?,
            };
            values.insert(name.clone(), value);
        }

        Ok(Params(values))
    }
}

/// 转换后的查询参数
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Params(HashMap<String, ParamValue>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_i64)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_f64)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }
}

/// 列表响应：`{"count": n, "results": [...]}`
#[derive(Debug, Clone, Serialize)]
pub struct DataEnvelope<T> {
    pub count: usize,
    pub results: Vec<T>,
}

pub fn wrap_data<T>(data: Vec<T>) -> DataEnvelope<T> {
    DataEnvelope {
        count: data.len(),
        results: data,
    }
}
