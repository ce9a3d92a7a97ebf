//! 响应信封
//!
//! 所有面向 HTTP 的结果统一为 `{data}` / `{error}` 两种形状。
//! "记录不存在" 在这里被映射成携带错误信息的成功响应（软 not-found），
//! 错误文案由调用方给出，格式化本身不猜测领域语义。

use serde::{Deserialize, Serialize};

/// 统一响应信封：`{"data": …}` 或 `{"error": "…"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Data { data: T },
    Error { error: String },
}

impl<T> Envelope<T> {
    /// 无条件包装成功值
    pub fn data(value: T) -> Self {
        Self::Data { data: value }
    }

    /// 构造错误信封
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    /// 纯格式化：有值包装，缺失映射为调用方给定的错误文案
    pub fn format(value: Option<T>, missing_message: &str) -> Self {
        match value {
            Some(v) => Self::data(v),
            None => Self::error(missing_message),
        }
    }

    pub fn as_data(&self) -> Option<&T> {
        match self {
            Self::Data { data } => Some(data),
            Self::Error { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Data { data } => Some(data),
            Self::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Data { .. } => None,
            Self::Error { error } => Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
