//! RPC 命令分发 trait 定义

use async_trait::async_trait;
use mesa_errors::AppResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// RPC 频道上承载的命令消息：`{type, data}`
///
/// `type` 保持字符串形式：未识别的命令不是反序列化错误，
/// 而是由 responder 返回 "无结果"。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcEnvelope {
    #[serde(rename = "type")]
    pub command: String,
    #[serde(default)]
    pub data: Value,
}

/// 订阅 RPC 频道的服务端
///
/// 返回 `Ok(None)` 表示无结果（未知命令或记录不存在），
/// 与 `Ok(Some(json!([])))` 这类空集合结果是可区分的。
#[async_trait]
pub trait RpcResponder: Send + Sync {
    async fn serve(&self, request: RpcEnvelope) -> AppResult<Option<Value>>;
}
