//! RPC responder 适配
//!
//! 把频道上的 `{type, data}` 命令转交给 ProductService，
//! 结果以原始 JSON 返回（不套响应信封）。

use std::sync::Arc;

use async_trait::async_trait;
use mesa_errors::{AppError, AppResult};
use mesa_ports::{RpcEnvelope, RpcResponder};
use metrics::counter;
use serde_json::Value;

use crate::application::ProductService;

pub struct ProductRpc {
    service: Arc<ProductService>,
}

impl ProductRpc {
    pub fn new(service: Arc<ProductService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RpcResponder for ProductRpc {
    async fn serve(&self, request: RpcEnvelope) -> AppResult<Option<Value>> {
        counter!("catalog_rpc_requests_total", "command" => request.command.clone()).increment(1);

        let reply = self.service.serve_rpc_request(request).await?;
        match reply {
            Some(reply) => {
                let value = serde_json::to_value(reply).map_err(|e| {
                    AppError::internal(format!("Failed to serialize RPC reply: {}", e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}
