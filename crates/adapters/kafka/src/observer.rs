//! RPC Observer
//!
//! 订阅命令频道，把 `{type, data}` 消息转交给服务端，
//! 并将原始结果回发到 reply_to 指定的频道。

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use mesa_errors::{AppError, AppResult};
use mesa_ports::{RpcEnvelope, RpcResponder};
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::RpcChannelConfig;

/// 频道上的一条 RPC 请求消息
///
/// `reply_to` 缺失时视为 fire-and-forget，结果被丢弃。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcMessage {
    #[serde(flatten)]
    pub request: RpcEnvelope,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub correlation_id: Option<String>,
}

/// RPC 频道观察者
///
/// 消费循环与回复 producer 在同一实例内，回复不经过响应信封：
/// RPC 调用方拿到的是原始领域数据，缺失结果回复 JSON null。
pub struct RpcObserver {
    consumer: StreamConsumer,
    reply_producer: FutureProducer,
    config: RpcChannelConfig,
}

impl RpcObserver {
    pub fn new(config: RpcChannelConfig) -> AppResult<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .create()
            .map_err(|e| AppError::internal(format!("Failed to create RPC consumer: {}", e)))?;

        consumer
            .subscribe(&[config.channel.as_str()])
            .map_err(|e| AppError::internal(format!("Failed to subscribe to channel: {}", e)))?;

        let reply_producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("client.id", format!("{}-reply-producer", config.group_id))
            .create()
            .map_err(|e| AppError::internal(format!("Failed to create reply producer: {}", e)))?;

        info!(
            channel = %config.channel,
            group_id = %config.group_id,
            "RPC observer created"
        );

        Ok(Self {
            consumer,
            reply_producer,
            config,
        })
    }

    /// 开始观察频道，每条命令转交给 responder
    ///
    /// 格式错误的消息记录日志后丢弃并提交位点，不重试。
    pub async fn observe(&self, responder: Arc<dyn RpcResponder>) -> AppResult<()> {
        let mut stream = self.consumer.stream();

        while let Some(result) = stream.next().await {
            match result {
                Ok(message) => {
                    let payload = match message.payload_view::<str>() {
                        Some(Ok(s)) => s,
                        Some(Err(e)) => {
                            error!(channel = %self.config.channel, "Non-UTF8 RPC payload: {}", e);
                            self.commit(&message);
                            continue;
                        }
                        None => {
                            debug!(channel = %self.config.channel, "Empty RPC message, skipping");
                            self.commit(&message);
                            continue;
                        }
                    };

                    let rpc_message: RpcMessage = match serde_json::from_str(payload) {
                        Ok(m) => m,
                        Err(e) => {
                            warn!(
                                channel = %self.config.channel,
                                error = %e,
                                "Dropping malformed RPC message"
                            );
                            self.commit(&message);
                            continue;
                        }
                    };

                    if let Err(e) = self.dispatch(responder.as_ref(), rpc_message).await {
                        error!(
                            channel = %self.config.channel,
                            error = %e,
                            "RPC request failed"
                        );
                    }

                    self.commit(&message);
                }
                Err(e) => {
                    error!("Kafka error: {}", e);
                }
            }
        }

        info!("RPC observer stopped");
        Ok(())
    }

    async fn dispatch(&self, responder: &dyn RpcResponder, message: RpcMessage) -> AppResult<()> {
        let command = message.request.command.clone();
        debug!(command = %command, "Serving RPC request");

        let reply = responder.serve(message.request).await?;

        let Some(reply_to) = message.reply_to else {
            debug!(command = %command, "No reply_to, discarding RPC result");
            return Ok(());
        };

        // 缺失结果回复 null，调用方据此区分 "无结果" 与空集合
        let body = reply.unwrap_or(Value::Null);
        let payload = serde_json::to_string(&body)
            .map_err(|e| AppError::internal(format!("Failed to serialize RPC reply: {}", e)))?;

        let correlation_id = message.correlation_id.unwrap_or_default();
        let record: FutureRecord<'_, String, String> = FutureRecord::to(&reply_to)
            .payload(&payload)
            .key(&correlation_id);

        self.reply_producer
            .send(
                record,
                Timeout::After(Duration::from_millis(self.config.reply_timeout_ms)),
            )
            .await
            .map_err(|(e, _)| AppError::internal(format!("Failed to send RPC reply: {}", e)))?;

        debug!(
            command = %command,
            reply_to = %reply_to,
            correlation_id = %correlation_id,
            "RPC reply sent"
        );

        Ok(())
    }

    fn commit(&self, message: &rdkafka::message::BorrowedMessage<'_>) {
        if let Err(e) = self.consumer.commit_message(message, CommitMode::Async) {
            error!("Failed to commit offset: {}", e);
        }
    }

    /// 订阅的频道名
    pub fn channel(&self) -> &str {
        &self.config.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_message_wire_format() {
        let json = r#"{
            "type": "VIEW_PRODUCTS",
            "data": ["0198ad7e-1234-7000-8000-0123456789ab"],
            "reply_to": "SHOPPING_RPC.reply",
            "correlation_id": "abc-123"
        }"#;

        let msg: RpcMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.request.command, "VIEW_PRODUCTS");
        assert_eq!(msg.reply_to.as_deref(), Some("SHOPPING_RPC.reply"));
        assert_eq!(msg.correlation_id.as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_rpc_message_without_reply_metadata() {
        let msg: RpcMessage =
            serde_json::from_str(r#"{"type":"VIEW_PRODUCT","data":"x"}"#).unwrap();
        assert_eq!(msg.request.command, "VIEW_PRODUCT");
        assert!(msg.reply_to.is_none());
        assert!(msg.correlation_id.is_none());
    }

    #[tokio::test]
    #[ignore] // 需要 Kafka 实例
    async fn test_observer_creation() {
        let config = RpcChannelConfig::new("localhost:9092", "PRODUCT_RPC", "catalog-rpc");
        let observer = RpcObserver::new(config).unwrap();
        assert_eq!(observer.channel(), "PRODUCT_RPC");
    }
}
