//! mesa-adapter-kafka - Kafka 适配器
//!
//! 承载服务间 RPC 频道：
//! - 订阅命令频道（`{type, data}` 消息）
//! - 把命令转交给 RpcResponder
//! - 按 reply_to / correlation_id 回发原始结果

mod config;
mod observer;

pub use config::*;
pub use observer::*;
