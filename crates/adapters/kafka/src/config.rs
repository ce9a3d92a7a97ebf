//! RPC 频道配置

/// RPC 观察者配置
#[derive(Debug, Clone)]
pub struct RpcChannelConfig {
    pub brokers: String,
    /// 订阅的命令频道（topic）
    pub channel: String,
    pub group_id: String,
    /// 回复消息的发送超时（毫秒）
    pub reply_timeout_ms: u64,
}

impl RpcChannelConfig {
    pub fn new(
        brokers: impl Into<String>,
        channel: impl Into<String>,
        group_id: impl Into<String>,
    ) -> Self {
        Self {
            brokers: brokers.into(),
            channel: channel.into(),
            group_id: group_id.into(),
            reply_timeout_ms: 5000,
        }
    }

    pub fn with_reply_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.reply_timeout_ms = timeout_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_config() {
        let config = RpcChannelConfig::new("localhost:9092", "PRODUCT_RPC", "catalog-rpc")
            .with_reply_timeout_ms(1000);

        assert_eq!(config.channel, "PRODUCT_RPC");
        assert_eq!(config.reply_timeout_ms, 1000);
    }
}
