//! 通知渠道 trait 定义

use async_trait::async_trait;

use crate::error::MonitorError;

/// 通知渠道 trait
///
/// 调用方负责消息去重；渠道只管把文本送出去。
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 投递一条消息
    ///
    /// 恰好发起一次外呼，不在内部重试；失败以 `DeliveryFailed` 返回。
    async fn send(&self, text: &str) -> Result<(), MonitorError>;
}
