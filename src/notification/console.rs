//! 控制台渠道 - 只打印不外发，供 dry-run 使用

use async_trait::async_trait;

use super::channel::NotifyChannel;
use crate::error::MonitorError;

/// 控制台渠道
#[derive(Debug, Default)]
pub struct ConsoleChannel;

#[async_trait]
impl NotifyChannel for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    async fn send(&self, text: &str) -> Result<(), MonitorError> {
        println!("[notify] {}", text);
        Ok(())
    }
}
