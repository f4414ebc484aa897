//! 监控循环模块 - 取回、校验、对比、通知的状态机
//!
//! 每个周期严格单线程推进：取回 → 校验 → 对比 → 通知 → 固定间隔等待。
//! 游标和去重状态只归本模块所有，循环外不读不写。

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::api::StatusApiClient;
use crate::error::MonitorError;
use crate::notification::NotifyChannel;
use crate::response;
use crate::status::StatusRecord;

/// 错误通知的前缀（沿用既有的用户可见文案）
const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// 去重状态：每类只保留最近一条文本
///
/// 状态文案和错误文案各占一个槽位，连续两次相同的文本只投递一次。
#[derive(Debug, Default)]
pub struct NotificationState {
    last_status: Option<String>,
    last_error: Option<String>,
}

impl NotificationState {
    /// 状态文案是否与最近一条相同
    pub fn is_repeat_status(&self, text: &str) -> bool {
        self.last_status.as_deref() == Some(text)
    }

    /// 记录最近一条状态文案
    pub fn record_status(&mut self, text: &str) {
        self.last_status = Some(text.to_string());
    }

    /// 错误文案是否与最近一条相同
    pub fn is_repeat_error(&self, text: &str) -> bool {
        self.last_error.as_deref() == Some(text)
    }

    /// 记录最近一条错误文案（无论投递成败都记）
    pub fn record_error(&mut self, text: &str) {
        self.last_error = Some(text.to_string());
    }
}

/// 单个轮询周期的结果
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CycleReport {
    /// 本周期投递的通知条数
    pub sent: usize,
    /// 因与上一条相同而被抑制的条数
    pub suppressed: usize,
    /// 周期结束后的游标
    pub cursor: i64,
}

/// 作业状态监控器
pub struct HomeworkMonitor {
    api: StatusApiClient,
    channel: Arc<dyn NotifyChannel>,
    state: NotificationState,
    /// 轮询水位线：只在取回+校验成功后推进，从不回退
    cursor: i64,
    interval: Duration,
}

impl HomeworkMonitor {
    /// 创建监控器，游标从 0 开始
    pub fn new(api: StatusApiClient, channel: Arc<dyn NotifyChannel>, interval: Duration) -> Self {
        Self {
            api,
            channel,
            state: NotificationState::default(),
            cursor: 0,
            interval,
        }
    }

    /// 设置起始游标
    pub fn with_cursor(mut self, cursor: i64) -> Self {
        self.cursor = cursor;
        self
    }

    /// 当前游标
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// 无限轮询，直到外部信号或致命错误
    pub async fn run(&mut self) -> Result<()> {
        info!(
            interval_secs = self.interval.as_secs(),
            channel = self.channel.name(),
            "Starting homework status monitor"
        );

        // 信号 future 跨周期存活：周期进行中收到的信号会在
        // 周期结束后的等待点立刻生效
        let shutdown = signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            match self.run_cycle().await {
                Ok(report) => {
                    debug!(
                        sent = report.sent,
                        suppressed = report.suppressed,
                        cursor = report.cursor,
                        "Poll cycle finished"
                    );
                }
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "Unclassified failure, terminating");
                    return Err(e.into());
                }
                Err(e) => {
                    warn!(category = ?e.category(), error = %e, "Poll cycle failed");
                }
            }

            // 成功失败都等满一个间隔；ctrl-c 打断等待后干净退出
            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = &mut shutdown => {
                    info!("Shutdown signal received, exiting");
                    return Ok(());
                }
            }
        }
    }

    /// 执行一个完整周期：轮询，失败则走错误上报路径
    ///
    /// 致命与否由调用方根据返回的错误裁决；这里只负责上报。
    pub async fn run_cycle(&mut self) -> Result<CycleReport, MonitorError> {
        match self.poll_once().await {
            Ok(report) => Ok(report),
            Err(e) => {
                self.report_failure(&e).await;
                Err(e)
            }
        }
    }

    /// 执行一个轮询周期
    ///
    /// 记录按旧到新逐条处理；任何取回、校验或解析错误都让游标
    /// 停在原地，由下一个周期重新取回。
    pub async fn poll_once(&mut self) -> Result<CycleReport, MonitorError> {
        let raw = self.api.fetch(self.cursor).await?;
        let validated = response::validate(&raw)?;

        let mut sent = 0;
        let mut suppressed = 0;
        for raw_record in &validated.homeworks {
            let record = StatusRecord::parse(raw_record)?;
            let message = record.message();

            if self.state.is_repeat_status(&message) {
                debug!(homework = %record.name, "Status unchanged, suppressing");
                suppressed += 1;
                continue;
            }

            // 单条投递失败不拦后续记录，只写本地日志
            match self.channel.send(&message).await {
                Ok(()) => {
                    info!(homework = %record.name, status = %record.status, "Notification sent");
                    sent += 1;
                }
                Err(e) => {
                    warn!(channel = self.channel.name(), error = %e, "Notification delivery failed");
                }
            }
            self.state.record_status(&message);
        }

        self.cursor = validated.current_date;
        Ok(CycleReport {
            sent,
            suppressed,
            cursor: self.cursor,
        })
    }

    /// 把失败汇报给通知渠道（尽力而为）
    ///
    /// 渠道故障不经渠道上报；相同的错误文案只上报一次；
    /// 槽位无论投递成败都更新，避免对坏渠道反复冲击。
    async fn report_failure(&mut self, error: &MonitorError) {
        if !error.is_reportable() {
            return;
        }

        let text = format!("{}: {}", FAILURE_PREFIX, error);
        if self.state.is_repeat_error(&text) {
            debug!("Identical error already reported, suppressing");
            return;
        }

        if let Err(e) = self.channel.send(&text).await {
            warn!(channel = self.channel.name(), error = %e, "Best-effort error notification failed");
        }
        self.state.record_error(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_status_is_detected() {
        let mut state = NotificationState::default();
        assert!(!state.is_repeat_status("msg"));

        state.record_status("msg");
        assert!(state.is_repeat_status("msg"));
        assert!(!state.is_repeat_status("other"));
    }

    #[test]
    fn test_status_slot_holds_only_last_value() {
        let mut state = NotificationState::default();
        state.record_status("a");
        state.record_status("b");

        // 只和紧邻的上一条比较
        assert!(!state.is_repeat_status("a"));
        assert!(state.is_repeat_status("b"));
    }

    #[test]
    fn test_error_slot_is_independent_of_status_slot() {
        let mut state = NotificationState::default();
        state.record_status("same text");

        assert!(!state.is_repeat_error("same text"));
        state.record_error("same text");
        assert!(state.is_repeat_error("same text"));
        assert!(state.is_repeat_status("same text"));
    }
}
