//! 错误分类模块 - 监控循环的封闭错误集合
//!
//! 轮询循环依赖错误的分类标签决定后续动作：是否上报到通知渠道、
//! 是否终止进程。所有分类在这里闭合，不做深层继承。

use thiserror::Error;

/// 错误分类标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 远端请求失败
    Network,
    /// 响应整体形状不合法
    ShapeInvalid,
    /// 单条记录不合法
    RecordInvalid,
    /// 通知渠道投递失败
    DeliveryFailed,
    /// 未分类的失败
    Unexpected,
}

/// 监控核心的错误类型
#[derive(Debug, Error)]
pub enum MonitorError {
    /// 远端请求失败（连接失败、超时、非 2xx 响应）
    #[error("status API request failed: {0}")]
    Network(String),

    /// 响应不是预期的形状（缺 key、类型不对、JSON 解码失败）
    #[error("malformed status API response: {0}")]
    ShapeInvalid(String),

    /// 记录缺少必需字段（或字段为空）
    #[error("homework record is missing required field `{0}`")]
    FieldMissing(&'static str),

    /// 记录的状态码不在已知集合内
    #[error("unknown homework status `{0}`")]
    UnknownStatus(String),

    /// 通知渠道投递失败
    #[error("notification delivery failed: {0}")]
    DeliveryFailed(String),

    /// 其他未分类的失败
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl MonitorError {
    /// 返回分类标签
    pub fn category(&self) -> ErrorCategory {
        match self {
            MonitorError::Network(_) => ErrorCategory::Network,
            MonitorError::ShapeInvalid(_) => ErrorCategory::ShapeInvalid,
            MonitorError::FieldMissing(_) | MonitorError::UnknownStatus(_) => {
                ErrorCategory::RecordInvalid
            }
            MonitorError::DeliveryFailed(_) => ErrorCategory::DeliveryFailed,
            MonitorError::Unexpected(_) => ErrorCategory::Unexpected,
        }
    }

    /// 是否终止进程
    pub fn is_fatal(&self) -> bool {
        self.category() == ErrorCategory::Unexpected
    }

    /// 是否值得通过通知渠道上报
    ///
    /// `DeliveryFailed` 只写本地日志：渠道本身坏了，再往渠道发
    /// 错误报告会形成级联。
    pub fn is_reportable(&self) -> bool {
        self.category() != ErrorCategory::DeliveryFailed
    }
}
