//! 通知抽象层 - 把消息投递到外部渠道
//!
//! # 设计目标
//! 1. 统一接口：所有渠道实现 `NotifyChannel` trait
//! 2. 单次投递：渠道内部不做重试，重试/抑制策略在轮询循环里
//! 3. 失败上浮：投递失败以 `DeliveryFailed` 返回给调用方裁决

pub mod channel;
pub mod console;
pub mod telegram;

pub use channel::NotifyChannel;
pub use console::ConsoleChannel;
pub use telegram::TelegramChannel;
