//! 状态记录模块 - 把原始记录转成带结论文案的通知
//!
//! 状态码集合是封闭的：未知状态码是硬校验错误，不会被静默跳过。
//! 渲染出来的通知文案是与接收方的约定，逐字节保持不变。

use serde::Serialize;
use serde_json::Value;

use crate::error::MonitorError;

/// 状态码到结论文案的静态映射
const VERDICTS: &[(&str, &str)] = &[
    ("approved", "Работа проверена: ревьюеру всё понравилось. Ура!"),
    ("reviewing", "Работа взята на проверку ревьюером."),
    ("rejected", "Работа проверена: у ревьюера есть замечания."),
];

/// 查询状态码对应的结论文案
pub fn verdict_for(status: &str) -> Option<&'static str> {
    VERDICTS
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, text)| *text)
}

/// 一条校验通过的作业状态记录
#[derive(Debug, Clone, Serialize)]
pub struct StatusRecord {
    /// 作业名称
    pub name: String,
    /// 状态码（已确认在映射表内）
    pub status: String,
    /// 审阅者留言
    pub comment: Option<String>,
}

impl StatusRecord {
    /// 解析一条原始记录
    ///
    /// `homework_name` 和 `status` 缺失或为空视为记录错误；
    /// 状态码不在映射表内同样是记录错误。
    pub fn parse(raw: &Value) -> Result<Self, MonitorError> {
        let name = required_field(raw, "homework_name")?;
        let status = required_field(raw, "status")?;

        if verdict_for(&status).is_none() {
            return Err(MonitorError::UnknownStatus(status));
        }

        let comment = raw
            .get("reviewer_comment")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        Ok(Self {
            name,
            status,
            comment,
        })
    }

    /// 渲染通知文案（与接收方的逐字约定）
    pub fn message(&self) -> String {
        // parse 已确认状态码在映射表内
        let verdict = verdict_for(&self.status).unwrap_or_default();
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.name, verdict
        )
    }
}

/// 取出必需的非空字符串字段
fn required_field(raw: &Value, key: &'static str) -> Result<String, MonitorError> {
    match raw.get(key).and_then(|v| v.as_str()) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(MonitorError::FieldMissing(key)),
    }
}
