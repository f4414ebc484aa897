//! 远端 API 模块 - 拉取作业状态列表
//!
//! 只负责取回原始 JSON，不做形状校验（那是 response 模块的职责）。

use anyhow::{anyhow, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::MonitorError;

/// 请求超时（秒）
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// 作业状态 API 客户端
#[derive(Debug, Clone)]
pub struct StatusApiClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl StatusApiClient {
    /// 创建新客户端
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| anyhow!("Cannot create HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }

    /// 拉取 `from_date` 之后的作业状态
    ///
    /// 非 200 响应归类为网络错误；200 但 JSON 解不开归类为形状错误。
    pub async fn fetch(&self, from_date: i64) -> Result<Value, MonitorError> {
        debug!(from_date, endpoint = %self.endpoint, "Fetching homework statuses");

        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| MonitorError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(MonitorError::Network(format!(
                "status API returned {}",
                status
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| MonitorError::ShapeInvalid(format!("undecodable JSON body: {}", e)))
    }
}
