//! 钉钉机器人 Webhook 渠道
//!
//! 通过 `POST <base_url>?access_token=<token>` 发送消息。
//! 钉钉在 HTTP 200 时仍可能拒绝消息，需检查响应体中的 `errcode`。

use crate::notification::channel::NotificationChannel;
use crate::notification::message::OutboundMessage;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// 钉钉机器人发送接口
pub const DINGTALK_API_URL: &str = "https://oapi.dingtalk.com/robot/send";

/// 默认超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Webhook 渠道配置
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// 接口地址（不含 query）
    pub base_url: String,
    /// 机器人 access_token
    pub access_token: String,
    /// 超时时间 (秒)
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            base_url: DINGTALK_API_URL.to_string(),
            access_token: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl WebhookConfig {
    /// 绑定 access_token
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = token.into();
        self
    }
}

/// 钉钉接口响应
#[derive(Debug, Deserialize)]
pub struct DingtalkResponse {
    #[serde(default)]
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
}

/// 钉钉机器人渠道
#[derive(Debug)]
pub struct DingtalkChannel {
    client: reqwest::blocking::Client,
    config: WebhookConfig,
}

impl DingtalkChannel {
    /// 创建渠道，access_token 不能为空
    pub fn new(config: WebhookConfig) -> Result<Self> {
        if config.access_token.is_empty() {
            return Err(anyhow!("access_token is required"));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }
}

impl NotificationChannel for DingtalkChannel {
    fn name(&self) -> &str {
        "dingtalk"
    }

    fn send(&self, message: &OutboundMessage) -> Result<()> {
        debug!(
            base_url = %self.config.base_url,
            msgtype = message.msg_type(),
            timeout_secs = self.config.timeout_secs,
            "Posting message to dingtalk"
        );

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(&self.config.base_url)
            .query(&[("access_token", self.config.access_token.as_str())])
            .json(&message.to_payload())
            .send()
            .map_err(|e| {
                anyhow!(
                    "HTTP request failed after {}ms: {}",
                    start.elapsed().as_millis(),
                    e
                )
            })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| anyhow!("Failed to read response: {}", e))?;

        if !status.is_success() {
            return Err(anyhow!("dingtalk webhook error ({}): {}", status, body));
        }

        match serde_json::from_str::<DingtalkResponse>(&body) {
            Ok(resp) if resp.errcode != 0 => Err(anyhow!(
                "dingtalk rejected message ({}): {}",
                resp.errcode,
                resp.errmsg
            )),
            Ok(_) => {
                info!(
                    channel = "dingtalk",
                    msgtype = message.msg_type(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Message sent successfully"
                );
                Ok(())
            }
            Err(e) => {
                // 非 JSON 响应视为已送达
                debug!(error = %e, body = %body, "Unrecognized dingtalk response");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_config_default() {
        let config = WebhookConfig::default();
        assert_eq!(config.base_url, DINGTALK_API_URL);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.access_token.is_empty());
    }

    #[test]
    fn test_channel_requires_token() {
        let result = DingtalkChannel::new(WebhookConfig::default());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("access_token"));
    }

    #[test]
    fn test_channel_binds_token() {
        let channel =
            DingtalkChannel::new(WebhookConfig::default().with_access_token("abc123")).unwrap();
        assert_eq!(channel.name(), "dingtalk");
        assert_eq!(channel.config().access_token, "abc123");
    }

    #[test]
    fn test_response_parsing() {
        let ok: DingtalkResponse = serde_json::from_str(r#"{"errcode":0,"errmsg":"ok"}"#).unwrap();
        assert_eq!(ok.errcode, 0);

        let rejected: DingtalkResponse =
            serde_json::from_str(r#"{"errcode":300001,"errmsg":"token is not exist"}"#).unwrap();
        assert_eq!(rejected.errcode, 300001);
        assert_eq!(rejected.errmsg, "token is not exist");
    }
}
