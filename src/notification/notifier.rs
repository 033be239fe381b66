//! 通知执行器 - 校验配置、生成消息并通过渠道发送一次
//!
//! 渠道由调用方以 connector 形式注入：`FnOnce(&str) -> Result<C>`，
//! 参数为 access_token。测试中可注入 mock 渠道。

use super::channel::NotificationChannel;
use super::channels::dingtalk::{DingtalkChannel, WebhookConfig};
use super::message::{OutboundMessage, TextMessage};
use super::template::build_card_message;
use crate::error::{PluginError, Result};
use crate::plugin::{BuildInfo, PluginConfig, RepoInfo};
use tracing::{error, info};

/// 通知执行器
#[derive(Debug, Clone)]
pub struct Notifier {
    repo: RepoInfo,
    build: BuildInfo,
    config: PluginConfig,
}

impl Notifier {
    pub fn new(repo: RepoInfo, build: BuildInfo, config: PluginConfig) -> Self {
        Self { repo, build, config }
    }

    pub fn repo(&self) -> &RepoInfo {
        &self.repo
    }

    pub fn build(&self) -> &BuildInfo {
        &self.build
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// 根据配置生成待发送的消息
    ///
    /// CI 模式生成 actionCard；否则要求 message 非空并生成文本消息。
    pub fn compose(&self) -> Result<OutboundMessage> {
        if self.config.ci_mode {
            return Ok(build_card_message(&self.repo, &self.build, &self.config).into());
        }

        if self.config.message.is_empty() {
            error!("missing message to send");
            return Err(PluginError::MissingMessage);
        }

        Ok(TextMessage::new(self.config.message.clone(), self.config.notify_all).into())
    }

    /// 使用注入的 connector 执行一次通知
    pub fn execute_with<C, F>(&self, connect: F) -> Result<()>
    where
        C: NotificationChannel,
        F: FnOnce(&str) -> anyhow::Result<C>,
    {
        if self.config.access_token.is_empty() {
            error!("missing dingtalk config");
            return Err(PluginError::MissingCredential);
        }

        let message = self.compose()?;
        let channel = connect(&self.config.access_token).map_err(|e| {
            error!(error = %e, "Failed to open notification channel");
            PluginError::Transport(e)
        })?;

        info!(
            channel = channel.name(),
            msgtype = message.msg_type(),
            event = %self.build.event,
            lang = %self.config.language,
            "Sending notification"
        );

        channel.send(&message).map_err(|e| {
            error!(channel = channel.name(), error = %e, "Channel send failed");
            PluginError::Transport(e)
        })
    }

    /// 通过钉钉机器人 webhook 发送
    pub fn execute(&self, webhook: WebhookConfig) -> Result<()> {
        self.execute_with(|token| DingtalkChannel::new(webhook.with_access_token(token)))
    }
}
