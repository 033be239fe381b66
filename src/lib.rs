//! Drone DingTalk - 将 Drone CI 构建通知发送到钉钉机器人

pub mod cli;
pub mod error;
pub mod notification;
pub mod plugin;

pub use error::{PluginError, Result};
pub use notification::{
    build_card_message, describe, ActionCardMessage, BuildEvent, DingtalkChannel, DryRunChannel,
    NotificationChannel, Notifier, OutboundMessage, TextMessage, WebhookConfig,
};
pub use plugin::{BuildInfo, Language, PluginConfig, RepoInfo};
