//! 通知层 - 消息生成与发送
//!
//! # 组成
//! 1. `template`：根据 (语言, 构建事件) 生成 actionCard 描述
//! 2. `message`：`OutboundMessage`（text / actionCard）及钉钉请求体
//! 3. `channel`：`NotificationChannel` trait，发送一次、不重试
//! 4. `notifier`：校验配置并通过注入的渠道发送
//!
//! # 使用示例
//! ```ignore
//! use drone_dingtalk::notification::{Notifier, WebhookConfig};
//!
//! let notifier = Notifier::new(repo, build, config);
//! notifier.execute(WebhookConfig::default())?;
//! ```

pub mod channel;
pub mod channels;
pub mod message;
pub mod notifier;
pub mod template;

pub use channel::NotificationChannel;
pub use channels::{DingtalkChannel, DryRunChannel, WebhookConfig, DINGTALK_API_URL};
pub use message::{ActionButton, ActionCardMessage, ButtonOrientation, OutboundMessage, TextMessage};
pub use notifier::Notifier;
pub use template::{build_card_message, describe, BuildEvent};
