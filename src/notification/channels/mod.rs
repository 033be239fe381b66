//! 具体渠道实现

pub mod dingtalk;
pub mod dry_run;

pub use dingtalk::{DingtalkChannel, WebhookConfig, DINGTALK_API_URL};
pub use dry_run::DryRunChannel;
