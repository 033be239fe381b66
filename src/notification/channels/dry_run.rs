//! Dry-run 渠道 - 只打印请求体，不发送

use crate::notification::channel::NotificationChannel;
use crate::notification::message::OutboundMessage;
use anyhow::Result;
use std::io::Write;
use std::sync::Mutex;
use tracing::info;

/// 将请求体写到指定输出（默认 stdout）
pub struct DryRunChannel {
    out: Mutex<Box<dyn Write + Send>>,
}

impl DryRunChannel {
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl Default for DryRunChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationChannel for DryRunChannel {
    fn name(&self) -> &str {
        "dry-run"
    }

    fn send(&self, message: &OutboundMessage) -> Result<()> {
        let payload = serde_json::to_string_pretty(&message.to_payload())?;
        info!(msgtype = message.msg_type(), "[DRY-RUN] Would send to dingtalk");

        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("dry-run writer poisoned"))?;
        writeln!(out, "{}", payload)?;
        out.flush()?;
        Ok(())
    }
}
