//! 通知渠道 trait 定义

use super::message::OutboundMessage;
use anyhow::Result;

/// 通知渠道 trait
///
/// 每次调用只发送一次，不重试；错误原样返回给调用方。
pub trait NotificationChannel {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 同步发送消息
    fn send(&self, message: &OutboundMessage) -> Result<()>;
}

impl<T: NotificationChannel + ?Sized> NotificationChannel for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn send(&self, message: &OutboundMessage) -> Result<()> {
        (**self).send(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::message::TextMessage;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingChannel {
        sent: Rc<Cell<usize>>,
    }

    impl NotificationChannel for CountingChannel {
        fn name(&self) -> &str {
            "counting"
        }

        fn send(&self, _message: &OutboundMessage) -> Result<()> {
            self.sent.set(self.sent.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_boxed_channel_delegates() {
        let sent = Rc::new(Cell::new(0));
        let boxed: Box<dyn NotificationChannel> = Box::new(CountingChannel { sent: sent.clone() });

        assert_eq!(boxed.name(), "counting");
        boxed
            .send(&OutboundMessage::from(TextMessage::new("hi", false)))
            .unwrap();
        assert_eq!(sent.get(), 1);
    }
}
