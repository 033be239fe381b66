//! 出站消息 - 文本消息与 actionCard
//!
//! `OutboundMessage` 构造后不可变，经 `to_payload` 转换为钉钉机器人的 JSON 格式：
//! - text: `{"msgtype":"text","text":{"content":..},"at":{"isAtAll":..}}`
//! - actionCard: `{"msgtype":"actionCard","actionCard":{..}}`

use serde::Serialize;

/// 文本消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    pub body: String,
    /// 是否 @所有人
    pub notify_all: bool,
}

impl TextMessage {
    pub fn new(body: impl Into<String>, notify_all: bool) -> Self {
        Self {
            body: body.into(),
            notify_all,
        }
    }
}

/// actionCard 按钮排列方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonOrientation {
    /// 竖直排列（"0"）
    #[default]
    Vertical,
    /// 横向排列（"1"）
    Horizontal,
}

impl ButtonOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonOrientation::Vertical => "0",
            ButtonOrientation::Horizontal => "1",
        }
    }
}

/// actionCard 独立跳转按钮
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub title: String,
    pub action_url: String,
}

/// actionCard 消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCardMessage {
    pub title: String,
    /// markdown 正文
    pub text: String,
    pub hide_avatar: bool,
    pub button_orientation: ButtonOrientation,
    pub single_title: String,
    pub single_url: String,
    /// 多按钮模式；为空时只使用 single_title / single_url
    pub buttons: Vec<ActionButton>,
}

/// 发送给渠道的消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Text(TextMessage),
    ActionCard(ActionCardMessage),
}

impl OutboundMessage {
    /// 钉钉 msgtype
    pub fn msg_type(&self) -> &'static str {
        match self {
            OutboundMessage::Text(_) => "text",
            OutboundMessage::ActionCard(_) => "actionCard",
        }
    }

    /// 转换为钉钉 webhook 请求体
    pub fn to_payload(&self) -> Payload<'_> {
        match self {
            OutboundMessage::Text(text) => Payload::Text {
                text: TextContent {
                    content: &text.body,
                },
                at: AtTarget {
                    is_at_all: text.notify_all,
                },
            },
            OutboundMessage::ActionCard(card) => Payload::ActionCard {
                action_card: ActionCardBody {
                    title: &card.title,
                    text: &card.text,
                    hide_avatar: if card.hide_avatar { "1" } else { "0" },
                    btn_orientation: card.button_orientation.as_str(),
                    single_title: &card.single_title,
                    single_url: &card.single_url,
                    btns: card
                        .buttons
                        .iter()
                        .map(|b| ButtonBody {
                            title: &b.title,
                            action_url: &b.action_url,
                        })
                        .collect(),
                },
            },
        }
    }

    /// 序列化为 JSON 字符串
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_payload())
    }
}

impl From<TextMessage> for OutboundMessage {
    fn from(message: TextMessage) -> Self {
        OutboundMessage::Text(message)
    }
}

impl From<ActionCardMessage> for OutboundMessage {
    fn from(message: ActionCardMessage) -> Self {
        OutboundMessage::ActionCard(message)
    }
}

/// 钉钉 webhook 请求体
#[derive(Debug, Serialize)]
#[serde(tag = "msgtype")]
pub enum Payload<'a> {
    #[serde(rename = "text")]
    Text { text: TextContent<'a>, at: AtTarget },
    #[serde(rename = "actionCard")]
    ActionCard {
        #[serde(rename = "actionCard")]
        action_card: ActionCardBody<'a>,
    },
}

#[derive(Debug, Serialize)]
pub struct TextContent<'a> {
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AtTarget {
    #[serde(rename = "isAtAll")]
    pub is_at_all: bool,
}

#[derive(Debug, Serialize)]
pub struct ActionCardBody<'a> {
    pub title: &'a str,
    pub text: &'a str,
    #[serde(rename = "hideAvatar")]
    pub hide_avatar: &'static str,
    #[serde(rename = "btnOrientation")]
    pub btn_orientation: &'static str,
    #[serde(rename = "singleTitle")]
    pub single_title: &'a str,
    #[serde(rename = "singleURL")]
    pub single_url: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub btns: Vec<ButtonBody<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ButtonBody<'a> {
    pub title: &'a str,
    #[serde(rename = "actionURL")]
    pub action_url: &'a str,
}
