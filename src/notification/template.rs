//! CI 模式的构建消息模板
//!
//! 按 `(语言, 事件)` 选择描述文本；push / pull_request / tag 以外的事件描述为空。

use super::message::{ActionCardMessage, ButtonOrientation};
use crate::plugin::{BuildInfo, Language, PluginConfig, RepoInfo};

/// actionCard 按钮标题
pub const CARD_BUTTON_TITLE: &str = "Drone";

/// 构建事件类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    Push,
    PullRequest,
    Tag,
    Other(String),
}

impl BuildEvent {
    pub fn parse(event: &str) -> Self {
        match event {
            "push" => BuildEvent::Push,
            "pull_request" => BuildEvent::PullRequest,
            "tag" => BuildEvent::Tag,
            other => BuildEvent::Other(other.to_string()),
        }
    }
}

/// 生成卡片描述
pub fn describe(repo: &RepoInfo, build: &BuildInfo, language: Language) -> String {
    let repo_name = repo.full_name();

    match BuildEvent::parse(&build.event) {
        BuildEvent::Push => {
            let heading = format!("# [{}]({})", build.message.trim(), build.link);
            match language {
                Language::Default => format!(
                    "{}\n\n![avatar]({}) {} pushed to {} branch {} {}",
                    heading, build.avatar, build.author, repo_name, build.branch, build.status
                ),
                Language::ZhCn => format!(
                    "{}\n\n![avatar]({}) {} 推送到 {} 的 {} 分支 {}",
                    heading, build.avatar, build.author, repo_name, build.branch, build.status
                ),
            }
        }
        BuildEvent::PullRequest => {
            let reference = if build.ref_spec.is_empty() {
                &build.branch
            } else {
                &build.ref_spec
            };
            match language {
                Language::Default => format!(
                    "{} updated {} pull request {}",
                    build.author, repo_name, reference
                ),
                Language::ZhCn => format!("{} 更新了 {} 合并请求 {}", build.author, repo_name, reference),
            }
        }
        BuildEvent::Tag => match language {
            Language::Default => format!("{} pushed {} tag {}", build.author, repo_name, build.branch),
            Language::ZhCn => format!("{} 推送了 {} 标签 {}", build.author, repo_name, build.branch),
        },
        BuildEvent::Other(_) => String::new(),
    }
}

/// CI 模式下发送的 actionCard
pub fn build_card_message(repo: &RepoInfo, build: &BuildInfo, config: &PluginConfig) -> ActionCardMessage {
    ActionCardMessage {
        title: build.message.clone(),
        text: describe(repo, build, config.language),
        hide_avatar: false,
        button_orientation: ButtonOrientation::Vertical,
        single_title: CARD_BUTTON_TITLE.to_string(),
        single_url: build.link.clone(),
        buttons: Vec::new(),
    }
}
