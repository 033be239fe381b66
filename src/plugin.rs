//! 插件输入 - 仓库、构建与插件配置快照
//!
//! 三者在每次调用时构造一次，之后只读。

/// 仓库信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoInfo {
    pub owner: String,
    pub name: String,
}

impl RepoInfo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// `owner/name` 形式的完整仓库名
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// 一次 CI 运行的构建信息
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildInfo {
    pub tag: String,
    /// 触发事件：push / pull_request / tag，其它值原样保留
    pub event: String,
    pub number: u64,
    /// commit sha
    pub commit: String,
    pub ref_spec: String,
    pub branch: String,
    pub author: String,
    /// 作者头像 URL
    pub avatar: String,
    /// commit message
    pub message: String,
    pub email: String,
    pub status: String,
    /// 构建详情链接
    pub link: String,
    /// 任务开始时间（unix 秒，可带小数）
    pub started_at: f64,
    /// 任务结束时间（unix 秒，可带小数）
    pub finished_at: f64,
}

/// 消息模板语言
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    /// English
    #[default]
    Default,
    /// 简体中文
    ZhCn,
}

impl Language {
    /// 解析语言配置
    ///
    /// 以 `zh_CN` / `zh-CN` 开头（忽略大小写，兼容 `zh_CN.UTF-8`）时为中文，
    /// 其余值（`default`、`en_US`、空串）均回退为英文。
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        if normalized.starts_with("zh_cn") {
            Language::ZhCn
        } else {
            Language::Default
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Default => "default",
            Language::ZhCn => "zh_CN",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 插件行为配置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginConfig {
    /// 钉钉机器人 access_token
    pub access_token: String,
    /// 非 CI 模式下发送的文本
    pub message: String,
    pub language: Language,
    /// 文本消息是否 @所有人
    pub notify_all: bool,
    /// CI 模式：根据构建信息生成 actionCard
    pub ci_mode: bool,
}
