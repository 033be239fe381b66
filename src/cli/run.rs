// src/cli/run.rs
//! 插件入口参数 - 从命令行 / 环境变量读取仓库、构建与插件配置
//!
//! Drone 以环境变量传入全部参数（`PLUGIN_*` 来自 settings，`DRONE_*` 由 runner 注入），
//! 每个参数同时支持同名 flag。

use crate::notification::{DryRunChannel, Notifier, WebhookConfig, DINGTALK_API_URL};
use crate::plugin::{BuildInfo, Language, PluginConfig, RepoInfo};
use anyhow::{anyhow, Result};
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args, Parser};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// access_token 的备用环境变量
pub const ACCESS_TOKEN_FALLBACK_ENV: &str = "DINGTALK_ACCESS_TOKEN";

/// message 的备用环境变量
pub const MESSAGE_FALLBACK_ENV: &str = "MESSAGE";

/// 命令行入口
#[derive(Parser, Debug)]
#[command(name = "drone-dingtalk")]
#[command(about = "Drone DingTalk - 通过 Webhook 发送构建通知到钉钉群")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub args: RunArgs,
}

/// 插件参数
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// 钉钉机器人 access_token
    #[arg(long, env = "PLUGIN_ACCESS_TOKEN", default_value = "", hide_env_values = true)]
    pub access_token: String,

    /// 文本消息内容（非 CI 模式）
    #[arg(long, env = "PLUGIN_MESSAGE", default_value = "")]
    pub message: String,

    /// 模板语言: default, zh_CN
    #[arg(long, env = "PLUGIN_LANG", default_value = "default")]
    pub lang: String,

    /// 文本消息 @所有人
    #[arg(long, env = "PLUGIN_IS_AT_ALL", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub is_at_all: bool,

    /// 运行在 Drone 中（CI 模式，发送构建 actionCard）
    #[arg(long, env = "DRONE", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub drone: bool,

    /// 钉钉 webhook 地址
    #[arg(long, env = "PLUGIN_WEBHOOK_URL", default_value = DINGTALK_API_URL)]
    pub webhook_url: String,

    /// 请求超时（秒）
    #[arg(long, env = "PLUGIN_TIMEOUT", default_value = "30")]
    pub timeout: u64,

    /// 只打印请求体，不发送
    #[arg(long, env = "PLUGIN_DRY_RUN", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub dry_run: bool,

    /// 仓库 owner
    #[arg(long, env = "DRONE_REPO_OWNER", default_value = "")]
    pub repo_owner: String,

    /// 仓库名称
    #[arg(long, env = "DRONE_REPO_NAME", default_value = "")]
    pub repo_name: String,

    /// commit sha
    #[arg(long, env = "DRONE_COMMIT_SHA", default_value = "")]
    pub commit_sha: String,

    /// commit ref spec
    #[arg(long, env = "DRONE_COMMIT_REFSPEC", default_value = "")]
    pub commit_refspec: String,

    /// commit 分支
    #[arg(long, env = "DRONE_COMMIT_BRANCH", default_value = "master")]
    pub commit_branch: String,

    /// commit 作者
    #[arg(long, env = "DRONE_COMMIT_AUTHOR", default_value = "")]
    pub commit_author: String,

    /// commit 作者邮箱
    #[arg(long, env = "DRONE_COMMIT_AUTHOR_EMAIL", default_value = "")]
    pub commit_author_email: String,

    /// commit 作者头像
    #[arg(long, env = "DRONE_COMMIT_AUTHOR_AVATAR", default_value = "")]
    pub commit_author_avatar: String,

    /// commit message
    #[arg(long, env = "DRONE_COMMIT_MESSAGE", default_value = "")]
    pub commit_message: String,

    /// 构建事件
    #[arg(long, env = "DRONE_BUILD_EVENT", default_value = "push")]
    pub build_event: String,

    /// 构建编号
    #[arg(long, env = "DRONE_BUILD_NUMBER", default_value = "0")]
    pub build_number: u64,

    /// 构建状态
    #[arg(long, env = "DRONE_BUILD_STATUS", default_value = "success")]
    pub build_status: String,

    /// 构建链接
    #[arg(long, env = "DRONE_BUILD_LINK", default_value = "")]
    pub build_link: String,

    /// 构建 tag
    #[arg(long, env = "DRONE_TAG", default_value = "")]
    pub build_tag: String,

    /// 任务开始时间（unix 秒，可带小数）
    #[arg(long, env = "DRONE_JOB_STARTED", default_value = "0")]
    pub job_started: f64,

    /// 任务结束时间（unix 秒，可带小数）
    #[arg(long, env = "DRONE_JOB_FINISHED", default_value = "0")]
    pub job_finished: f64,

    /// 预加载的 .env 文件
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,
}

impl RunArgs {
    pub fn repo(&self) -> RepoInfo {
        RepoInfo::new(self.repo_owner.clone(), self.repo_name.clone())
    }

    pub fn build(&self) -> BuildInfo {
        BuildInfo {
            tag: self.build_tag.clone(),
            event: self.build_event.clone(),
            number: self.build_number,
            commit: self.commit_sha.clone(),
            ref_spec: self.commit_refspec.clone(),
            branch: self.commit_branch.clone(),
            author: self.commit_author.clone(),
            avatar: self.commit_author_avatar.clone(),
            message: self.commit_message.clone(),
            email: self.commit_author_email.clone(),
            status: self.build_status.clone(),
            link: self.build_link.clone(),
            started_at: self.job_started,
            finished_at: self.job_finished,
        }
    }

    /// 插件配置，空值回退到备用环境变量
    pub fn plugin_config(&self) -> PluginConfig {
        self.plugin_config_with(|name| std::env::var(name).ok())
    }

    /// 同 `plugin_config`，环境变量查询可注入
    pub fn plugin_config_with<F>(&self, lookup: F) -> PluginConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        PluginConfig {
            access_token: or_fallback(&self.access_token, ACCESS_TOKEN_FALLBACK_ENV, &lookup),
            message: or_fallback(&self.message, MESSAGE_FALLBACK_ENV, &lookup),
            language: Language::parse(&self.lang),
            notify_all: self.is_at_all,
            ci_mode: self.drone,
        }
    }

    pub fn webhook_config(&self) -> WebhookConfig {
        WebhookConfig {
            base_url: self.webhook_url.clone(),
            access_token: String::new(),
            timeout_secs: self.timeout,
        }
    }
}

fn or_fallback<F>(value: &str, fallback_env: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if !value.is_empty() {
        return value.to_string();
    }
    lookup(fallback_env).unwrap_or_default()
}

/// 加载 .env 文件（已存在的环境变量不会被覆盖）
pub fn load_env_file(path: &Path) -> Result<()> {
    dotenv::from_path(path)
        .map_err(|e| anyhow!("Failed to load env file '{}': {}", path.display(), e))?;
    debug!(path = %path.display(), "Loaded env file");
    Ok(())
}

/// 解析参数；指定 `--env-file` 时先加载文件再重新解析，
/// 使文件中的变量参与 `env = ...` 取值
pub fn parse_with_env_file<I, T>(argv: I) -> Result<RunArgs>
where
    I: IntoIterator<Item = T> + Clone,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(argv.clone())?;

    match cli.args.env_file.as_deref() {
        Some(path) => {
            load_env_file(path)?;
            Ok(Cli::try_parse_from(argv)?.args)
        }
        None => Ok(cli.args),
    }
}

/// 执行插件
pub fn handle_run(args: RunArgs) -> Result<()> {
    let notifier = Notifier::new(args.repo(), args.build(), args.plugin_config());

    info!(
        repo = %notifier.repo().full_name(),
        event = %notifier.build().event,
        build = notifier.build().number,
        ci_mode = notifier.config().ci_mode,
        dry_run = args.dry_run,
        "Running dingtalk plugin"
    );

    if args.dry_run {
        notifier.execute_with(|_| Ok(DryRunChannel::new()))?;
    } else {
        notifier.execute(args.webhook_config())?;
    }

    Ok(())
}
