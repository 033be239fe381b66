/// 插件调用返回的错误
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("missing dingtalk access token")]
    MissingCredential,

    #[error("missing message to send")]
    MissingMessage,

    /// 通知通道返回的错误，原样透传
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// 使用 PluginError 的 Result
pub type Result<T> = std::result::Result<T, PluginError>;
