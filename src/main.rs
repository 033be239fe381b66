//! Drone DingTalk plugin
//!
//! 读取 Drone 构建信息，发送到钉钉机器人

use anyhow::Result;
use drone_dingtalk::cli::{handle_run, parse_with_env_file};
use std::ffi::OsString;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // 当前目录下的 .env（不存在时忽略）
    dotenv::dotenv().ok();

    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("drone_dingtalk=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let argv: Vec<OsString> = std::env::args_os().collect();
    let args = match parse_with_env_file(argv) {
        Ok(args) => args,
        // --help / --version / 参数错误按 clap 的方式输出并退出
        Err(e) => match e.downcast_ref::<clap::Error>() {
            Some(clap_err) => clap_err.exit(),
            None => return Err(e),
        },
    };

    handle_run(args)
}
