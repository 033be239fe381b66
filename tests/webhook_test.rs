//! DingtalkChannel 测试 - 本地一次性 HTTP 服务器

use drone_dingtalk::{
    BuildInfo, DingtalkChannel, Language, NotificationChannel, Notifier, OutboundMessage,
    PluginConfig, PluginError, RepoInfo, TextMessage, WebhookConfig,
};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Once;
use std::thread::{self, JoinHandle};

static NO_PROXY_INIT: Once = Once::new();

/// 避免系统代理拦截本地请求
///
/// 只设置一次，其它测试在构造 client 前都会经过这里等待设置完成。
fn disable_proxy() {
    NO_PROXY_INIT.call_once(|| {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        std::env::set_var("no_proxy", "127.0.0.1,localhost");
    });
}

/// 捕获的请求
struct CapturedRequest {
    request_line: String,
    body: serde_json::Value,
}

/// 启动只处理一个请求的服务器，返回 (webhook 地址, 请求句柄)
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<CapturedRequest>) {
    disable_proxy();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let captured = read_request(&mut stream);

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        captured
    });

    (format!("http://{}/robot/send", addr), handle)
}

fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let (header_end, content_length) = loop {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "connection closed before headers were complete");
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map(|v| v.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            break (pos + 4, length);
        }
    };

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "connection closed before body was complete");
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let request_line = head.lines().next().unwrap_or_default().to_string();
    let body = serde_json::from_slice(&buf[header_end..header_end + content_length]).unwrap();

    CapturedRequest { request_line, body }
}

fn channel(url: &str) -> DingtalkChannel {
    disable_proxy();
    DingtalkChannel::new(WebhookConfig {
        base_url: url.to_string(),
        access_token: "tok123".to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

#[test]
fn test_text_message_is_posted() {
    let (url, server) = serve_once("200 OK", r#"{"errcode":0,"errmsg":"ok"}"#);

    channel(&url)
        .send(&OutboundMessage::from(TextMessage::new("release done", true)))
        .unwrap();

    let request = server.join().unwrap();
    assert_eq!(request.request_line, "POST /robot/send?access_token=tok123 HTTP/1.1");
    assert_eq!(
        request.body,
        serde_json::json!({
            "msgtype": "text",
            "text": { "content": "release done" },
            "at": { "isAtAll": true }
        })
    );
}

#[test]
fn test_api_rejection_is_error() {
    let (url, server) = serve_once("200 OK", r#"{"errcode":300001,"errmsg":"token is not exist"}"#);

    let err = channel(&url)
        .send(&OutboundMessage::from(TextMessage::new("x", false)))
        .unwrap_err();
    server.join().unwrap();

    let text = err.to_string();
    assert!(text.contains("300001"), "{}", text);
    assert!(text.contains("token is not exist"), "{}", text);
}

#[test]
fn test_http_error_status_is_error() {
    let (url, server) = serve_once("500 Internal Server Error", r#"{"message":"boom"}"#);

    let err = channel(&url)
        .send(&OutboundMessage::from(TextMessage::new("x", false)))
        .unwrap_err();
    server.join().unwrap();

    assert!(err.to_string().contains("500"), "{}", err);
}

#[test]
fn test_unreachable_endpoint_is_error() {
    // 绑定后立即释放端口，连接会被拒绝
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    disable_proxy();

    let err = channel(&format!("http://{}/robot/send", addr))
        .send(&OutboundMessage::from(TextMessage::new("x", false)))
        .unwrap_err();

    assert!(err.to_string().contains("HTTP request failed"), "{}", err);
}

#[test]
fn test_notifier_posts_action_card() {
    let (url, server) = serve_once("200 OK", r#"{"errcode":0,"errmsg":"ok"}"#);

    let build = BuildInfo {
        event: "tag".to_string(),
        branch: "v2.0.0".to_string(),
        author: "bob".to_string(),
        message: "release v2".to_string(),
        link: "https://ci.example.com/o/r/99".to_string(),
        ..Default::default()
    };
    let config = PluginConfig {
        access_token: "tok123".to_string(),
        language: Language::ZhCn,
        ci_mode: true,
        ..Default::default()
    };

    Notifier::new(RepoInfo::new("o", "r"), build, config)
        .execute(WebhookConfig {
            base_url: url,
            access_token: String::new(),
            timeout_secs: 5,
        })
        .unwrap();

    let request = server.join().unwrap();
    assert!(request.request_line.contains("access_token=tok123"));
    assert_eq!(
        request.body,
        serde_json::json!({
            "msgtype": "actionCard",
            "actionCard": {
                "title": "release v2",
                "text": "bob 推送了 o/r 标签 v2.0.0",
                "hideAvatar": "0",
                "btnOrientation": "0",
                "singleTitle": "Drone",
                "singleURL": "https://ci.example.com/o/r/99"
            }
        })
    );
}

#[test]
fn test_notifier_surfaces_rejection_as_transport_error() {
    let (url, server) = serve_once("200 OK", r#"{"errcode":130101,"errmsg":"send too fast"}"#);

    let config = PluginConfig {
        access_token: "tok123".to_string(),
        message: "hi".to_string(),
        ..Default::default()
    };

    let err = Notifier::new(RepoInfo::default(), BuildInfo::default(), config)
        .execute(WebhookConfig {
            base_url: url,
            access_token: String::new(),
            timeout_secs: 5,
        })
        .unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, PluginError::Transport(_)));
    assert_eq!(err.to_string(), "dingtalk rejected message (130101): send too fast");
}
