//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;

use pihole_dns_client::{ConnectionConfig, Credentials, PiholeClient};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_pihole {
    () => {
        if std::env::var("PIHOLE_URL").is_err()
            || (std::env::var("PIHOLE_PASSWORD").is_err()
                && std::env::var("PIHOLE_API_TOKEN").is_err())
        {
            eprintln!("跳过测试: 缺少 PIHOLE_URL 或 PIHOLE_PASSWORD/PIHOLE_API_TOKEN");
            return;
        }
    };
}

pub const TEST_SID: &str = "vFA+EP4MQ5JJvJg+3Q2Jnw=";

/// Client pointed at a mock server, retries disabled.
pub fn mock_client(server: &MockServer) -> PiholeClient {
    PiholeClient::new(ConnectionConfig::new(
        server.uri(),
        Credentials::Password("correct horse".to_string()),
    ))
    .expect("mock client should build")
    .with_max_retries(0)
}

/// Client that skips the handshake with a pre-established session.
pub fn mock_client_with_session(server: &MockServer, sid: &str) -> PiholeClient {
    let mut config = ConnectionConfig::new(
        server.uri(),
        Credentials::ApiToken("token".to_string()),
    );
    config.session_id = Some(sid.to_string());
    PiholeClient::new(config)
        .expect("mock client should build")
        .with_max_retries(0)
}

pub fn auth_ok(sid: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "session": {
            "valid": true,
            "totp": false,
            "sid": sid,
            "csrf": "Ux87YTIiMOf/GKCefVIOMw=",
            "validity": 1800,
            "message": "app-password correct"
        },
        "took": 0.04
    }))
}

pub async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(auth_ok(TEST_SID))
        .mount(server)
        .await;
}

pub fn hosts_body(entries: &[&str]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "config": { "dns": { "hosts": entries } },
        "took": 0.001
    }))
}

pub fn cnames_body(entries: &[&str]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "config": { "dns": { "cnameRecords": entries } },
        "took": 0.001
    }))
}

pub fn api_error(status: u16, key: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": { "key": key, "message": message, "hint": null },
        "took": 0.001
    }))
}

/// Live client from `PIHOLE_*` environment variables.
pub fn live_client() -> Option<PiholeClient> {
    let url = env::var("PIHOLE_URL").ok()?;
    let credentials = match env::var("PIHOLE_PASSWORD") {
        Ok(password) => Credentials::Password(password),
        Err(_) => Credentials::ApiToken(env::var("PIHOLE_API_TOKEN").ok()?),
    };
    let mut config = ConnectionConfig::new(url, credentials);
    config.ca_file = env::var("PIHOLE_CA_FILE").ok().map(Into::into);
    config.session_id = env::var("__PIHOLE_SESSION_ID").ok();
    PiholeClient::new(config).ok()
}

/// 生成唯一的测试域名
pub fn generate_test_domain() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("test-{}.pihole-dns.test", &uuid.to_string()[..8])
}
