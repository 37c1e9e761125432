use super::{HttpClient, HttpReply, HttpRequest};
use crate::config::TelegramConfig;
use crate::error::SendError;
use async_trait::async_trait;

/// reqwest-backed client, configured once per invocation.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, SendError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("zbx-telegram/{}", env!("CARGO_PKG_VERSION")));

        if let Some(proxy) = &config.proxy {
            let proxy_setting =
                reqwest::Proxy::all(proxy_url(proxy)).map_err(|source| SendError::InvalidProxy {
                    proxy: proxy.clone(),
                    source,
                })?;
            builder = builder.proxy(proxy_setting);
            tracing::debug!("[Telegram Webhook] using proxy {}", proxy);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

/// Zabbix passes proxies as `host:port`; assume plain HTTP when no scheme is given.
fn proxy_url(proxy: &str) -> String {
    if proxy.contains("://") {
        proxy.to_string()
    } else {
        format!("http://{}", proxy)
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn post(&self, request: HttpRequest) -> Result<HttpReply, SendError> {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.body).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpReply { status, body })
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AlertParams, Config};
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn telegram_config(proxy: Option<&str>) -> TelegramConfig {
        let params = AlertParams {
            token: "123:abc".to_string(),
            chat_id: None,
            message: None,
            proxy: proxy.map(str::to_string),
            parse_mode: None,
        };
        Config::default().telegram_for(&params)
    }

    #[tokio::test]
    async fn test_post_returns_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("Content-Type", "application/json"))
            .and(body_string(r#"{"a":1}"#))
            .respond_with(ResponseTemplate::new(201).set_body_string("created"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReqwestClient::new(&telegram_config(None)).unwrap();
        let reply = client
            .post(HttpRequest {
                url: format!("{}/echo", server.uri()),
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body: r#"{"a":1}"#.to_string(),
            })
            .await
            .unwrap();

        assert_eq!(reply.status, 201);
        assert_eq!(reply.body, "created");
    }

    #[tokio::test]
    async fn test_error_status_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = ReqwestClient::new(&telegram_config(None)).unwrap();
        let reply = client
            .post(HttpRequest {
                url: server.uri(),
                headers: Vec::new(),
                body: String::new(),
            })
            .await
            .unwrap();

        assert_eq!(reply.status, 502);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = ReqwestClient::new(&telegram_config(None)).unwrap();
        let result = client
            .post(HttpRequest {
                url: "http://127.0.0.1:1/sendMessage".to_string(),
                headers: Vec::new(),
                body: String::new(),
            })
            .await;

        assert!(matches!(result, Err(SendError::Transport(_))));
    }

    #[test]
    fn test_proxy_url_scheme() {
        assert_eq!(proxy_url("proxy.local:3128"), "http://proxy.local:3128");
        assert_eq!(proxy_url("socks5://10.0.0.1:1080"), "socks5://10.0.0.1:1080");
    }

    #[test]
    fn test_proxy_host_port_accepted() {
        assert!(ReqwestClient::new(&telegram_config(Some("proxy.local:3128"))).is_ok());
    }
}
