//! # HTTP 请求客户端
//!
//! 访问宿主启动的本地 HTTP 服务的唯一入口，所有请求都经过同一条流水线：
//!
//! 1. 进度条切换为"开始"（守卫析构时"完成"，每条退出路径恰好一次）
//! 2. 检查就绪闸门：关闭时提示"请先启动HTTP服务"并以 `NotReady` 失败，不发起网络访问
//! 3. 发送请求（超时默认 10 秒）
//! 4. 归一化响应为 `Outcome`：
//!    - `Data` - 返回 `Ok(Some(data))`，不弹提示
//!    - `Empty` - 成功但 `data` 为空，返回 `Ok(None)`，不弹提示
//!    - `AppError` - 弹出服务端错误信息，返回 `Ok(None)`（不是失败）
//!    - `Transport` - 弹出分类提示语，返回 `Err(RequestError::Transport)`
//! 5. 核对闸门票据：请求途中服务被停止时丢弃结果，以警告级别提示并以 `NotReady` 失败
//!
//! 基础地址 `http://<ip:port>` 在构造时通过宿主桥接查询一次，构造完成前不能发出请求。

use std::sync::Arc;
use std::time::Duration;

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{NOT_READY_MESSAGE, PanelError, RequestError};
use crate::models::envelope::{Outcome, status_message};
use crate::services::bridge::Commands;
use crate::services::gate::ReadinessGate;
use crate::services::notify::{Notice, Notifier};
use crate::services::progress::Progress;

/// HTTP 请求客户端
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    gate: ReadinessGate,
    progress: Progress,
    notifier: Arc<dyn Notifier>,
}

impl HttpClient {
    /// 通过宿主桥接解析服务地址并构造客户端
    ///
    /// # 错误
    /// 宿主查询地址失败，或 HTTP 客户端初始化失败时返回错误
    pub async fn connect(
        commands: &Commands,
        gate: ReadinessGate,
        progress: Progress,
        notifier: Arc<dyn Notifier>,
        timeout: Duration,
    ) -> Result<Self, PanelError> {
        let address = commands.local_address().await?;
        log::info!("宿主 HTTP 服务地址: {}", address);
        Self::with_base_url(format!("http://{}", address), gate, progress, notifier, timeout)
    }

    /// 使用已知的基础地址构造客户端
    ///
    /// # 参数
    /// - `base_url` - 服务基础地址，末尾的 `/` 会被去掉
    /// - `gate` - 就绪闸门
    /// - `progress` - 进度指示器
    /// - `notifier` - 错误提示的展示端
    /// - `timeout` - 单个请求的超时
    ///
    /// # 错误
    /// reqwest 客户端初始化失败时返回 `PanelError::Client`
    pub fn with_base_url(
        base_url: impl Into<String>,
        gate: ReadinessGate,
        progress: Progress,
        notifier: Arc<dyn Notifier>,
        timeout: Duration,
    ) -> Result<Self, PanelError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            gate,
            progress,
            notifier,
        })
    }

    /// 服务基础地址，形如 `http://192.168.1.5:10010`，不带末尾的 `/`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 客户端使用的就绪闸门，与 Session Store 共享同一个句柄
    pub fn gate(&self) -> &ReadinessGate {
        &self.gate
    }

    /// GET 请求
    ///
    /// # 返回值
    /// - `Ok(Some(data))` - 信封 `status == 0`
    /// - `Ok(None)` - 信封 `status != 0`，已弹出服务端错误信息
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, RequestError> {
        self.dispatch(path, |http, url| http.get(url)).await
    }

    /// 带查询参数的 GET 请求
    pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<Option<T>, RequestError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.dispatch(path, |http, url| http.get(url).query(query))
            .await
    }

    /// POST 请求，请求体序列化为 JSON
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<Option<T>, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(path, |http, url| http.post(url).json(body))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn dispatch<T, F>(&self, path: &str, build: F) -> Result<Option<T>, RequestError>
    where
        T: DeserializeOwned,
        F: FnOnce(&reqwest::Client, String) -> RequestBuilder,
    {
        let _progress = self.progress.start();

        let Some(ticket) = self.gate.ticket() else {
            self.notifier.notify(Notice::error(NOT_READY_MESSAGE));
            return Err(RequestError::NotReady);
        };

        let url = self.url(path);
        log::debug!("发送请求: {}", url);
        let outcome = normalize(build(&self.http, url).send().await).await;

        if !ticket.is_current() {
            log::warn!("服务已停止，丢弃请求结果: {}", path);
            self.notifier.notify(Notice::warning(NOT_READY_MESSAGE));
            return Err(RequestError::NotReady);
        }

        match outcome {
            Outcome::Data(data) => Ok(Some(data)),
            Outcome::Empty => Ok(None),
            Outcome::AppError(message) => {
                log::warn!("请求 {} 返回错误: {}", path, message);
                self.notifier.notify(Notice::error(message));
                Ok(None)
            }
            Outcome::Transport {
                status,
                message,
                detail,
            } => {
                log::error!("请求 {} 失败: {} ({})", path, message, detail);
                self.notifier.notify(Notice::error(message.clone()));
                Err(RequestError::Transport {
                    status,
                    message,
                    detail,
                })
            }
        }
    }
}

/// 将 reqwest 的响应归一化为 `Outcome`
async fn normalize<T: DeserializeOwned>(
    response: Result<reqwest::Response, reqwest::Error>,
) -> Outcome<T> {
    let response = match response {
        Ok(response) => response,
        Err(e) => return transport_failure(&e),
    };

    let status = response.status();
    if !status.is_success() {
        return Outcome::Transport {
            status: Some(status.as_u16()),
            message: status_message(status.as_u16()),
            detail: format!("{} {}", status, response.url()),
        };
    }

    match response.bytes().await {
        Ok(body) => Outcome::from_body(&body),
        Err(e) => transport_failure(&e),
    }
}

fn transport_failure<T>(e: &reqwest::Error) -> Outcome<T> {
    let status = e.status().map(|s| s.as_u16());
    let message = match status {
        Some(code) => status_message(code),
        None if e.is_timeout() => "请求超时".to_string(),
        None => "网络连接失败".to_string(),
    };
    Outcome::Transport {
        status,
        message,
        detail: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{
        CountingProgress, RecordingNotifier, StubRoute, StubServer, client_for,
    };
    use crate::services::notify::NoticeLevel;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_closed_gate_makes_no_network_call() {
        let server = StubServer::start(vec![StubRoute::ok("GET", "/dbs", json!(["db1"]))]).await;
        let (client, notifier, progress) = client_for(&server, false);

        let err = client.get::<Vec<String>>("/dbs").await.unwrap_err();

        assert!(err.is_not_ready());
        assert_eq!(server.hits(), 0);
        assert_eq!(notifier.messages(), vec![NOT_READY_MESSAGE.to_string()]);
        assert_eq!(notifier.levels(), vec![NoticeLevel::Error]);
        assert_eq!(progress.counts(), (1, 1));
    }

    #[tokio::test]
    async fn test_success_unwraps_envelope() {
        let server =
            StubServer::start(vec![StubRoute::ok("GET", "/dbs", json!(["db1", "db2"]))]).await;
        let (client, notifier, progress) = client_for(&server, true);

        let dbs: Option<Vec<String>> = client.get("/dbs").await.unwrap();

        assert_eq!(dbs, Some(vec!["db1".to_string(), "db2".to_string()]));
        assert!(notifier.messages().is_empty());
        assert_eq!(progress.counts(), (1, 1));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_app_error_resolves_empty_with_one_notice() {
        let server = StubServer::start(vec![StubRoute::app_error("POST", "/sql", "no permission")])
            .await;
        let (client, notifier, progress) = client_for(&server, true);

        let rows: Option<Value> = client
            .post("/sql", &json!({ "db": "MicroMsg.db", "sql": "select 1" }))
            .await
            .unwrap();

        assert!(rows.is_none());
        assert_eq!(notifier.messages(), vec!["no permission".to_string()]);
        assert_eq!(progress.counts(), (1, 1));
        assert_eq!(
            server.requests()[0].1,
            r#"{"db":"MicroMsg.db","sql":"select 1"}"#
        );
    }

    #[tokio::test]
    async fn test_null_data_resolves_empty_without_notice() {
        let server = StubServer::start(vec![StubRoute::ok("GET", "/contacts", Value::Null)]).await;
        let (client, notifier, progress) = client_for(&server, true);

        let contacts: Option<Vec<Value>> = client.get("/contacts").await.unwrap();

        assert!(contacts.is_none());
        assert!(notifier.messages().is_empty());
        assert_eq!(progress.counts(), (1, 1));
    }

    #[tokio::test]
    async fn test_http_404_rejects_with_category_message() {
        let server = StubServer::start(vec![]).await;
        let (client, notifier, progress) = client_for(&server, true);

        let err = client.get::<Value>("/missing").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "请求出错(404)");
        assert_eq!(notifier.messages(), vec!["请求出错(404)".to_string()]);
        assert_eq!(progress.counts(), (1, 1));
    }

    #[tokio::test]
    async fn test_http_503_maps_to_unavailable() {
        let server = StubServer::start(vec![StubRoute::status("GET", "/dbs", 503)]).await;
        let (client, notifier, _progress) = client_for(&server, true);

        let err = client.get::<Value>("/dbs").await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(notifier.messages(), vec!["服务不可用(503)".to_string()]);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let notifier = Arc::new(RecordingNotifier::default());
        let progress = CountingProgress::new();
        let gate = ReadinessGate::new();
        gate.set(true);
        // 端口 1 在测试环境中没有监听者
        let client = HttpClient::with_base_url(
            "http://127.0.0.1:1",
            gate,
            progress.progress(),
            notifier.clone(),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.get::<Value>("/dbs").await.unwrap_err();
        assert_eq!(err.status(), None);
        assert_eq!(notifier.messages().len(), 1);
        assert_eq!(progress.counts(), (1, 1));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = StubServer::start(vec![
            StubRoute::ok("GET", "/dbs", json!([])).delayed(Duration::from_millis(800)),
        ])
        .await;
        let notifier = Arc::new(RecordingNotifier::default());
        let gate = ReadinessGate::new();
        gate.set(true);
        let client = HttpClient::with_base_url(
            server.base_url(),
            gate,
            Progress::silent(),
            notifier.clone(),
            Duration::from_millis(100),
        )
        .unwrap();

        let err = client.get::<Value>("/dbs").await.unwrap_err();
        assert_eq!(err.to_string(), "请求超时");
    }

    #[tokio::test]
    async fn test_invalid_envelope_is_transport_error() {
        let server = StubServer::start(vec![StubRoute::raw("GET", "/dbs", 200, "not json")]).await;
        let (client, notifier, _progress) = client_for(&server, true);

        let err = client.get::<Value>("/dbs").await.unwrap_err();
        assert!(matches!(err, RequestError::Transport { status: None, .. }));
        assert_eq!(notifier.messages(), vec!["响应格式错误".to_string()]);
    }

    #[tokio::test]
    async fn test_stop_during_request_discards_result() {
        let server = StubServer::start(vec![
            StubRoute::ok("GET", "/dbs", json!(["db1"])).delayed(Duration::from_millis(300)),
        ])
        .await;
        let (client, notifier, progress) = client_for(&server, true);
        let gate = client.gate().clone();

        let stopper = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            gate.invalidate();
            gate.set(false);
        };
        let (result, _) = tokio::join!(client.get::<Vec<String>>("/dbs"), stopper);

        assert!(result.unwrap_err().is_not_ready());
        assert_eq!(server.hits(), 1);
        assert_eq!(notifier.messages(), vec![NOT_READY_MESSAGE.to_string()]);
        assert_eq!(notifier.levels(), vec![NoticeLevel::Warning]);
        assert_eq!(progress.counts(), (1, 1));
    }

    #[tokio::test]
    async fn test_query_parameters() {
        let server = StubServer::start(vec![StubRoute::ok("GET", "/pyq", json!(true))]).await;
        let (client, _notifier, _progress) = client_for(&server, true);

        let ok: Option<bool> = client.get_with("/pyq", &[("id", "0")]).await.unwrap();
        assert_eq!(ok, Some(true));
        assert_eq!(server.requests()[0].0, "GET /pyq?id=0");
    }
}
