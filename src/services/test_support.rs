//! 测试辅助：脚本化宿主、通知记录器、进度计数器和本地 HTTP 桩服务

use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use serde_json::{Value, json};

use crate::error::BridgeError;
use crate::services::bridge::Invoke;
use crate::services::gate::ReadinessGate;
use crate::services::http_client::HttpClient;
use crate::services::notify::{Notice, NoticeLevel, Notifier};
use crate::services::progress::{Progress, ProgressSink};

// ============ 脚本化宿主 ============

/// 按命令名预置应答的宿主桥接
///
/// 每条应答被消费一次；某命令只剩最后一条成功应答时，该应答被重复使用。
#[derive(Default)]
pub struct ScriptedHost {
    replies: Mutex<HashMap<String, VecDeque<Result<Value, BridgeError>>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, command: &str, reply: Result<Value, BridgeError>) {
        self.replies
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|(name, _)| name).collect()
    }
}

#[async_trait]
impl Invoke for ScriptedHost {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, BridgeError> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), args));

        let mut replies = self.replies.lock().unwrap();
        let queue = replies.entry(command.to_string()).or_default();
        if queue.len() == 1 {
            if let Some(Ok(value)) = queue.front() {
                return Ok(value.clone());
            }
        }
        queue
            .pop_front()
            .unwrap_or_else(|| Err(BridgeError::Rejected(format!("未预置应答: {}", command))))
    }
}

// ============ 通知与进度 ============

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn levels(&self) -> Vec<NoticeLevel> {
        self.notices.lock().unwrap().iter().map(|n| n.level).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[derive(Default)]
pub struct CountingProgress {
    starts: AtomicUsize,
    dones: AtomicUsize,
}

impl CountingProgress {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn progress(self: &Arc<Self>) -> Progress {
        Progress::new(self.clone())
    }

    /// (开始次数, 完成次数)
    pub fn counts(&self) -> (usize, usize) {
        (
            self.starts.load(Ordering::SeqCst),
            self.dones.load(Ordering::SeqCst),
        )
    }
}

impl ProgressSink for CountingProgress {
    fn start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }
    fn done(&self) {
        self.dones.fetch_add(1, Ordering::SeqCst);
    }
}

// ============ HTTP 桩服务 ============

/// 桩服务的一条路由
#[derive(Clone)]
pub struct StubRoute {
    method: &'static str,
    path: &'static str,
    status: u16,
    body: String,
    delay: Duration,
}

impl StubRoute {
    /// 返回成功信封
    pub fn ok(method: &'static str, path: &'static str, data: Value) -> Self {
        Self::raw(
            method,
            path,
            200,
            &json!({ "status": 0, "data": data, "error": null }).to_string(),
        )
    }

    /// 返回 `status = 1` 的错误信封
    pub fn app_error(method: &'static str, path: &'static str, error: &str) -> Self {
        Self::raw(
            method,
            path,
            200,
            &json!({ "status": 1, "data": null, "error": error }).to_string(),
        )
    }

    /// 只返回状态码
    pub fn status(method: &'static str, path: &'static str, status: u16) -> Self {
        Self::raw(method, path, status, "")
    }

    pub fn raw(method: &'static str, path: &'static str, status: u16, body: &str) -> Self {
        Self {
            method,
            path,
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// 基于 hyper 的本地 HTTP 桩服务
///
/// 未配置的路由返回 404。记录每个请求的 "方法 路径?查询" 与请求体。
pub struct StubServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl StubServer {
    pub async fn start(routes: Vec<StubRoute>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Arc<HashMap<String, StubRoute>> = Arc::new(
            routes
                .into_iter()
                .map(|r| (format!("{} {}", r.method, r.path), r))
                .collect(),
        );
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let (task_hits, task_requests) = (hits.clone(), requests.clone());
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = routes.clone();
                let hits = task_hits.clone();
                let requests = task_requests.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let routes = routes.clone();
                        let hits = hits.clone();
                        let requests = requests.clone();
                        async move {
                            hits.fetch_add(1, Ordering::SeqCst);
                            let key = format!("{} {}", req.method(), req.uri().path());
                            let target = format!("{} {}", req.method(), req.uri());
                            let body = req
                                .into_body()
                                .collect()
                                .await
                                .map(|b| b.to_bytes())
                                .unwrap_or_default();
                            requests
                                .lock()
                                .unwrap()
                                .push((target, String::from_utf8_lossy(&body).to_string()));

                            let route = routes
                                .get(&key)
                                .cloned()
                                .unwrap_or_else(|| StubRoute::status("GET", "/", 404));
                            if !route.delay.is_zero() {
                                tokio::time::sleep(route.delay).await;
                            }

                            Ok::<_, Infallible>(
                                Response::builder()
                                    .status(route.status)
                                    .header("content-type", "application/json")
                                    .body(Full::new(Bytes::from(route.body)))
                                    .unwrap(),
                            )
                        }
                    });
                    let _ = hyper::server::conn::http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            addr,
            hits,
            requests,
        }
    }

    /// 形如 `127.0.0.1:port` 的地址，与宿主 `ip` 命令返回格式一致
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

/// 构造指向桩服务的客户端
pub fn client_for(
    server: &StubServer,
    running: bool,
) -> (HttpClient, Arc<RecordingNotifier>, Arc<CountingProgress>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let progress = CountingProgress::new();
    let gate = ReadinessGate::new();
    gate.set(running);
    let client = HttpClient::with_base_url(
        server.base_url(),
        gate,
        progress.progress(),
        notifier.clone(),
        Duration::from_secs(5),
    )
    .unwrap();
    (client, notifier, progress)
}
