//! # 宿主进程桥接
//!
//! 通过宿主运行时子进程的 stdio 交换换行分隔的 JSON：
//!
//! ```text
//! 面板 → 宿主   {"id":1,"cmd":"start_server","args":{"host":"0.0.0.0","port":10010,"cburl":""}}
//! 宿主 → 面板   {"id":1,"ok":true,"result":null}
//!               {"id":2,"ok":false,"error":"服务已停止"}
//!               {"event":"log-message","payload":"2024-01-01 12:00:00 [INFO] 服务启动"}
//! ```
//!
//! ## 架构
//! - 每个请求分配递增的 `id`，应答按 `id` 回送给等待中的调用方
//! - 后台任务持续读取 stdout：应答交给对应调用方，事件投递到事件通道，
//!   无法解析为协议消息的行按宿主日志处理
//! - stdout 关闭后，所有等待中的调用以 `BridgeError::Closed` 结束，事件通道随之关闭
//! - 桥接调用本身没有超时，也不自动重启宿主

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

use crate::error::BridgeError;
use crate::models::settings::HostCommand;
use crate::services::bridge::{BridgeEvent, Invoke};

type Reply = Result<Value, BridgeError>;
type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Reply>>>>;
type HostWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// 发往宿主的请求
#[derive(Debug, Serialize)]
struct HostRequest<'a> {
    id: u64,
    cmd: &'a str,
    args: &'a Value,
}

/// 宿主输出的一行
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HostLine {
    Event {
        event: String,
        #[serde(default)]
        payload: Value,
    },
    Reply {
        id: u64,
        ok: bool,
        #[serde(default)]
        result: Value,
        #[serde(default)]
        error: Option<String>,
    },
}

/// 宿主进程桥接
pub struct HostBridge {
    writer: tokio::sync::Mutex<HostWriter>,
    pending: PendingMap,
    next_id: AtomicU64,
    closed: Arc<AtomicBool>,
    /// 宿主子进程；桥接释放时随之结束
    child: Mutex<Option<Child>>,
}

impl HostBridge {
    /// 启动宿主子进程并建立桥接
    ///
    /// # 返回值
    /// 桥接实例和宿主事件接收端
    ///
    /// # 错误
    /// 子进程无法启动或 stdio 不可用时返回错误
    pub fn spawn(command: &HostCommand) -> Result<(Self, UnboundedReceiver<BridgeEvent>), BridgeError> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("宿主 stdin 不可用"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("宿主 stdout 不可用"))?;

        log::info!(
            "宿主进程已启动: {} (pid {:?})",
            command.program,
            child.id()
        );

        let (bridge, events) = Self::from_io(stdout, stdin);
        if let Ok(mut slot) = bridge.child.lock() {
            *slot = Some(child);
        }
        Ok((bridge, events))
    }

    /// 在任意读写端上建立桥接（需在 tokio 运行时内调用）
    pub fn from_io<R, W>(reader: R, writer: W) -> (Self, UnboundedReceiver<BridgeEvent>)
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let closed = Arc::new(AtomicBool::new(false));

        tokio::spawn(read_loop(reader, pending.clone(), closed.clone(), events_tx));

        let bridge = Self {
            writer: tokio::sync::Mutex::new(Box::new(writer)),
            pending,
            next_id: AtomicU64::new(1),
            closed,
            child: Mutex::new(None),
        };
        (bridge, events_rx)
    }

    /// 宿主子进程 ID
    pub fn pid(&self) -> Option<u32> {
        self.child.lock().ok()?.as_ref()?.id()
    }

    /// 与宿主的连接是否已断开
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn take_pending(&self, id: u64) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.remove(&id);
        }
    }
}

#[async_trait]
impl Invoke for HostBridge {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, BridgeError> {
        if self.is_closed() {
            return Err(BridgeError::Closed);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(id, tx);
        }
        // 读循环可能在登记前结束，此时没有人会回送应答
        if self.is_closed() {
            self.take_pending(id);
            return Err(BridgeError::Closed);
        }

        let mut line = serde_json::to_string(&HostRequest {
            id,
            cmd: command,
            args: &args,
        })
        .map_err(std::io::Error::other)?;
        line.push('\n');

        log::debug!("宿主命令 #{}: {}", id, command);
        let written = {
            let mut writer = self.writer.lock().await;
            match writer.write_all(line.as_bytes()).await {
                Ok(()) => writer.flush().await,
                Err(e) => Err(e),
            }
        };
        if let Err(e) = written {
            self.take_pending(id);
            return Err(e.into());
        }

        rx.await.unwrap_or(Err(BridgeError::Closed))
    }
}

async fn read_loop<R>(
    reader: R,
    pending: PendingMap,
    closed: Arc<AtomicBool>,
    events: UnboundedSender<BridgeEvent>,
) where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => dispatch_line(&line, &pending, &events),
            Ok(None) => break,
            Err(e) => {
                log::error!("读取宿主输出失败: {}", e);
                break;
            }
        }
    }

    log::warn!("宿主输出已关闭");
    closed.store(true, Ordering::SeqCst);
    let waiters: Vec<_> = pending
        .lock()
        .map(|mut pending| pending.drain().map(|(_, tx)| tx).collect())
        .unwrap_or_default();
    for waiter in waiters {
        let _ = waiter.send(Err(BridgeError::Closed));
    }
}

fn dispatch_line(line: &str, pending: &PendingMap, events: &UnboundedSender<BridgeEvent>) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    match serde_json::from_str::<HostLine>(line) {
        Ok(HostLine::Event { event, payload }) => match BridgeEvent::from_parts(&event, payload) {
            Some(event) => {
                let _ = events.send(event);
            }
            None => log::debug!("忽略未知宿主事件: {}", event),
        },
        Ok(HostLine::Reply {
            id,
            ok,
            result,
            error,
        }) => {
            let waiter = pending.lock().ok().and_then(|mut pending| pending.remove(&id));
            let reply = if ok {
                Ok(result)
            } else {
                Err(BridgeError::Rejected(error.unwrap_or_default()))
            };
            match waiter {
                Some(waiter) => {
                    let _ = waiter.send(reply);
                }
                None => log::warn!("收到未知请求 #{} 的应答", id),
            }
        }
        // 宿主直接打印到 stdout 的文本按日志处理
        Err(_) => {
            let _ = events.send(BridgeEvent::LogMessage(line.to_string()));
        }
    }
}
