//! # 请求就绪闸门
//!
//! 记录宿主 HTTP 服务是否已确认运行。每个 HTTP 请求在发出前检查闸门，
//! 闸门关闭时请求直接失败，不产生任何网络访问。
//!
//! ## 纪元（epoch）
//! 闸门内部维护一个单调递增的纪元计数。请求发出时领取 `GateTicket` 记下当前纪元，
//! 响应返回后再核对票据：若期间服务被停止（纪元已变化），结果被丢弃。
//! 这样 `stop()` 与正在进行中的请求之间不会把已停止服务的数据交给调用方。
//!
//! 闸门以 `Clone` 句柄的形式显式注入 HTTP 客户端和 Session Store，不存在全局单例。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Debug, Default)]
struct GateInner {
    open: AtomicBool,
    epoch: AtomicU64,
}

/// 请求就绪闸门（共享句柄）
#[derive(Debug, Clone, Default)]
pub struct ReadinessGate {
    inner: Arc<GateInner>,
}

impl ReadinessGate {
    /// 创建关闭状态的闸门
    pub fn new() -> Self {
        Self::default()
    }

    /// 服务是否已确认运行
    pub fn is_open(&self) -> bool {
        self.inner.open.load(Ordering::SeqCst)
    }

    /// 设置运行标志
    ///
    /// 由开到关的转换会推进纪元，使所有已发出请求的票据失效。
    pub fn set(&self, running: bool) {
        let was_open = self.inner.open.swap(running, Ordering::SeqCst);
        if was_open && !running {
            self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// 推进纪元，不改变运行标志
    ///
    /// 在停止服务的第一步调用：宿主确认停止之前，进行中的请求结果就已作废。
    pub fn invalidate(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// 当前纪元
    ///
    /// # 返回值
    /// 自创建以来服务被停止（或被显式作废）的次数；票据以它判断请求是否过期
    pub fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::SeqCst)
    }

    /// 领取请求票据
    ///
    /// # 返回值
    /// - `Some(ticket)` - 闸门开启，票据记录当前纪元
    /// - `None` - 闸门关闭
    pub fn ticket(&self) -> Option<GateTicket> {
        let epoch = self.epoch();
        self.is_open().then(|| GateTicket {
            gate: self.clone(),
            epoch,
        })
    }
}

/// 请求票据：发出请求时的闸门快照
#[derive(Debug)]
pub struct GateTicket {
    gate: ReadinessGate,
    epoch: u64,
}

impl GateTicket {
    /// 票据是否仍然有效：闸门开启且纪元未变化
    pub fn is_current(&self) -> bool {
        self.gate.is_open() && self.gate.epoch() == self.epoch
    }
}
