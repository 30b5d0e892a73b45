//! # 请求进度指示
//!
//! 每个 HTTP 请求在发出前将全局进度条切换为"开始"，结束后切换为"完成"。
//! `Progress::start()` 返回一个守卫，守卫析构时触发"完成"，
//! 因此无论请求走哪条退出路径（成功、闸门关闭、传输失败、应用错误），完成事件都恰好触发一次。

use std::sync::Arc;

/// 进度条的实际展示端（如向 webview 发送事件）
pub trait ProgressSink: Send + Sync {
    fn start(&self);
    fn done(&self);
}

/// 不做任何展示的进度端
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn start(&self) {}
    fn done(&self) {}
}

/// 共享的进度指示器
#[derive(Clone)]
pub struct Progress {
    sink: Arc<dyn ProgressSink>,
}

impl Progress {
    pub fn new(sink: Arc<dyn ProgressSink>) -> Self {
        Self { sink }
    }

    /// 不做任何展示的进度指示器，用于无界面环境
    pub fn silent() -> Self {
        Self::new(Arc::new(SilentProgress))
    }

    /// 开始一次进度，返回的守卫析构时完成
    #[must_use = "进度在守卫析构时结束"]
    pub fn start(&self) -> ProgressGuard {
        self.sink.start();
        ProgressGuard {
            sink: self.sink.clone(),
        }
    }
}

/// 进度守卫
pub struct ProgressGuard {
    sink: Arc<dyn ProgressSink>,
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        self.sink.done();
    }
}
