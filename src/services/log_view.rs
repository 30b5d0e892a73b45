//! # 宿主日志视图
//!
//! 保存宿主通过 `log-message` 事件推送的日志行，容量有上限，
//! 超出后从最早的行开始淘汰，保留行的顺序不变。
//!
//! ## 序号
//! 每一行在追加时获得一个单调递增的序号（从 0 开始），淘汰不会改变其余行的序号。
//! 界面以序号作为游标增量拉取，视图写满后仍能拿到新行。

use std::collections::VecDeque;

use serde::Serialize;

/// 默认最大行数
pub const DEFAULT_MAX_LINES: usize = 9999;

/// 一次增量拉取的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSlice {
    /// 游标之后仍保留在视图中的行
    pub lines: Vec<String>,
    /// 下一次拉取使用的游标
    pub next: u64,
    /// 游标指向的行已被淘汰，中间有日志丢失
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct LogView {
    max_lines: usize,
    lines: VecDeque<String>,
    /// 已追加的总行数，即下一行的序号
    total: u64,
}

impl LogView {
    /// 创建日志视图
    ///
    /// # 参数
    /// - `max_lines` - 最多保留的行数，小于 1 时按 1 处理
    pub fn new(max_lines: usize) -> Self {
        let max_lines = max_lines.max(1);
        Self {
            max_lines,
            lines: VecDeque::with_capacity(max_lines.min(1024)),
            total: 0,
        }
    }

    /// 追加一条日志
    ///
    /// 多行日志按行拆分，每行占用一行容量；空消息记为一个空行。
    pub fn push(&mut self, message: &str) {
        if message.is_empty() {
            self.push_line(String::new());
            return;
        }
        for line in message.lines() {
            self.push_line(line.to_string());
        }
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        self.total += 1;
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 按从旧到新的顺序遍历保留行
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// 最早保留行的序号
    fn first_seq(&self) -> u64 {
        self.total - self.lines.len() as u64
    }

    /// 从序号 `cursor` 开始的增量快照
    ///
    /// # 参数
    /// - `cursor` - 上次拉取返回的 `next`，首次拉取传 0
    ///
    /// # 返回值
    /// 序号不小于 `cursor` 的保留行，以及下一次的游标。
    /// `cursor` 之后的部分行已被淘汰时从最早的保留行开始返回，并置 `truncated`；
    /// `cursor` 不小于已追加的总行数时返回空列表。
    pub fn snapshot(&self, cursor: u64) -> LogSlice {
        let first = self.first_seq();
        let skip = cursor.saturating_sub(first).min(self.lines.len() as u64) as usize;

        LogSlice {
            lines: self.lines.iter().skip(skip).cloned().collect(),
            next: self.total,
            truncated: cursor < first,
        }
    }

    /// 清空视图，序号继续递增
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Default for LogView {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}
