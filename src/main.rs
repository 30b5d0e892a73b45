//! # wcf-panel - 桌面应用原生入口点
//!
//! 仅负责启动应用，初始化逻辑位于 `lib.rs`。

// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    wcf_panel_lib::run();
}
