//! # WCF Panel - Cargo 构建脚本
//!
//! 仅在启用 `desktop` feature 时调用 `tauri_build::build()`，
//! 生成 Tauri 运行时所需的资源绑定、权限清单以及 Windows 平台的应用清单。
//! 核心库单独构建（默认 feature）时此脚本为空操作。

fn main() {
    #[cfg(feature = "desktop")]
    tauri_build::build()
}
