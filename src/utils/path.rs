//! # 路径工具函数
//!
//! 提供面板自身配置目录的定位。

use std::path::PathBuf;

/// 获取面板配置目录的绝对路径
///
/// 使用 `dirs` crate 获取跨平台的系统配置目录，面板设置存放在其下的 `wcf-panel` 子目录。
///
/// # 错误
/// 无法确定系统配置目录时返回错误信息。
///
/// # 示例
/// - Windows: `C:\Users\username\AppData\Roaming\wcf-panel`
/// - Linux: `/home/username/.config/wcf-panel`
/// - macOS: `/Users/username/Library/Application Support/wcf-panel`
pub fn get_panel_config_path() -> Result<PathBuf, String> {
    let base = dirs::config_dir().ok_or_else(|| "无法获取系统配置目录".to_string())?;
    Ok(base.join("wcf-panel"))
}
