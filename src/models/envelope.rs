//! # 响应信封与归一化结果
//!
//! 宿主 HTTP 服务的所有响应都包在统一信封中：
//! ```json
//! { "status": 0, "data": ..., "error": "" }
//! ```
//! `status == 0` 表示成功，`data` 为负载；其它值表示失败，`error` 为可读的错误信息。
//!
//! 每次请求返回后立即将响应归一化为 `Outcome`，下游代码只处理带标签的类型化结果。

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// 响应信封（线上格式）
///
/// `data` 和 `error` 均可能缺省或为 `null`。
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub status: i64,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Option<String>,
}

/// 一次请求的归一化结果
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// 信封 `status == 0`，携带解码后的 `data`
    Data(T),
    /// 信封 `status == 0` 但 `data` 为空，且 `T` 无法表示空值
    Empty,
    /// 信封 `status != 0`，携带服务端错误信息
    AppError(String),
    /// 传输层失败：网络错误、非 2xx、超时、非法信封
    Transport {
        status: Option<u16>,
        message: String,
        detail: String,
    },
}

impl<T: DeserializeOwned> Outcome<T> {
    /// 将 2xx 响应体归一化
    ///
    /// 响应体不是合法信封，或成功信封的 `data` 无法解码为 `T` 时，视为传输层失败。
    /// 服务端以 `data: null` 表示无负载的成功；`T` 能接受 `null`（如 `Option` / `Value`）时
    /// 原样解码，否则归一化为 `Empty`。
    pub fn from_body(body: &[u8]) -> Self {
        let envelope: Envelope = match serde_json::from_slice(body) {
            Ok(envelope) => envelope,
            Err(e) => return Self::malformed(e.to_string()),
        };

        if envelope.status != 0 {
            return Outcome::AppError(envelope.error.unwrap_or_default());
        }

        let is_null = envelope.data.is_null();
        match serde_json::from_value(envelope.data) {
            Ok(data) => Outcome::Data(data),
            Err(_) if is_null => Outcome::Empty,
            Err(e) => Self::malformed(e.to_string()),
        }
    }

    fn malformed(detail: String) -> Self {
        Outcome::Transport {
            status: None,
            message: "响应格式错误".to_string(),
            detail,
        }
    }
}

/// HTTP 状态码到用户提示语的映射
pub fn status_message(status: u16) -> String {
    match status {
        400 => "请求错误(400)".to_string(),
        401 => "未授权，请重新登录(401)".to_string(),
        403 => "拒绝访问(403)".to_string(),
        404 => "请求出错(404)".to_string(),
        408 => "请求超时(408)".to_string(),
        500 => "服务器错误(500)".to_string(),
        501 => "服务未实现(501)".to_string(),
        502 => "网络错误(502)".to_string(),
        503 => "服务不可用(503)".to_string(),
        504 => "网络超时(504)".to_string(),
        505 => "HTTP版本不受支持(505)".to_string(),
        other => format!("连接出错({})!", other),
    }
}
