//! Popup-side interpretation of query service replies.

use serde_json::Value;

use crate::error::ErrorCode;

/// Turn an HTTP reply from the query service into an answer or an error code.
///
/// Non-2xx replies yield the body's `error` code when it is a known code,
/// otherwise `API_ERROR`. A 2xx reply must carry a string `answer`; anything
/// else is `UNEXPECTED_RESPONSE`.
///
/// # Errors
///
/// The [`ErrorCode`] to show the user.
pub fn interpret_reply(status: u16, body: &str) -> Result<String, ErrorCode> {
    let data: Option<Value> = serde_json::from_str(body).ok();

    if !(200..300).contains(&status) {
        let code = data
            .as_ref()
            .and_then(|d| d.get("error"))
            .and_then(Value::as_str)
            .and_then(ErrorCode::from_wire)
            .unwrap_or(ErrorCode::ApiError);
        tracing::debug!(status, code = code.as_str(), "query service error reply");
        return Err(code);
    }

    data.as_ref()
        .and_then(|d| d.get("answer"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ErrorCode::UnexpectedResponse)
}
