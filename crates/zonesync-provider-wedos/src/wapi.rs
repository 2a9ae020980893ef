// # WAPI Envelope
//
// Request and response framing for the WEDOS WAPI JSON interface.
//
// ## Request
//
// ```text
// POST /wapi/json
// Content-Type: application/x-www-form-urlencoded
//
// request=<urlencoded {"request":{"user","auth","command","clTRID","data"?,"test"?}}>
// ```
//
// `auth` is `sha1(user + sha1(password) + HH)` in lowercase hex, where `HH`
// is the current hour on the caller's clock.
//
// ## Response
//
// ```json
// { "response": { "code": 1000, "result": "OK", "data": { ... } } }
// ```
//
// `code` may arrive as a number or a string. Anything but 1000 is a failure.

use serde_json::{Map, Value, json};
use sha1::{Digest, Sha1};
use zonesync_core::{Error, Result};

/// Status code WAPI uses for success
pub const SUCCESS_CODE: u32 = 1000;

/// Compute the hourly WAPI auth token
pub fn auth_token(user: &str, password: &str, hour: &str) -> String {
    let password_hash = hex::encode(Sha1::digest(password.as_bytes()));
    hex::encode(Sha1::digest(format!("{user}{password_hash}{hour}").as_bytes()))
}

/// Current hour as the two-digit string the auth token is bound to
pub fn current_hour() -> String {
    chrono::Local::now().format("%H").to_string()
}

/// Build the request envelope
pub fn build_request(
    user: &str,
    auth: &str,
    command: &str,
    cl_trid: &str,
    data: Option<Value>,
    test: bool,
) -> Value {
    let mut request = Map::new();
    request.insert("user".to_string(), json!(user));
    request.insert("auth".to_string(), json!(auth));
    request.insert("command".to_string(), json!(command));
    request.insert("clTRID".to_string(), json!(cl_trid));
    if let Some(data) = data.filter(|d| !is_empty_object(d)) {
        request.insert("data".to_string(), data);
    }
    if test {
        request.insert("test".to_string(), json!(1));
    }
    json!({ "request": Value::Object(request) })
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(Map::is_empty)
}

/// Form-encode a request envelope as the POST body
pub fn encode_body(request: &Value) -> String {
    format!("request={}", urlencoding::encode(&request.to_string()))
}

/// Check the response status and return its `data` payload.
///
/// A successful response without `data` yields `Value::Null`.
pub fn parse_response(command: &str, body: &Value) -> Result<Value> {
    let response = body
        .get("response")
        .ok_or_else(|| Error::provider("wedos", "Invalid response format: missing 'response'"))?;

    let code = response
        .get("code")
        .and_then(status_code)
        .ok_or_else(|| Error::provider("wedos", "Invalid response format: missing status code"))?;

    if code != SUCCESS_CODE {
        let message = response
            .get("result")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(Error::remote(command, code, message));
    }

    Ok(response.get("data").cloned().unwrap_or(Value::Null))
}

fn status_code(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
