//! 推論サービスのレスポンスパーサー
//!
//! HTTPステータスと本文から、予測結果または失敗理由を判定する。
//! 任意項目の "N/A"・空文字・null はここで `None` に正規化する。

use crate::error::{Error, Result};
use crate::state::PredictionFailure;
use crate::types::{DetailField, PredictionResult, ABSENCE_SENTINEL};
use serde_json::{Map, Value};

/// サービスからの生の応答
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReply {
    pub status: u16,
    pub body: String,
}

impl ServiceReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 応答を解釈する
///
/// 判定順:
/// 1. 2xx → 本文を結果としてパース（失敗時は MalformedResponse）
/// 2. それ以外 → 本文の `error` があれば ServiceError、なければ TransportFailure
pub fn interpret_reply(reply: &ServiceReply) -> std::result::Result<PredictionResult, PredictionFailure> {
    if reply.is_success() {
        return parse_prediction(&reply.body).map_err(|_| PredictionFailure::MalformedResponse);
    }

    match service_error_message(&reply.body) {
        Some(message) => Err(PredictionFailure::ServiceError(message)),
        None => Err(PredictionFailure::TransportFailure),
    }
}

/// エラー本文から `error` メッセージを取り出す
///
/// JSONでない、`error` が文字列でない、空白のみ → None
pub fn service_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = value.get("error")?.as_str()?;
    if message.trim().is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}

/// 成功レスポンスの本文をパース
///
/// # Returns
/// * `Ok(PredictionResult)` - name（空でない文字列）と confidence（0〜100の数値）がある
/// * `Err` - JSONオブジェクトでない、または必須項目が欠けている
pub fn parse_prediction(body: &str) -> Result<PredictionResult> {
    let value: Value = serde_json::from_str(body.trim())?;
    let object = value
        .as_object()
        .ok_or_else(|| Error::Parse("JSON object expected".into()))?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(Error::MissingField("name"))?;

    let confidence = object
        .get("confidence")
        .and_then(confidence_value)
        .ok_or(Error::MissingField("confidence"))?;

    if !(0.0..=100.0).contains(&confidence) {
        return Err(Error::Parse(format!("confidence out of range: {}", confidence)));
    }

    let mut result = PredictionResult {
        name: name.to_string(),
        confidence,
        image: optional_text(object, "image"),
        youtube_embed_link: optional_text(object, "youtube_embed_link"),
        ..Default::default()
    };

    for field in DetailField::ALL {
        result.set_detail(field, optional_text(object, field.key()));
    }

    Ok(result)
}

fn confidence_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// 任意項目を正規化して取り出す
///
/// - 文字列: 空白のみ・"N/A" は None
/// - 数値・真偽値: 文字列化
/// - 文字列の配列: ", " で連結（空なら None）
/// - null・オブジェクト・欠落: None
fn optional_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => present_text(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(present_text)
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::Null | Value::Object(_) => None,
    }
}

fn present_text(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == ABSENCE_SENTINEL {
        None
    } else {
        Some(s.to_string())
    }
}

/// data URIをMIMEタイプとBase64部分に分割
///
/// # Arguments
/// * `uri` - "data:image/jpeg;base64,/9j/4AAQ..." 形式
///
/// # Returns
/// `(mime_type, base64_payload)`。data URIでなければ None
pub fn split_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let mime = if mime.is_empty() { "text/plain" } else { mime };
    Some((mime, payload))
}
