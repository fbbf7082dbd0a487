//! 推論サービスとの通信
//!
//! `POST {endpoint}/api/predict` に multipart（パート名 `file`）で画像を送る。
//! 応答の解釈は `butterfly_id_common::interpret_reply` が行う。

use crate::error::Result;
use crate::image_file::ImageFile;
use butterfly_id_common::ServiceReply;
use reqwest::multipart::{Form, Part};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub const PREDICT_PATH: &str = "/api/predict";

/// 通信そのものの失敗（ログ専用。利用者には汎用メッセージだけを出す）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError(e.to_string())
    }
}

/// 推論サービス
///
/// 1回の呼び出しで1回だけリクエストを送る。
/// HTTPステータスに関係なく応答が得られれば `Ok(ServiceReply)`。
pub trait PredictionService {
    fn predict(&self, image: &ImageFile) -> impl Future<Output = std::result::Result<ServiceReply, TransportError>>;
}

/// reqwest による実装
#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    client: reqwest::Client,
    predict_url: String,
}

impl HttpPredictionService {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("butterfly-id/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            predict_url: predict_url(endpoint),
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }
}

impl PredictionService for HttpPredictionService {
    async fn predict(&self, image: &ImageFile) -> std::result::Result<ServiceReply, TransportError> {
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.mime_type())?;
        let form = Form::new().part("file", part);

        log::debug!("POST {} ({} bytes)", self.predict_url, image.len());

        let response = self
            .client
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        log::debug!("response status {} ({} bytes)", status, body.len());
        Ok(ServiceReply { status, body })
    }
}

/// ベースURLから予測エンドポイントのURLを作る
pub fn predict_url(endpoint: &str) -> String {
    let base = endpoint.trim().trim_end_matches('/');
    if base.ends_with(PREDICT_PATH) {
        base.to_string()
    } else {
        format!("{}{}", base, PREDICT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_url() {
        assert_eq!(predict_url("http://localhost:5000"), "http://localhost:5000/api/predict");
        assert_eq!(predict_url("http://localhost:5000/"), "http://localhost:5000/api/predict");
        assert_eq!(
            predict_url("https://example.com/api/predict"),
            "https://example.com/api/predict"
        );
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError("connection refused".into());
        assert_eq!(err.to_string(), "transport failure: connection refused");
    }
}
