//! 予測リクエストの状態

use crate::types::PredictionResult;
use std::fmt;

/// 送信しようとしたが画像が未選択
pub const NO_IMAGE_SELECTED_MESSAGE: &str = "Please select an image file first.";

/// 通信失敗時の汎用メッセージ（通信ライブラリの詳細は含めない）
pub const TRANSPORT_FAILURE_MESSAGE: &str = "An error occurred during prediction.";

/// 成功ステータスだが結果として解釈できない
pub const MALFORMED_RESPONSE_MESSAGE: &str =
    "The prediction service returned an unreadable response.";

/// 予測の失敗理由
///
/// どの失敗も `PredictionState::Failed` に収まり、
/// 再選択・再送信で回復できる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionFailure {
    /// 画像未選択のまま送信（通信なし）
    NoImageSelected,
    /// 通信できなかった、またはエラー本文が読めない
    TransportFailure,
    /// サービスが返したエラーメッセージ（そのまま表示）
    ServiceError(String),
    /// 成功ステータスだが必須項目がない
    MalformedResponse,
}

impl PredictionFailure {
    /// 利用者向けメッセージ
    pub fn message(&self) -> &str {
        match self {
            PredictionFailure::NoImageSelected => NO_IMAGE_SELECTED_MESSAGE,
            PredictionFailure::TransportFailure => TRANSPORT_FAILURE_MESSAGE,
            PredictionFailure::ServiceError(message) => message,
            PredictionFailure::MalformedResponse => MALFORMED_RESPONSE_MESSAGE,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PredictionFailure::NoImageSelected => "no_image_selected",
            PredictionFailure::TransportFailure => "transport_failure",
            PredictionFailure::ServiceError(_) => "service_error",
            PredictionFailure::MalformedResponse => "malformed_response",
        }
    }
}

impl fmt::Display for PredictionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// リクエストの状態（常にいずれか1つ）
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PredictionState {
    #[default]
    Idle,
    Pending,
    Succeeded(PredictionResult),
    Failed(PredictionFailure),
}

impl PredictionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, PredictionState::Pending)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PredictionState::Idle)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            PredictionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&PredictionFailure> {
        match self {
            PredictionState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionState::Idle => "idle",
            PredictionState::Pending => "pending",
            PredictionState::Succeeded(_) => "succeeded",
            PredictionState::Failed(_) => "failed",
        }
    }
}

impl From<Result<PredictionResult, PredictionFailure>> for PredictionState {
    fn from(outcome: Result<PredictionResult, PredictionFailure>) -> Self {
        match outcome {
            Ok(result) => PredictionState::Succeeded(result),
            Err(failure) => PredictionState::Failed(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert!(PredictionState::default().is_idle());
    }

    #[test]
    fn test_service_error_message_is_verbatim() {
        let failure = PredictionFailure::ServiceError("unsupported file type".to_string());
        assert_eq!(failure.message(), "unsupported file type");
        assert_eq!(failure.to_string(), "unsupported file type");
    }

    #[test]
    fn test_messages_are_not_empty() {
        let failures = [
            PredictionFailure::NoImageSelected,
            PredictionFailure::TransportFailure,
            PredictionFailure::MalformedResponse,
        ];
        for failure in failures {
            assert!(!failure.message().is_empty(), "{:?}", failure);
        }
    }

    #[test]
    fn test_from_outcome() {
        let outcome: Result<PredictionResult, PredictionFailure> = Ok(PredictionResult {
            name: "Monarch".into(),
            ..Default::default()
        });
        let ok = PredictionState::from(outcome);
        assert_eq!(ok.result().map(|r| r.name.as_str()), Some("Monarch"));

        let outcome: Result<PredictionResult, PredictionFailure> = Err(PredictionFailure::TransportFailure);
        let err = PredictionState::from(outcome);
        assert_eq!(err.failure(), Some(&PredictionFailure::TransportFailure));
        assert!(err.result().is_none());
    }
}
