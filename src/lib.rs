//! Butterfly ID: 写真から蝶の種を推定するクライアント
//!
//! 画像選択 → 推論サービスへの送信 → 結果表示 のワークフローを提供する。

pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod image_file;
pub mod selection;
pub mod session;

use client::HttpPredictionService;
use config::Config;
use controller::PredictionController;
use selection::ThumbnailPreviews;

/// HTTP 実装を使うワークフロー
pub type HttpController = PredictionController<HttpPredictionService, ThumbnailPreviews>;

/// 設定からワークフローを組み立てる
pub fn build_controller(config: &Config) -> error::Result<HttpController> {
    let service = HttpPredictionService::new(&config.endpoint, config.timeout())?;
    Ok(PredictionController::new(
        service,
        ThumbnailPreviews::new(config.preview_max_size),
    ))
}
