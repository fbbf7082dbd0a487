//! 結果の書き出し

use crate::error::{ButterflyIdError, Result};
use base64::Engine;
use butterfly_id_common::{split_data_uri, PredictionResult};
use std::path::Path;

/// 結果をJSONで書き出す（値のない項目は省略）
pub fn to_json(result: &PredictionResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// 参照画像（data URI）をデコード
///
/// # Returns
/// `(mime_type, bytes)`
pub fn decode_reference_image(result: &PredictionResult) -> Result<(String, Vec<u8>)> {
    let image = result
        .image
        .as_deref()
        .ok_or_else(|| ButterflyIdError::ImageDecode("参照画像がありません".into()))?;

    let (mime, payload) = split_data_uri(image).ok_or_else(|| {
        ButterflyIdError::ImageDecode(format!("埋め込み画像ではありません: {}", image))
    })?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ButterflyIdError::ImageDecode(e.to_string()))?;

    Ok((mime.to_string(), bytes))
}

/// 参照画像をファイルに保存し、書き込んだバイト数を返す
pub fn save_reference_image(result: &PredictionResult, output: &Path) -> Result<usize> {
    let (mime, bytes) = decode_reference_image(result)?;
    log::debug!("saving reference image ({}, {} bytes) to {}", mime, bytes.len(), output.display());

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output, &bytes)?;
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn with_image(image: Option<&str>) -> PredictionResult {
        PredictionResult {
            name: "Monarch".into(),
            confidence: 90.0,
            image: image.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_reference_image() {
        // "hello" を base64 化
        let result = with_image(Some("data:image/jpeg;base64,aGVsbG8="));
        let (mime, bytes) = decode_reference_image(&result).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_decode_without_image() {
        let err = decode_reference_image(&with_image(None)).unwrap_err();
        assert!(matches!(err, ButterflyIdError::ImageDecode(_)));
    }

    #[test]
    fn test_decode_plain_url_is_rejected() {
        let result = with_image(Some("https://example.com/monarch.jpg"));
        assert!(decode_reference_image(&result).is_err());
    }

    #[test]
    fn test_decode_invalid_base64() {
        let result = with_image(Some("data:image/jpeg;base64,!!!"));
        assert!(matches!(
            decode_reference_image(&result),
            Err(ButterflyIdError::ImageDecode(_))
        ));
    }

    #[test]
    fn test_save_reference_image() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out").join("monarch.jpg");
        let written = save_reference_image(&with_image(Some("data:image/jpeg;base64,aGVsbG8=")), &output).unwrap();

        assert_eq!(written, 5);
        assert_eq!(std::fs::read(&output).unwrap(), b"hello");
    }

    #[test]
    fn test_to_json_omits_absent_fields() {
        let json = to_json(&with_image(None)).unwrap();
        assert!(json.contains("\"name\": \"Monarch\""));
        assert!(!json.contains("image"));
    }
}
