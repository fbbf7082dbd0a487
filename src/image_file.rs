//! 選択された画像ファイル
//!
//! 入力境界での拡張子チェックは目安であり、
//! 受け付け可否の最終判断は推論サービスが行う。

use crate::error::{ButterflyIdError, Result};
use std::path::Path;
use std::sync::Arc;

/// 推論サービスが受け付ける拡張子
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// 送信対象の画像（内容はクローン間で共有）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    file_name: String,
    mime_type: &'static str,
    bytes: Arc<[u8]>,
}

impl ImageFile {
    /// ファイルを読み込む
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ButterflyIdError::FileNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self::from_bytes(file_name, bytes))
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_type_for(&file_name);
        let bytes: Vec<u8> = bytes.into();
        Self {
            file_name,
            mime_type,
            bytes: Arc::from(bytes),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

/// 受け付け対象の拡張子か（大文字小文字は区別しない）
pub fn is_accepted_image(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| extension_of(&n.to_string_lossy()))
        .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// 拡張子からMIMEタイプを決める
pub fn mime_type_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_is_accepted_image() {
        assert!(is_accepted_image(Path::new("monarch.jpg")));
        assert!(is_accepted_image(Path::new("MONARCH.JPEG")));
        assert!(is_accepted_image(Path::new("dir/wing.png")));
        assert!(is_accepted_image(Path::new("anim.GIF")));
        assert!(!is_accepted_image(Path::new("notes.txt")));
        assert!(!is_accepted_image(Path::new("photo.webp")));
        assert!(!is_accepted_image(Path::new("noext")));
    }

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for("a.JPG"), "image/jpeg");
        assert_eq!(mime_type_for("a.png"), "image/png");
        assert_eq!(mime_type_for("a.gif"), "image/gif");
        assert_eq!(mime_type_for("a.bmp"), "application/octet-stream");
    }

    #[test]
    fn test_open_reads_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("monarch.jpg");
        std::fs::write(&path, b"jpegdata").unwrap();

        let image = ImageFile::open(&path).unwrap();
        assert_eq!(image.file_name(), "monarch.jpg");
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.bytes(), b"jpegdata");
        assert_eq!(image.len(), 8);
        assert!(!image.is_empty());
    }

    #[test]
    fn test_empty_file() {
        let image = ImageFile::from_bytes("empty.png", Vec::new());
        assert!(image.is_empty());
        assert_eq!(image.len(), 0);
    }

    #[test]
    fn test_open_missing_file() {
        let err = ImageFile::open(Path::new("/nonexistent/monarch.jpg")).unwrap_err();
        assert!(matches!(err, ButterflyIdError::FileNotFound(_)));
    }

    #[test]
    fn test_clone_shares_content() {
        let image = ImageFile::from_bytes("a.png", vec![1, 2, 3]);
        let copy = image.clone();
        assert_eq!(image, copy);
        assert_eq!(copy.bytes().as_ptr(), image.bytes().as_ptr());
    }
}
