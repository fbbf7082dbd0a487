//! 画像選択の管理
//!
//! 選択中の画像と、そのプレビュー（一時的な表示用リソース）を所有する。
//! プレビューは常に高々1つだけ生きており、差し替え・クリア・破棄のいずれかで
//! ちょうど1回だけ解放される。

use crate::image_file::ImageFile;

/// プレビュー用のサムネイル（RGBA8）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// プレビューリソースのハンドル
///
/// `Clone` を持たないため、解放（`PreviewFactory::release` への移動）は1回しか起こらない。
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    thumbnail: Option<Thumbnail>,
}

impl PreviewHandle {
    pub fn new(id: u64, thumbnail: Option<Thumbnail>) -> Self {
        Self { id, thumbnail }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// デコードできなかった画像では None
    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }
}

/// プレビューの生成と解放
pub trait PreviewFactory {
    fn create(&mut self, image: &ImageFile) -> PreviewHandle;
    fn release(&mut self, handle: PreviewHandle);
}

/// image クレートでサムネイルを作るプレビュー
#[derive(Debug)]
pub struct ThumbnailPreviews {
    max_size: u32,
    next_id: u64,
    live: usize,
}

impl ThumbnailPreviews {
    pub fn new(max_size: u32) -> Self {
        Self {
            max_size: max_size.max(1),
            next_id: 0,
            live: 0,
        }
    }

    /// 解放されていないプレビューの数
    pub fn live(&self) -> usize {
        self.live
    }
}

impl PreviewFactory for ThumbnailPreviews {
    fn create(&mut self, image: &ImageFile) -> PreviewHandle {
        self.next_id += 1;
        self.live += 1;

        // 非対応形式でもエラーにしない（判断は推論サービスに任せる）
        let thumbnail = match image::load_from_memory(image.bytes()) {
            Ok(decoded) => {
                let thumb = decoded.thumbnail(self.max_size, self.max_size);
                Some(Thumbnail {
                    width: thumb.width(),
                    height: thumb.height(),
                    pixels: thumb.to_rgba8().into_raw(),
                })
            }
            Err(e) => {
                log::debug!("preview decode failed for {}: {}", image.file_name(), e);
                None
            }
        };

        PreviewHandle::new(self.next_id, thumbnail)
    }

    fn release(&mut self, handle: PreviewHandle) {
        self.live = self.live.saturating_sub(1);
        log::debug!("preview {} released", handle.id());
    }
}

/// 選択中の画像（プレビューと常に対）
#[derive(Debug)]
pub struct SelectedImage {
    file: ImageFile,
    preview: PreviewHandle,
}

impl SelectedImage {
    pub fn file(&self) -> &ImageFile {
        &self.file
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

pub struct SelectionManager<P: PreviewFactory> {
    factory: P,
    current: Option<SelectedImage>,
}

impl<P: PreviewFactory> SelectionManager<P> {
    pub fn new(factory: P) -> Self {
        Self {
            factory,
            current: None,
        }
    }

    /// 画像を選択（前のプレビューを先に解放）
    pub fn select(&mut self, file: ImageFile) {
        self.release_current();
        let preview = self.factory.create(&file);
        log::debug!("selected {} (preview {})", file.file_name(), preview.id());
        self.current = Some(SelectedImage { file, preview });
    }

    /// 選択を解除。何か解除したら true
    pub fn clear(&mut self) -> bool {
        self.release_current()
    }

    pub fn selected(&self) -> Option<&SelectedImage> {
        self.current.as_ref()
    }

    pub fn image(&self) -> Option<&ImageFile> {
        self.current.as_ref().map(|s| &s.file)
    }

    pub fn has_image(&self) -> bool {
        self.current.is_some()
    }

    pub fn factory(&self) -> &P {
        &self.factory
    }

    fn release_current(&mut self) -> bool {
        match self.current.take() {
            Some(previous) => {
                self.factory.release(previous.preview);
                true
            }
            None => false,
        }
    }
}

impl<P: PreviewFactory> Drop for SelectionManager<P> {
    fn drop(&mut self) {
        self.release_current();
    }
}
