//! 予測結果の型定義
//!
//! - PredictionResult: 推論サービスの成功レスポンスを正規化したもの
//! - DetailField: 任意項目の列挙（表示ラベル・ワイヤ上のキー）
//!
//! 任意項目はパース直後に `Option` へ変換済みのため、
//! 下流で "N/A" と文字列比較することはない。

use serde::Serialize;

/// 推論サービスが「該当なし」を表すために使う値
pub const ABSENCE_SENTINEL: &str = "N/A";

/// 予測結果（不変）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PredictionResult {
    pub name: String,

    /// 0〜100
    pub confidence: f64,

    /// 参照画像（URLまたはdata URI）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wingspan_mm: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub habitat: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_plants: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub conservation_status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_description: Option<String>,

    /// 動画の埋め込みURL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_embed_link: Option<String>,
}

/// 詳細欄に表示する任意項目（表示順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    ScientificName,
    Family,
    WingspanMm,
    Distribution,
    Habitat,
    HostPlants,
    LifecycleNotes,
    ConservationStatus,
    GeneralDescription,
}

impl DetailField {
    pub const ALL: [DetailField; 9] = [
        DetailField::ScientificName,
        DetailField::Family,
        DetailField::WingspanMm,
        DetailField::Distribution,
        DetailField::Habitat,
        DetailField::HostPlants,
        DetailField::LifecycleNotes,
        DetailField::ConservationStatus,
        DetailField::GeneralDescription,
    ];

    /// レスポンスJSON上のキー
    pub fn key(&self) -> &'static str {
        match self {
            DetailField::ScientificName => "scientific_name",
            DetailField::Family => "family",
            DetailField::WingspanMm => "wingspan_mm",
            DetailField::Distribution => "distribution",
            DetailField::Habitat => "habitat",
            DetailField::HostPlants => "host_plants",
            DetailField::LifecycleNotes => "lifecycle_notes",
            DetailField::ConservationStatus => "conservation_status",
            DetailField::GeneralDescription => "general_description",
        }
    }

    /// 表示ラベル
    pub fn label(&self) -> &'static str {
        match self {
            DetailField::ScientificName => "Scientific Name",
            DetailField::Family => "Family",
            DetailField::WingspanMm => "Wingspan",
            DetailField::Distribution => "Distribution",
            DetailField::Habitat => "Habitat",
            DetailField::HostPlants => "Host Plants",
            DetailField::LifecycleNotes => "Lifecycle Notes",
            DetailField::ConservationStatus => "Conservation Status",
            DetailField::GeneralDescription => "General Description",
        }
    }

    /// 値の後ろに付ける単位
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            DetailField::WingspanMm => Some("mm"),
            _ => None,
        }
    }

    /// 複数行になりうる説明文か
    pub fn is_long_text(&self) -> bool {
        !matches!(
            self,
            DetailField::ScientificName | DetailField::Family | DetailField::WingspanMm
        )
    }
}

impl PredictionResult {
    pub fn detail(&self, field: DetailField) -> Option<&str> {
        let value = match field {
            DetailField::ScientificName => &self.scientific_name,
            DetailField::Family => &self.family,
            DetailField::WingspanMm => &self.wingspan_mm,
            DetailField::Distribution => &self.distribution,
            DetailField::Habitat => &self.habitat,
            DetailField::HostPlants => &self.host_plants,
            DetailField::LifecycleNotes => &self.lifecycle_notes,
            DetailField::ConservationStatus => &self.conservation_status,
            DetailField::GeneralDescription => &self.general_description,
        };
        value.as_deref()
    }

    pub(crate) fn set_detail(&mut self, field: DetailField, value: Option<String>) {
        let slot = match field {
            DetailField::ScientificName => &mut self.scientific_name,
            DetailField::Family => &mut self.family,
            DetailField::WingspanMm => &mut self.wingspan_mm,
            DetailField::Distribution => &mut self.distribution,
            DetailField::Habitat => &mut self.habitat,
            DetailField::HostPlants => &mut self.host_plants,
            DetailField::LifecycleNotes => &mut self.lifecycle_notes,
            DetailField::ConservationStatus => &mut self.conservation_status,
            DetailField::GeneralDescription => &mut self.general_description,
        };
        *slot = value;
    }

    /// 値が入っている任意項目の数
    pub fn present_detail_count(&self) -> usize {
        DetailField::ALL
            .iter()
            .filter(|f| self.detail(**f).is_some())
            .count()
    }
}
