//! 結果表示
//!
//! `PredictionState` から表示用構造への純粋な変換。
//! 通信やリソース管理の副作用は持たない。

use crate::parser::split_data_uri;
use crate::state::PredictionState;
use crate::types::{DetailField, PredictionResult};
use std::fmt;

pub const PLACEHOLDER_MESSAGE: &str =
    "Prediction results will be displayed here once an image is processed.";
pub const PROGRESS_MESSAGE: &str = "Identifying butterfly, please wait...";
pub const VIDEO_HEADING: &str = "Watch a Video";

/// 表示構造
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    /// まだ結果がない
    Placeholder { message: &'static str },
    /// 問い合わせ中（古い結果・エラーは出さない）
    Progress { message: &'static str },
    Prediction(PredictionView),
    /// エラーのみ（結果の項目は出さない）
    Error { message: String },
}

/// 予測結果の表示内容
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub name: String,
    /// 小数2桁 + "%"
    pub confidence: String,
    pub image: Option<String>,
    pub details: Vec<DetailLine>,
    pub video: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailLine {
    pub field: DetailField,
    pub label: &'static str,
    pub value: String,
}

/// 状態を表示構造へ変換
pub fn render(state: &PredictionState) -> ResultView {
    match state {
        PredictionState::Idle => ResultView::Placeholder {
            message: PLACEHOLDER_MESSAGE,
        },
        PredictionState::Pending => ResultView::Progress {
            message: PROGRESS_MESSAGE,
        },
        PredictionState::Succeeded(result) => ResultView::Prediction(render_prediction(result)),
        PredictionState::Failed(failure) => ResultView::Error {
            message: failure.message().to_string(),
        },
    }
}

fn render_prediction(result: &PredictionResult) -> PredictionView {
    let details = DetailField::ALL
        .iter()
        .filter_map(|&field| {
            let value = result.detail(field)?;
            let value = match field.unit() {
                Some(unit) => format!("{} {}", value, unit),
                None => value.to_string(),
            };
            Some(DetailLine {
                field,
                label: field.label(),
                value,
            })
        })
        .collect();

    PredictionView {
        name: result.name.clone(),
        confidence: format!("{}%", format_confidence(result.confidence)),
        image: result.image.clone(),
        details,
        video: result.youtube_embed_link.clone(),
    }
}

/// 信頼度を小数2桁で整形
///
/// 2進数の誤差で 97.345 が 97.34 にならないよう、
/// 最短の10進表現に対して四捨五入する。
pub fn format_confidence(value: f64) -> String {
    if !value.is_finite() {
        return format!("{:.2}", value);
    }

    let repr = format!("{}", value.abs());
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let Ok(whole) = int_part.parse::<u128>() else {
        return format!("{:.2}", value);
    };

    let digits = frac_part.as_bytes();
    let digit = |i: usize| digits.get(i).map(|d| u128::from(d - b'0')).unwrap_or(0);

    let mut cents = whole * 100 + digit(0) * 10 + digit(1);
    if digit(2) >= 5 {
        cents += 1;
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, cents / 100, cents % 100)
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultView::Placeholder { message } | ResultView::Progress { message } => {
                writeln!(f, "{}", message)
            }
            ResultView::Error { message } => writeln!(f, "Error: {}", message),
            ResultView::Prediction(view) => fmt::Display::fmt(view, f),
        }
    }
}

impl fmt::Display for PredictionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "Confidence: {}", self.confidence)?;

        if let Some(image) = &self.image {
            match split_data_uri(image) {
                Some((mime, payload)) => {
                    writeln!(f, "Reference image: embedded {} ({} bytes base64)", mime, payload.len())?
                }
                None => writeln!(f, "Reference image: {}", image)?,
            }
        }

        if !self.details.is_empty() {
            writeln!(f)?;
        }
        for line in &self.details {
            if line.field.is_long_text() {
                writeln!(f, "{}:", line.label)?;
                for text_line in line.value.lines() {
                    writeln!(f, "  {}", text_line)?;
                }
            } else {
                writeln!(f, "{}: {}", line.label, line.value)?;
            }
        }

        if let Some(video) = &self.video {
            writeln!(f)?;
            writeln!(f, "{}: {}", VIDEO_HEADING, video)?;
        }
        Ok(())
    }
}
