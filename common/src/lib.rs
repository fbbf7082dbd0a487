//! Butterfly ID Common Library
//!
//! CLIと対話セッションで共有される型とユーティリティ
//! （I/Oを持たない純粋なロジックのみ）

pub mod types;
pub mod error;
pub mod parser;
pub mod state;
pub mod render;

pub use types::{DetailField, PredictionResult, ABSENCE_SENTINEL};
pub use error::{Error, Result};
pub use parser::{interpret_reply, parse_prediction, service_error_message, split_data_uri, ServiceReply};
pub use state::{PredictionFailure, PredictionState};
pub use render::{format_confidence, render, DetailLine, PredictionView, ResultView};
