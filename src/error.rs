use thiserror::Error;

#[derive(Error, Debug)]
pub enum ButterflyIdError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("HTTPクライアントの初期化に失敗: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("参照画像のデコードに失敗: {0}")]
    ImageDecode(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] butterfly_id_common::Error),
}

pub type Result<T> = std::result::Result<T, ButterflyIdError>;
