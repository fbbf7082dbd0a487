use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "butterfly-id")]
#[command(about = "蝶の写真から種を推定するクライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 推論サービスのURL（この実行のみ上書き）
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を1枚送信して結果を表示
    Predict {
        /// 画像ファイルのパス (png/jpg/jpeg/gif)
        #[arg(required = true)]
        image: PathBuf,

        /// 出力形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// サービスが返した参照画像を保存
        #[arg(long)]
        save_image: Option<PathBuf>,
    },

    /// 対話的に画像の選択・送信・クリアを行う
    Session,

    /// 設定を表示/編集
    Config {
        /// 推論サービスのURLを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// タイムアウト（秒）を設定
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("TEXT".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_parse_predict_command() {
        let cli = Cli::try_parse_from([
            "butterfly-id",
            "predict",
            "monarch.jpg",
            "--format",
            "json",
            "--endpoint",
            "http://localhost:8080",
        ])
        .unwrap();

        assert_eq!(cli.endpoint.as_deref(), Some("http://localhost:8080"));
        match cli.command {
            Commands::Predict { image, format, save_image } => {
                assert_eq!(image, PathBuf::from("monarch.jpg"));
                assert_eq!(format, OutputFormat::Json);
                assert!(save_image.is_none());
            }
            _ => panic!("predict expected"),
        }
    }

    #[test]
    fn test_predict_requires_image() {
        assert!(Cli::try_parse_from(["butterfly-id", "predict"]).is_err());
    }
}
