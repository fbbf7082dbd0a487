//! 対話式の予測ワークフロー
//!
//! 操作:
//! - `o <path>` 画像を選択
//! - `p` 送信（画像未選択・送信中は不可）
//! - `c` すべてクリア（常に可）
//! - `s` 結果を再表示
//! - `q` 終了

use crate::client::PredictionService;
use crate::controller::PredictionController;
use crate::error::{ButterflyIdError, Result};
use crate::image_file::{is_accepted_image, ImageFile};
use crate::selection::PreviewFactory;
use butterfly_id_common::render::PROGRESS_MESSAGE;
use butterfly_id_common::PredictionState;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// 対話アクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// 画像を選択
    Open(PathBuf),
    /// 送信
    Predict,
    /// すべてクリア
    Clear,
    /// 現在の結果を表示
    Show,
    /// 操作一覧
    Help,
    /// 終了
    Quit,
    /// 解釈できない入力
    Unknown(String),
}

/// 入力行を解釈
pub fn parse_session_command(input: &str) -> SessionAction {
    let trimmed = input.trim();
    let (command, argument) = match trimmed.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (trimmed, ""),
    };

    match command {
        "o" | "open" if !argument.is_empty() => SessionAction::Open(PathBuf::from(argument)),
        "p" | "predict" => SessionAction::Predict,
        "c" | "clear" => SessionAction::Clear,
        "" | "s" | "show" => SessionAction::Show,
        "h" | "help" | "?" => SessionAction::Help,
        "q" | "quit" | "exit" => SessionAction::Quit,
        _ => SessionAction::Unknown(trimmed.to_string()),
    }
}

/// 送信して、Pending の間はスピナーを表示
pub async fn submit_with_progress<S, P>(controller: &mut PredictionController<S, P>) -> &PredictionState
where
    S: PredictionService,
    P: PreviewFactory,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(PROGRESS_MESSAGE);
    spinner.enable_steady_tick(Duration::from_millis(120));

    let state = controller.submit().await;
    spinner.finish_and_clear();
    state
}

/// 対話セッションを実行
pub async fn run_session<S, P>(controller: &mut PredictionController<S, P>) -> Result<()>
where
    S: PredictionService,
    P: PreviewFactory,
{
    println!("🦋 butterfly-id - 対話モード");
    print_help();

    loop {
        println!("---");
        print_status(controller);

        let input: String = Input::new()
            .with_prompt("操作")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| ButterflyIdError::Prompt(e.to_string()))?;

        match parse_session_command(&input) {
            SessionAction::Open(path) => open_image(controller, path),
            SessionAction::Predict => {
                if !controller.can_submit() {
                    println!("  → 送信できません（画像を選択してください）");
                    continue;
                }
                submit_with_progress(controller).await;
                print!("{}", controller.view());
            }
            SessionAction::Clear => {
                controller.clear();
                println!("  → クリアしました");
            }
            SessionAction::Show => print!("{}", controller.view()),
            SessionAction::Help => print_help(),
            SessionAction::Quit => {
                controller.reset();
                println!("終了します");
                break;
            }
            SessionAction::Unknown(input) => {
                println!("  → 不明な操作: {}", input);
            }
        }
    }

    Ok(())
}

fn open_image<S, P>(controller: &mut PredictionController<S, P>, path: PathBuf)
where
    S: PredictionService,
    P: PreviewFactory,
{
    // 拡張子チェックは警告のみ
    if !is_accepted_image(&path) {
        println!("  ⚠ 対応形式 (png/jpg/jpeg/gif) ではない可能性があります");
    }

    match ImageFile::open(&path) {
        Ok(file) => {
            controller.select(file);
            println!("  → 選択しました: {}", path.display());
        }
        Err(e) => println!("  → {}", e),
    }
}

fn print_status<S, P>(controller: &PredictionController<S, P>)
where
    S: PredictionService,
    P: PreviewFactory,
{
    match controller.selection().selected() {
        Some(selected) => {
            let preview = match selected.preview().thumbnail() {
                Some(thumb) => format!("preview {}x{}", thumb.width, thumb.height),
                None => "preview unavailable".to_string(),
            };
            println!(
                "画像: {} ({} bytes, {}) / 状態: {}",
                selected.file().file_name(),
                selected.file().len(),
                preview,
                controller.state().as_str()
            );
        }
        None => println!("画像: 未選択 / 状態: {}", controller.state().as_str()),
    }
}

fn print_help() {
    println!("操作: [o <path>]選択 [p]送信 [c]クリア [s]表示 [h]ヘルプ [q]終了");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open() {
        assert_eq!(
            parse_session_command("o  images/monarch.jpg "),
            SessionAction::Open(PathBuf::from("images/monarch.jpg"))
        );
        assert_eq!(
            parse_session_command("open my wings.png"),
            SessionAction::Open(PathBuf::from("my wings.png"))
        );
    }

    #[test]
    fn test_parse_open_without_path() {
        assert_eq!(parse_session_command("o"), SessionAction::Unknown("o".into()));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_session_command("p"), SessionAction::Predict);
        assert_eq!(parse_session_command("clear"), SessionAction::Clear);
        assert_eq!(parse_session_command(""), SessionAction::Show);
        assert_eq!(parse_session_command("?"), SessionAction::Help);
        assert_eq!(parse_session_command("Q"), SessionAction::Unknown("Q".into()));
        assert_eq!(parse_session_command("quit"), SessionAction::Quit);
    }
}
