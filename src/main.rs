use anyhow::{bail, Context};
use butterfly_id::cli::{Cli, Commands, OutputFormat};
use butterfly_id::config::Config;
use butterfly_id::image_file::{is_accepted_image, ImageFile};
use butterfly_id::{build_controller, export, session};
use butterfly_id_common::PredictionState;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut config = Config::load().context("設定の読み込みに失敗")?;
    if let Some(endpoint) = &cli.endpoint {
        config.set_endpoint(endpoint)?;
    }

    match cli.command {
        Commands::Predict { image, format, save_image } => {
            if !is_accepted_image(&image) {
                log::warn!("{} may not be a supported image type", image.display());
            }
            let file = ImageFile::open(&image)?;

            let mut controller = build_controller(&config)?;
            controller.select(file);

            if format == OutputFormat::Text {
                println!("🦋 {} を送信中... ({})\n", image.display(), config.endpoint);
            }

            session::submit_with_progress(&mut controller).await;

            match controller.state() {
                PredictionState::Succeeded(result) => {
                    match format {
                        OutputFormat::Text => print!("{}", controller.view()),
                        OutputFormat::Json => println!("{}", export::to_json(result)?),
                    }

                    if let Some(output) = save_image {
                        let written = export::save_reference_image(result, &output)?;
                        if format == OutputFormat::Text {
                            println!("\n✔ 参照画像を保存: {} ({} bytes)", output.display(), written);
                        }
                    }
                }
                PredictionState::Failed(failure) => bail!("{}", failure),
                state => bail!("unexpected state after submit: {}", state.as_str()),
            }
        }

        Commands::Session => {
            let mut controller = build_controller(&config)?;
            session::run_session(&mut controller).await?;
        }

        Commands::Config { set_endpoint, set_timeout, show } => {
            let path = Config::config_path()?;
            let mut stored = Config::load_from(&path)?;
            let changed = set_endpoint.is_some() || set_timeout.is_some();

            if let Some(endpoint) = set_endpoint {
                stored.set_endpoint(&endpoint)?;
                println!("✔ エンドポイントを設定しました: {}", stored.endpoint);
            }
            if let Some(seconds) = set_timeout {
                stored.set_timeout(seconds)?;
                println!("✔ タイムアウトを設定しました: {}秒", stored.timeout_seconds);
            }
            if changed {
                stored.save()?;
            }

            if show || !changed {
                let shown = if changed { &stored } else { &config };
                println!("設定 ({}):", path.display());
                println!("  エンドポイント: {}", shown.endpoint);
                println!("  タイムアウト: {}秒", shown.timeout_seconds);
                println!("  プレビュー最大サイズ: {}px", shown.preview_max_size);
            }
        }
    }

    Ok(())
}
