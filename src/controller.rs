//! 予測リクエストの制御
//!
//! 状態遷移:
//! - Idle / Succeeded / Failed → Pending（画像あり・送信時）
//! - Pending → Succeeded / Failed（応答完了時のみ）
//! - 任意 → Idle（選択・クリア時）
//!
//! 送信ごとに世代番号を進め、完了時に世代が一致しない応答は捨てる。
//! 選択・クリアでも世代を進めるため、途中で差し替えられた送信の応答は
//! 新しい状態を上書きしない。
//!
//! 通信中の送信は状態とは別に `in_flight` で追跡する。選択・クリアで Idle に
//! 戻っても、その応答が届くまで次の送信は受け付けない（通信は常に高々1つ）。

use crate::client::PredictionService;
use crate::image_file::ImageFile;
use crate::selection::{PreviewFactory, SelectionManager};
use butterfly_id_common::{interpret_reply, render, PredictionFailure, PredictionResult, PredictionState, ResultView};

/// `begin_submit` の結果
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Pending に遷移した。`Submission::run` で送信する
    Started(Submission),
    /// すでに Pending（何もしない）
    AlreadyPending,
    /// 画像未選択（Failed に遷移、通信なし）
    NoImageSelected,
}

/// 受け付けられた1回分の送信
#[derive(Debug)]
pub struct Submission {
    generation: u64,
    image: ImageFile,
}

impl Submission {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn image(&self) -> &ImageFile {
        &self.image
    }

    /// サービスへ1回だけ送信し、完了を返す
    pub async fn run<S: PredictionService>(self, service: &S) -> Completion {
        let outcome = match service.predict(&self.image).await {
            Ok(reply) => {
                let outcome = interpret_reply(&reply);
                if let Err(failure) = &outcome {
                    log::warn!("prediction failed (status {}): {}", reply.status, failure.kind());
                }
                outcome
            }
            Err(e) => {
                log::warn!("prediction request failed: {}", e);
                Err(PredictionFailure::TransportFailure)
            }
        };

        Completion {
            generation: self.generation,
            outcome,
        }
    }
}

/// 送信の完了（まだ状態には反映されていない）
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    generation: u64,
    outcome: Result<PredictionResult, PredictionFailure>,
}

impl Completion {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn outcome(&self) -> &Result<PredictionResult, PredictionFailure> {
        &self.outcome
    }
}

/// 予測ワークフロー（画像選択 + リクエスト状態）
///
/// ワークフロー開始時に作り、終了時に破棄する。
/// 破棄時には選択中のプレビューが解放される。
pub struct PredictionController<S: PredictionService, P: PreviewFactory> {
    service: S,
    selection: SelectionManager<P>,
    state: PredictionState,
    generation: u64,
    /// 応答待ちの送信の世代
    in_flight: Option<u64>,
}

impl<S: PredictionService, P: PreviewFactory> PredictionController<S, P> {
    pub fn new(service: S, previews: P) -> Self {
        Self {
            service,
            selection: SelectionManager::new(previews),
            state: PredictionState::Idle,
            generation: 0,
            in_flight: None,
        }
    }

    /// 画像を選択。以前の結果・エラーは無効になる
    pub fn select(&mut self, file: ImageFile) {
        self.selection.select(file);
        self.invalidate();
    }

    /// 選択を解除して Idle に戻す（何度呼んでもよい）
    pub fn clear(&mut self) {
        self.selection.clear();
        self.invalidate();
    }

    /// すべての状態を初期化（ワークフロー終了時）
    pub fn reset(&mut self) {
        self.clear();
    }

    /// 送信を開始（状態遷移のみ。通信は `Submission::run`）
    pub fn begin_submit(&mut self) -> SubmitOutcome {
        if self.state.is_pending() || self.in_flight.is_some() {
            log::debug!("submit ignored: request already in flight");
            return SubmitOutcome::AlreadyPending;
        }

        let Some(image) = self.selection.image().cloned() else {
            self.transition(PredictionState::Failed(PredictionFailure::NoImageSelected));
            return SubmitOutcome::NoImageSelected;
        };

        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.transition(PredictionState::Pending);
        SubmitOutcome::Started(Submission {
            generation: self.generation,
            image,
        })
    }

    /// 完了を反映。古い世代の完了なら捨てて false
    ///
    /// 古い世代でも通信は終わっているので、次の送信は受け付けるようになる。
    pub fn complete(&mut self, completion: Completion) -> bool {
        if self.in_flight == Some(completion.generation) {
            self.in_flight = None;
        }

        if completion.generation != self.generation || !self.state.is_pending() {
            log::debug!(
                "discarding stale completion (generation {}, current {})",
                completion.generation,
                self.generation
            );
            return false;
        }

        self.transition(completion.outcome.into());
        true
    }

    /// 送信して完了まで待つ
    ///
    /// Pending 中の呼び出しは何もしない。画像未選択なら通信せず Failed。
    pub async fn submit(&mut self) -> &PredictionState {
        if let SubmitOutcome::Started(submission) = self.begin_submit() {
            let completion = submission.run(&self.service).await;
            self.complete(completion);
        }
        &self.state
    }

    pub fn state(&self) -> &PredictionState {
        &self.state
    }

    /// 現在の状態の表示構造
    pub fn view(&self) -> ResultView {
        render(&self.state)
    }

    pub fn selection(&self) -> &SelectionManager<P> {
        &self.selection
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 送信操作が可能か（画像あり かつ 通信中でない）
    pub fn can_submit(&self) -> bool {
        self.selection.has_image() && !self.state.is_pending() && self.in_flight.is_none()
    }

    /// 応答待ちの送信があるか（古い世代のものも含む）
    pub fn has_request_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// クリア操作は常に可能
    pub fn can_clear(&self) -> bool {
        true
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.transition(PredictionState::Idle);
    }

    fn transition(&mut self, next: PredictionState) {
        if self.state.as_str() != next.as_str() {
            log::debug!("state {} -> {}", self.state.as_str(), next.as_str());
        }
        self.state = next;
    }
}
