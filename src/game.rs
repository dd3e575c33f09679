//! "Guess the prompt" game: image generation for a secret prompt and
//! embedding-based scoring of the player's guess.

use crate::ai::{ensure_not_blank, EmbeddingService, ImageGenerationService};
use crate::image::GeneratedImage;
use crate::semantic::{self, SimilarityScore};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Seconds a player gets to guess once the image is shown.
pub const ROUND_DURATION_SECS: i64 = 30;

/// Scores a guess against a reference prompt.
///
/// Holds no state between evaluations; the embedding provider is injected so
/// tests can substitute [`MockEmbeddingClient`](crate::ai::MockEmbeddingClient).
#[derive(Clone)]
pub struct GuessEvaluator {
    embeddings: Arc<dyn EmbeddingService>,
}

impl GuessEvaluator {
    pub fn new(embeddings: Arc<dyn EmbeddingService>) -> Self {
        Self { embeddings }
    }

    /// Embed both texts and score their cosine similarity.
    ///
    /// Both texts are validated before any provider call. The two lookups
    /// run concurrently and the first failure aborts the evaluation.
    pub async fn evaluate_guess(
        &self,
        reference_text: &str,
        guess_text: &str,
    ) -> Result<SimilarityScore> {
        ensure_not_blank(reference_text, "reference prompt")?;
        ensure_not_blank(guess_text, "guess")?;

        let (reference, guess) = tokio::try_join!(
            self.embeddings.embed(reference_text),
            self.embeddings.embed(guess_text)
        )?;

        let score = semantic::score(&reference, &guess)?;
        info!(
            "Scored guess at {} ({} dimensions)",
            score,
            reference.dimensions()
        );
        Ok(score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Guessing,
    Results,
}

/// One play-through: a secret prompt, its image, and eventually a scored guess.
#[derive(Debug, Clone)]
pub struct GuessRound {
    id: Uuid,
    prompt: String,
    image: GeneratedImage,
    started_at: DateTime<Utc>,
    guess: Option<String>,
    score: Option<SimilarityScore>,
}

impl GuessRound {
    pub fn new(prompt: String, image: GeneratedImage, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt,
            image,
            started_at,
            guess: None,
            score: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn image(&self) -> &GeneratedImage {
        &self.image
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn guess(&self) -> Option<&str> {
        self.guess.as_deref()
    }

    pub fn score(&self) -> Option<SimilarityScore> {
        self.score
    }

    pub fn phase(&self) -> RoundPhase {
        if self.score.is_some() {
            RoundPhase::Results
        } else {
            RoundPhase::Guessing
        }
    }

    /// Countdown value at `now`, saturating at zero.
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        let elapsed = (now - self.started_at).num_seconds().max(0);
        (ROUND_DURATION_SECS - elapsed).max(0)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.seconds_remaining(now) == 0
    }
}

/// Drives rounds of the guessing game.
#[derive(Clone)]
pub struct GuessGame {
    images: Arc<dyn ImageGenerationService>,
    evaluator: GuessEvaluator,
}

impl GuessGame {
    pub fn new(images: Arc<dyn ImageGenerationService>, evaluator: GuessEvaluator) -> Self {
        Self { images, evaluator }
    }

    /// Generate the image for `prompt` and open a round for guessing.
    pub async fn start_round(&self, prompt: &str) -> Result<GuessRound> {
        ensure_not_blank(prompt, "prompt")?;

        let image = self.images.generate_image(prompt).await?;
        let round = GuessRound::new(prompt.to_string(), image, Utc::now());
        info!("Started round {}", round.id());
        Ok(round)
    }

    /// Score `guess` for `round` and move it to the results phase.
    ///
    /// A failed evaluation leaves the round open so the guess can be retried.
    pub async fn submit_guess(
        &self,
        round: &mut GuessRound,
        guess: &str,
    ) -> Result<SimilarityScore> {
        if round.phase() == RoundPhase::Results {
            return Err(Error::InvalidInput(format!(
                "round {} already has a scored guess",
                round.id()
            )));
        }

        let score = self
            .evaluator
            .evaluate_guess(&round.prompt, guess)
            .await
            .map_err(|e| {
                warn!("Failed to evaluate guess for round {}: {}", round.id(), e);
                e
            })?;

        round.guess = Some(guess.to_string());
        round.score = Some(score);
        Ok(score)
    }
}
