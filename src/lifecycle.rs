//! The single in-flight generation request: admission, the external call, and settlement.

use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{ImaginaError, Result},
    generator::{compose_prompt, ImageGenerator},
    ledger,
    logger,
    models::{GeneratedImage, ImageGenerationRequest, ImageSize, Orientation},
};

pub const INSUFFICIENT_CREDITS_MESSAGE: &str = "Not enough credits to generate image.";
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate image. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GenerationState {
    Idle,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GenerationOutcome {
    Succeeded,
    Failed,
}

/// An admitted request. Must be handed back to [`GenerationLifecycle::finish`].
#[derive(Debug)]
pub struct PendingGeneration {
    token: Uuid,
    pub prompt: String,
    pub orientation: Orientation,
    pub size: ImageSize,
    pub request: ImageGenerationRequest,
}

impl PendingGeneration {
    pub fn token(&self) -> Uuid {
        self.token
    }

    pub fn cost(&self) -> u32 {
        ledger::cost_of(self.size)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerationLifecycle {
    in_flight: Option<Uuid>,
    last_outcome: Option<GenerationOutcome>,
    error: Option<String>,
}

impl GenerationLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GenerationState {
        if self.in_flight.is_some() {
            GenerationState::Pending
        } else {
            GenerationState::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_outcome(&self) -> Option<GenerationOutcome> {
        self.last_outcome
    }

    /// The user-facing message of the last rejected or failed request.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Admits a request, or refuses it without touching any state but the error message.
    pub fn begin(
        &mut self,
        prompt: &str,
        orientation: Orientation,
        size: ImageSize,
        balance: u32,
    ) -> Result<PendingGeneration> {
        if self.in_flight.is_some() {
            log::warn!("Rejecting generation request: another request is pending");
            return Err(ImaginaError::Busy);
        }
        if prompt.trim().is_empty() {
            self.error = None;
            return Err(ImaginaError::EmptyPrompt);
        }
        if !ledger::can_afford(balance, size) {
            let required = ledger::cost_of(size);
            log::warn!(
                "Rejecting {} generation: {} credits required, {} available",
                size,
                required,
                balance
            );
            self.error = Some(INSUFFICIENT_CREDITS_MESSAGE.to_string());
            return Err(ImaginaError::InsufficientCredits {
                required,
                available: balance,
            });
        }

        let token = Uuid::new_v4();
        self.in_flight = Some(token);
        self.error = None;
        log::info!("Generation {} pending ({}, {})", token, orientation, size);

        Ok(PendingGeneration {
            token,
            prompt: prompt.to_string(),
            orientation,
            size,
            request: ImageGenerationRequest {
                prompt: compose_prompt(prompt, size),
                orientation,
            },
        })
    }

    /// Settles an admitted request. The pending flag is cleared on every path.
    pub fn finish(
        &mut self,
        pending: PendingGeneration,
        user_id: &str,
        outcome: Result<String>,
    ) -> Result<GeneratedImage> {
        if self.in_flight != Some(pending.token) {
            return Err(ImaginaError::Internal(format!(
                "generation {} is not the request in flight",
                pending.token
            )));
        }
        self.in_flight = None;

        match outcome {
            Ok(image_url) => {
                log::info!("Generation {} succeeded", pending.token);
                self.last_outcome = Some(GenerationOutcome::Succeeded);
                self.error = None;
                Ok(GeneratedImage::new(
                    user_id,
                    pending.prompt,
                    pending.orientation,
                    pending.size,
                    image_url,
                ))
            }
            Err(e) => {
                log::error!("Generation {} failed: {}", pending.token, e);
                self.last_outcome = Some(GenerationOutcome::Failed);
                self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
                Err(match e {
                    ImaginaError::Timeout(_) | ImaginaError::GenerationFailure(_) => e,
                    other => ImaginaError::GenerationFailure(other.to_string()),
                })
            }
        }
    }

    /// Admits, calls `generator` under `timeout`, and settles in one step.
    #[allow(clippy::too_many_arguments)]
    pub async fn run(
        &mut self,
        generator: &dyn ImageGenerator,
        timeout: Duration,
        user_id: &str,
        prompt: &str,
        orientation: Orientation,
        size: ImageSize,
        balance: u32,
    ) -> Result<GeneratedImage> {
        let pending = self.begin(prompt, orientation, size, balance)?;
        let mut guard = InFlightGuard {
            lifecycle: self,
            token: pending.token,
            armed: true,
        };
        let outcome = call_with_timeout(generator, pending.request.clone(), timeout).await;
        guard.armed = false;
        guard.lifecycle.finish(pending, user_id, outcome)
    }

    fn abandon(&mut self, token: Uuid) {
        if self.in_flight != Some(token) {
            return;
        }
        log::warn!("Generation {} cancelled before it settled", token);
        self.in_flight = None;
        self.last_outcome = Some(GenerationOutcome::Failed);
        self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
    }
}

/// Settles the request as failed if the future driving it is dropped mid-call.
struct InFlightGuard<'a> {
    lifecycle: &'a mut GenerationLifecycle,
    token: Uuid,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.lifecycle.abandon(self.token);
        }
    }
}

pub async fn call_with_timeout(
    generator: &dyn ImageGenerator,
    request: ImageGenerationRequest,
    timeout: Duration,
) -> Result<String> {
    let _timer = logger::timer("image generation");
    match tokio::time::timeout(timeout, generator.generate(request)).await {
        Ok(result) => result,
        Err(_) => Err(ImaginaError::Timeout(timeout)),
    }
}
