//! # Explanation enricher
//!
//! Asks a hosted language model for a one-sentence explanation and a short list of
//! steps for an already computed answer. The text is advisory only and never used
//! to compute anything.
//!
//! The public entry point returns [`Explanation`], never a `Result`: a missing key,
//! an unreachable service, a bad status or an unreadable reply all become
//! [`Explanation::Degraded`] with fixed placeholder text, and the request goes on.

pub mod config;
pub mod errors;
pub mod gemini;
pub mod prompts;

pub use config::ExplanationConfig;
pub use errors::ExplanationError;
pub use gemini::GeminiClient;

use log::{info, warn};
use serde::Serialize;

use crate::calculator::CalculationRequest;

pub const MISSING_KEY_EXPLANATION: &str = "AI explanation unavailable (Missing API Key)";
pub const NOT_REQUESTED_EXPLANATION: &str = "AI explanation not requested.";
pub const SERVICE_FAILURE_EXPLANATION: &str = "Could not generate explanation at this time.";
pub const STEPS_UNAVAILABLE: &str = "Step-by-step solution unavailable.";
pub const EXPLANATION_FIELD_MISSING: &str = "Explanation generation failed.";
pub const STEPS_FIELD_MISSING: &str = "Steps generation failed.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplanationPayload {
    pub explanation: String,
    pub steps: String,
}

impl ExplanationPayload {
    fn placeholder(explanation: &str) -> Self {
        Self {
            explanation: explanation.to_string(),
            steps: STEPS_UNAVAILABLE.to_string(),
        }
    }
}

/// Why the placeholder text was used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradeReason {
    MissingApiKey,
    /// the client asked for `include_ai=false`
    NotRequested,
    ServiceFailure(ExplanationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation {
    Generated(ExplanationPayload),
    Degraded {
        reason: DegradeReason,
        payload: ExplanationPayload,
    },
}

impl Explanation {
    pub fn degraded(reason: DegradeReason) -> Self {
        let text = match &reason {
            DegradeReason::MissingApiKey => MISSING_KEY_EXPLANATION,
            DegradeReason::NotRequested => NOT_REQUESTED_EXPLANATION,
            DegradeReason::ServiceFailure(_) => SERVICE_FAILURE_EXPLANATION,
        };
        Explanation::Degraded {
            reason,
            payload: ExplanationPayload::placeholder(text),
        }
    }

    pub fn payload(&self) -> &ExplanationPayload {
        match self {
            Explanation::Generated(payload) => payload,
            Explanation::Degraded { payload, .. } => payload,
        }
    }

    pub fn into_payload(self) -> ExplanationPayload {
        match self {
            Explanation::Generated(payload) => payload,
            Explanation::Degraded { payload, .. } => payload,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Explanation::Generated(_))
    }
}

/// Holds the model client when an API key is configured
#[derive(Debug, Clone, Default)]
pub struct ExplanationEnricher {
    client: Option<GeminiClient>,
}

impl ExplanationEnricher {
    pub fn from_config(config: &ExplanationConfig) -> Self {
        let Some(api_key) = config.effective_api_key() else {
            info!("no API key configured, AI explanations disabled");
            return Self::disabled();
        };
        match GeminiClient::new(config, api_key) {
            Ok(client) => {
                info!("AI explanations enabled ({})", config.model);
                Self {
                    client: Some(client),
                }
            }
            Err(e) => {
                warn!("AI explanations disabled: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { client: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Explanation for a solved request; `answer` is the plain-text result
    pub async fn explain(&self, request: &CalculationRequest, answer: &str) -> Explanation {
        let Some(client) = &self.client else {
            return Explanation::degraded(DegradeReason::MissingApiKey);
        };
        let prompt = prompts::build_prompt(
            request.operation,
            &request.expression,
            request.target_text(),
            answer,
        );
        match client.generate(&prompt).await {
            Ok(payload) => Explanation::Generated(payload),
            Err(e) => {
                warn!("AI Error: {}", e);
                Explanation::degraded(DegradeReason::ServiceFailure(e))
            }
        }
    }
}
