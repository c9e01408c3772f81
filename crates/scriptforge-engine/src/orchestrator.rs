//! The generation orchestrator — outline → script parts → character
//! analysis, all through one [`TextGenerator`].
//!
//! Stages are independently retryable: everything already produced lives in
//! the [`ScriptRun`] and survives a mid-run failure, so a second
//! `continue_run` picks up where the last one stopped. Auto-continue
//! self-paces with a fixed delay between parts (independent of the
//! credential cooldown) and checks the stop flag between parts only — an
//! in-flight call is never interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use scriptforge_core::{CharacterProfile, GenerationParams, OutlineSection, Provider, ScriptPart};

use crate::dispatcher::TextGenerator;
use crate::error::DispatchError;
use crate::outline::parse_outline;
use crate::prompts;

/// Pause between consecutive script parts in auto-continue mode.
const PART_PACING: Duration = Duration::from_secs(2);

/// What to generate and through which provider.
#[derive(Clone, Copy, Debug)]
pub struct StoryRequest<'a> {
    pub idea: &'a str,
    pub character: Option<&'a CharacterProfile>,
    pub provider: Provider,
    /// Overrides the provider's configured default model.
    pub model: Option<&'a str>,
    pub language: &'a str,
}

/// Everything produced so far for one story.
#[derive(Clone, Debug, Default)]
pub struct ScriptRun {
    pub outline_text: String,
    pub outline: Vec<OutlineSection>,
    pub parts: Vec<ScriptPart>,
    pub analysis: Option<String>,
}

impl ScriptRun {
    /// Whether every outlined part has been written.
    pub fn is_complete(&self) -> bool {
        !self.outline.is_empty() && self.parts.len() == self.outline.len()
    }

    /// The assembled script, parts separated by `---` dividers.
    pub fn full_script(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }
}

// ─────────────────────────────────────────────
// Orchestrator
// ─────────────────────────────────────────────

/// Sequences the three pipeline stages over a [`TextGenerator`].
pub struct Orchestrator {
    generator: Arc<dyn TextGenerator>,
    /// Checked between parts only; never cancels an in-flight call.
    stop: AtomicBool,
    pacing: Duration,
}

impl Orchestrator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Orchestrator {
            generator,
            stop: AtomicBool::new(false),
            pacing: PART_PACING,
        }
    }

    /// Override the inter-part pacing (tests).
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Ask auto-continue to stop before the next part.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Re-arm auto-continue after a stop.
    pub fn clear_stop(&self) {
        self.stop.store(false, Ordering::SeqCst);
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Generate and parse the outline. Returns the raw text alongside the
    /// parsed sections so the caller can show or persist either.
    pub async fn generate_outline(
        &self,
        request: &StoryRequest<'_>,
    ) -> Result<(String, Vec<OutlineSection>), DispatchError> {
        let prompt = prompts::outline(request.idea, request.character, request.language);
        let params = provider_params(request.provider, GenerationParams::sampling(0.7, 0.95, 40));
        let text = self
            .generator
            .generate(&prompt, request.provider, request.model, &params)
            .await?;
        let sections = parse_outline(&text);
        info!(sections = sections.len(), "outline generated");
        Ok((text, sections))
    }

    /// Generate one script part, given everything written so far.
    pub async fn generate_part(
        &self,
        request: &StoryRequest<'_>,
        outline: &[OutlineSection],
        prior_parts: &[ScriptPart],
        index: usize,
    ) -> Result<String, DispatchError> {
        let prompt = prompts::script_part(
            request.idea,
            outline,
            prior_parts,
            index,
            request.character,
            request.language,
        );
        let params = provider_params(request.provider, GenerationParams::sampling(0.8, 0.95, 50));
        self.generator
            .generate(&prompt, request.provider, request.model, &params)
            .await
    }

    /// Generate a visual reference description for the main character.
    pub async fn generate_reference_character(
        &self,
        request: &StoryRequest<'_>,
    ) -> Result<String, DispatchError> {
        let prompt = prompts::reference_character(request.idea, request.language);
        let params = provider_params(request.provider, GenerationParams::sampling(0.9, 0.95, 64));
        self.generator
            .generate(&prompt, request.provider, request.model, &params)
            .await
    }

    /// Analyze every character in a finished script.
    pub async fn analyze_characters(
        &self,
        request: &StoryRequest<'_>,
        full_script: &str,
    ) -> Result<String, DispatchError> {
        let prompt = prompts::character_analysis(full_script, request.language);
        let params = provider_params(
            request.provider,
            GenerationParams {
                temperature: Some(0.5),
                ..Default::default()
            },
        );
        self.generator
            .generate(&prompt, request.provider, request.model, &params)
            .await
    }

    /// Drive a run forward: remaining parts in order, then the character
    /// analysis once all parts exist.
    ///
    /// Already-completed stages are kept in `run` even when a later stage
    /// fails, so the caller can retry by calling this again. A stop request
    /// takes effect between parts and returns `Ok` with the run as-is.
    pub async fn continue_run(
        &self,
        request: &StoryRequest<'_>,
        run: &mut ScriptRun,
    ) -> Result<(), DispatchError> {
        while run.parts.len() < run.outline.len() {
            if self.stopped() {
                debug!(parts = run.parts.len(), "stop requested between parts");
                return Ok(());
            }
            if !run.parts.is_empty() {
                tokio::time::sleep(self.pacing).await;
            }
            let index = run.parts.len();
            let content = self
                .generate_part(request, &run.outline, &run.parts, index)
                .await?;
            info!(part = index + 1, total = run.outline.len(), "part generated");
            run.parts.push(ScriptPart::new(content));
        }

        if run.is_complete() && run.analysis.is_none() {
            if self.stopped() {
                return Ok(());
            }
            let analysis = self.analyze_characters(request, &run.full_script()).await?;
            run.analysis = Some(analysis);
        }
        Ok(())
    }
}

/// Sampling parameters only reach Gemini; chat providers get the defaults
/// their endpoints assume.
fn provider_params(provider: Provider, params: GenerationParams) -> GenerationParams {
    if provider == Provider::Gemini {
        params
    } else {
        GenerationParams::default()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
