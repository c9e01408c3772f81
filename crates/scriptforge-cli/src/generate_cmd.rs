//! `scriptforge outline|character|run` — the generation commands.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use scriptforge_core::{FileKvStore, KvStore};
use scriptforge_engine::{Dispatcher, Orchestrator, ScriptRun, StoryRequest};

use crate::GenerateOptions;

fn build_orchestrator() -> Orchestrator {
    let kv: Arc<dyn KvStore> = Arc::new(FileKvStore::open_default());
    Orchestrator::new(Arc::new(Dispatcher::new(kv)))
}

fn story_request<'a>(idea: &'a str, options: &'a GenerateOptions) -> StoryRequest<'a> {
    StoryRequest {
        idea,
        character: None,
        provider: options.provider,
        model: options.model.as_deref(),
        language: &options.language,
    }
}

/// Generate and print an outline.
pub async fn outline(idea: &str, options: &GenerateOptions) -> Result<()> {
    let orchestrator = build_orchestrator();
    let request = story_request(idea, options);

    let (text, sections) = orchestrator
        .generate_outline(&request)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!("{text}");
    if sections.is_empty() {
        println!();
        println!(
            "{}",
            "The response did not parse into sections; try regenerating.".yellow()
        );
    }
    Ok(())
}

/// Generate and print a reference character description.
pub async fn character(idea: &str, options: &GenerateOptions) -> Result<()> {
    let orchestrator = build_orchestrator();
    let request = story_request(idea, options);

    let text = orchestrator
        .generate_reference_character(&request)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    println!("{text}");
    Ok(())
}

/// Full pipeline: outline, every part, then character analysis.
pub async fn run(idea: &str, output: Option<&Path>, options: &GenerateOptions) -> Result<()> {
    let orchestrator = build_orchestrator();
    let request = story_request(idea, options);

    eprintln!("{}", "Generating outline...".dimmed());
    let (outline_text, sections) = orchestrator
        .generate_outline(&request)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    if sections.is_empty() {
        anyhow::bail!("the outline did not parse into any sections; try again");
    }
    eprintln!(
        "{}",
        format!("Outline ready: {} parts.", sections.len()).dimmed()
    );

    let mut script_run = ScriptRun {
        outline_text,
        outline: sections,
        ..Default::default()
    };
    orchestrator
        .continue_run(&request, &mut script_run)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    info!(parts = script_run.parts.len(), "script complete");

    let mut assembled = script_run.full_script();
    if let Some(analysis) = &script_run.analysis {
        assembled.push_str("\n\n---\n\n");
        assembled.push_str(analysis);
    }

    match output {
        Some(path) => {
            std::fs::write(path, &assembled)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Script written to {}", path.display());
        }
        None => println!("{assembled}"),
    }
    Ok(())
}
