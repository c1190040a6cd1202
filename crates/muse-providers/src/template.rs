//! Deterministic local fallback synthesis
//!
//! When every external provider has failed, the orchestrator still owes
//! the caller a usable artifact. These templates are pure functions of the
//! request, with no network and no randomness, and their results are flagged
//! degraded and never cached.

use muse_core::{GenerationOptions, Operation};
use serde_json::{Map, Value};

/// Provider name reported on degraded results
pub const PROVIDER_NAME: &str = "local-template";

fn field<'a>(payload: &'a Map<String, Value>, key: &str, fallback: &'a str) -> &'a str {
    match payload.get(key).and_then(Value::as_str) {
        Some(value) if !value.is_empty() => value,
        _ => fallback,
    }
}

/// Synthesize a fallback artifact for the request
pub fn synthesize(operation: Operation, payload: &Map<String, Value>, options: &GenerationOptions) -> Value {
    match operation {
        Operation::Bio => {
            let name = field(payload, "name", "This artist");
            let genre = field(payload, "genre", "independent");
            serde_json::json!({
                "bio": format!(
                    "{name} is a {genre} artist crafting a distinctive sound. \
                     With a growing catalogue and a dedicated following, \
                     {name} continues to push their music forward with every release."
                ),
            })
        }
        Operation::Description => {
            let title = field(payload, "title", "This track");
            let genre = field(payload, "genre", "its genre");
            let mood = field(payload, "mood", "captivating");
            serde_json::json!({
                "description": format!("{title} delivers a {mood} take on {genre}. Press play and sink in."),
            })
        }
        Operation::PromptRewrite => {
            let base = field(payload, "base_prompt", "an evocative scene");
            let style = field(payload, "visual_style", "");
            let mut optimized = format!("{base}, highly detailed, professional quality, sharp focus");
            if !style.is_empty() {
                optimized.push_str(&format!(", {style} style"));
            }
            serde_json::json!({ "optimized_prompt": optimized })
        }
        Operation::PromptAnalysis => {
            let base = field(payload, "base_prompt", "");
            let word_count = base.split_whitespace().count();
            serde_json::json!({
                "analysis": format!(
                    "The prompt has {word_count} words. Consider specifying a subject, \
                     a visual style, lighting, and composition for more consistent results."
                ),
            })
        }
        Operation::PromptVariations => {
            let base = field(payload, "base_prompt", "an evocative scene");
            let count = usize::try_from(options.variation_count.unwrap_or(3).clamp(1, 10)).unwrap_or(3);
            let suffixes = [
                "cinematic lighting",
                "soft natural light",
                "bold color palette",
                "minimalist composition",
                "dramatic atmosphere",
                "film grain texture",
                "wide angle perspective",
                "golden hour glow",
                "high contrast",
                "muted tones",
            ];
            let variations: Vec<String> = suffixes
                .iter()
                .take(count)
                .map(|suffix| format!("{base}, {suffix}"))
                .collect();
            serde_json::json!({ "variations": variations })
        }
        Operation::Image | Operation::ImageVariations => {
            let genre = field(payload, "genre", "default");
            let slug: String = genre
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
                .collect();
            let count = if operation == Operation::ImageVariations {
                usize::try_from(options.variation_count.unwrap_or(3).clamp(1, 10)).unwrap_or(3)
            } else {
                1
            };
            let images: Vec<String> = (0..count)
                .map(|i| format!("/static/placeholders/artist-{slug}-{i}.png"))
                .collect();
            serde_json::json!({ "images": images, "placeholder": true })
        }
    }
}
