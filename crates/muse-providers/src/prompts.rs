//! Instruction building shared by the text adapters
//!
//! Both text providers receive the same instruction for a given request,
//! so switching providers mid-fallback changes the voice, not the task.

use muse_core::{GenerationOptions, Operation};
use serde_json::{Map, Value};

/// Pull a string field out of the payload, empty when absent
fn field<'a>(payload: &'a Map<String, Value>, key: &str) -> &'a str {
    payload.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Build the instruction sent to a text provider
pub(crate) fn build_instruction(operation: Operation, payload: &Map<String, Value>, options: &GenerationOptions) -> String {
    let mut instruction = match operation {
        Operation::Bio => {
            let name = field(payload, "name");
            let genre = field(payload, "genre");
            let mut text = format!("Write a professional artist biography for \"{name}\".");
            if !genre.is_empty() {
                text.push_str(&format!(" The artist works in the {genre} genre."));
            }
            let influences = field(payload, "influences");
            if !influences.is_empty() {
                text.push_str(&format!(" Influences: {influences}."));
            }
            text.push_str(" Keep it under 200 words, third person, no headings.");
            text
        }
        Operation::Description => {
            let title = field(payload, "title");
            let genre = field(payload, "genre");
            let mood = field(payload, "mood");
            format!(
                "Write a short, engaging description for the track \"{title}\" \
                 (genre: {genre}, mood: {mood}). Two sentences at most."
            )
        }
        Operation::PromptRewrite => {
            let base = field(payload, "base_prompt");
            let style = field(payload, "visual_style");
            let mut text = format!(
                "Rewrite and optimize the following image-generation prompt for \
                 clarity and visual detail. Return only the rewritten prompt.\n\n{base}"
            );
            if !style.is_empty() {
                text.push_str(&format!("\n\nTarget visual style: {style}."));
            }
            text
        }
        Operation::PromptAnalysis => {
            let base = field(payload, "base_prompt");
            format!(
                "Analyze the following image-generation prompt. Point out weak \
                 spots, missing subject/style/lighting details, and suggest one \
                 concrete improvement.\n\n{base}"
            )
        }
        Operation::PromptVariations => {
            let base = field(payload, "base_prompt");
            let count = options.variation_count.unwrap_or(3);
            format!(
                "Produce {count} distinct variations of the following \
                 image-generation prompt, one per line, no numbering.\n\n{base}"
            )
        }
        // Image operations never reach a text provider
        Operation::Image | Operation::ImageVariations => String::new(),
    };

    if !options.target_platforms.is_empty() {
        instruction.push_str(&format!(
            " Tailor the tone for these platforms: {}.",
            options.target_platforms.join(", ")
        ));
    }

    instruction
}

/// Build the prompt sent to an image provider
pub(crate) fn build_image_prompt(payload: &Map<String, Value>, options: &GenerationOptions) -> String {
    let base = field(payload, "base_prompt");
    let mut prompt = if base.is_empty() {
        let name = field(payload, "name");
        let genre = field(payload, "genre");
        format!("Press photo of the artist \"{name}\", {genre} aesthetic")
    } else {
        base.to_owned()
    };

    let style = field(payload, "visual_style");
    if !style.is_empty() {
        prompt.push_str(&format!(", {style} style"));
    }
    if options.quality.as_deref() == Some("hd") {
        prompt.push_str(", ultra detailed");
    }
    prompt
}
