use tracing::info;

use crate::{
    error::{Result, TubequizError},
    llm::LanguageModel,
};

static SUMMARY_INSTRUCTION: &str = "\n Summarize the above youtube transcript in points";

pub fn build_summary_prompt(transcript_text: &str) -> String {
    format!("{}{}", transcript_text, SUMMARY_INSTRUCTION)
}

/// Ask the model for a bullet-point summary of the transcript
pub async fn summarize(model: &dyn LanguageModel, transcript_text: &str) -> Result<String> {
    let prompt = build_summary_prompt(transcript_text);
    let summary = model.generate(&prompt).await?;
    let summary = summary.trim();
    if summary.is_empty() {
        return Err(TubequizError::EmptyModelResponse);
    }
    info!(model = model.name(), len = summary.len(), "summary generated");
    Ok(summary.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_follows_transcript() {
        let prompt = build_summary_prompt("we talk about rust");
        assert!(prompt.starts_with("we talk about rust\n"));
        assert!(prompt.ends_with("Summarize the above youtube transcript in points"));
    }
}
