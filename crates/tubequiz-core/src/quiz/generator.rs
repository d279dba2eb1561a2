use tracing::info;

use crate::{
    error::{Result, TubequizError},
    llm::LanguageModel,
    quiz::{
        contract::QuizContract, free_text::parse_free_text, model::Quiz,
        normalize::strip_code_fences, structured::parse_structured,
    },
};

/// Model output tagged with the contract it was asked to follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawQuiz {
    pub contract: QuizContract,
    pub payload: String,
}

impl RawQuiz {
    /// Wrap a model response, dropping any code fences around it.
    pub fn new(contract: QuizContract, response: &str) -> Self {
        Self {
            contract,
            payload: strip_code_fences(response).to_string(),
        }
    }

    /// Run the parser that matches the recorded contract
    pub fn parse(&self) -> Result<Quiz> {
        match self.contract {
            QuizContract::Structured => parse_structured(&self.payload),
            QuizContract::FreeText => {
                let quiz = parse_free_text(&self.payload);
                if quiz.is_empty() {
                    return Err(TubequizError::MalformedQuizPayload {
                        reason: "no `Question N:` blocks found".to_string(),
                        raw: self.payload.clone(),
                    });
                }
                Ok(quiz)
            }
        }
    }
}

/// Ask the model for a quiz following `contract`
pub async fn generate_quiz(
    model: &dyn LanguageModel,
    transcript_text: &str,
    contract: QuizContract,
) -> Result<RawQuiz> {
    let prompt = contract.build_prompt(transcript_text);
    let response = model.generate(&prompt).await?;
    let raw = RawQuiz::new(contract, &response);
    if raw.payload.is_empty() {
        return Err(TubequizError::EmptyModelResponse);
    }
    info!(
        model = model.name(),
        %contract,
        len = raw.payload.len(),
        "quiz generated"
    );
    Ok(raw)
}
