use thiserror::Error;

#[derive(Error, Debug)]
pub enum TubequizError {
    #[error("Not a recognizable YouTube URL: {input}")]
    InvalidUrl { input: String },

    #[error("No subtitles available for video {video_id}: {reason}")]
    NoSubtitlesAvailable { video_id: String, reason: String },

    #[error("{tool} is not installed or not on PATH")]
    ToolNotFound { tool: String },

    #[error("Language model returned an empty response")]
    EmptyModelResponse,

    #[error("Language model request failed: {reason}")]
    ModelRequestFailed { reason: String },

    #[error("Language model request timed out after {seconds}s")]
    ModelTimedOut { seconds: u64 },

    #[error("Malformed quiz payload: {reason}")]
    MalformedQuizPayload { reason: String, raw: String },

    #[error("No quiz has been generated in this session")]
    NoActiveQuiz,

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl TubequizError {
    /// Sentence suitable for showing to the person driving the session.
    pub fn user_message(&self) -> String {
        match self {
            TubequizError::InvalidUrl { .. } => {
                "Please enter a valid YouTube URL (youtube.com/watch?v=... or youtu.be/...).".into()
            }
            TubequizError::NoSubtitlesAvailable { .. } => {
                "Could not fetch subtitles. Please ensure the video has subtitles enabled, or pick another video.".into()
            }
            TubequizError::ToolNotFound { tool } => {
                format!("Install {tool} (for example `pip install {tool}`) and make sure it is on your PATH.")
            }
            TubequizError::EmptyModelResponse => {
                "The model returned nothing. Please try generating again.".into()
            }
            TubequizError::ModelRequestFailed { reason } => {
                format!("The model request failed ({reason}). Please try again.")
            }
            TubequizError::ModelTimedOut { seconds } => {
                format!("The model did not answer within {seconds}s. Please try again.")
            }
            TubequizError::MalformedQuizPayload { .. } => {
                "The generated quiz could not be understood. Please generate a new one.".into()
            }
            TubequizError::NoActiveQuiz => "Generate a quiz before submitting answers.".into(),
            TubequizError::MissingApiKey { env_var } => {
                format!("Set the {env_var} environment variable (or add it to .env).")
            }
            TubequizError::IoError(e) => format!("An error occurred: {e}"),
            TubequizError::JsonError(e) => format!("An error occurred: {e}"),
        }
    }

    /// Upstream generation failures that re-issuing the request may fix.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TubequizError::EmptyModelResponse
                | TubequizError::ModelRequestFailed { .. }
                | TubequizError::ModelTimedOut { .. }
                | TubequizError::MalformedQuizPayload { .. }
        )
    }

    /// Raw model output kept for diagnostics, if this error carries one.
    pub fn raw_payload(&self) -> Option<&str> {
        match self {
            TubequizError::MalformedQuizPayload { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TubequizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_payload_keeps_raw_text() {
        let err = TubequizError::MalformedQuizPayload {
            reason: "EOF while parsing".into(),
            raw: "{\"questions\": [".into(),
        };
        assert_eq!(err.raw_payload(), Some("{\"questions\": ["));
        assert!(err.is_retryable());
    }

    #[test]
    fn user_correctable_errors_are_not_retryable() {
        let err = TubequizError::InvalidUrl {
            input: "not a url".into(),
        };
        assert!(!err.is_retryable());
        assert!(err.user_message().contains("valid YouTube URL"));
        assert!(err.raw_payload().is_none());
    }
}
