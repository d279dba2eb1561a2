//! Tubequiz Core Library
//!
//! Turns YouTube transcripts into bullet-point summaries and graded quizzes
//! with the help of a generative language model.

pub mod cache;
pub mod error;
pub mod format;
pub mod llm;
pub mod pipeline;
pub mod presenter;
pub mod provider;
pub mod quiz;
pub mod session;
pub mod summary;
pub mod transcript;
pub mod types;
pub mod video_id;

// Re-export commonly used items at crate root
pub use error::{Result, TubequizError};
pub use format::{
    format_grade_report, format_quiz_readable, format_time, format_transcript_with_timestamps,
    strip_timestamps,
};
pub use llm::{ChatCompletionsModel, DEFAULT_TIMEOUT, LanguageModel};
pub use pipeline::{fetch_transcript, install_raw_quiz, quiz_text, quiz_video, summarize_video};
pub use presenter::QuizPresenter;
pub use provider::{Provider, ProviderConfig};
pub use quiz::{
    GradeResult, Question, QuestionKind, Quiz, QuizContract, QuizIssue, RawQuiz,
    SubmittedAnswers, Verdict,
};
pub use session::QuizSession;
pub use summary::summarize;
pub use transcript::{TranscriptService, YtDlpTranscripts};
pub use types::{Segment, Transcript};
pub use video_id::{VideoId, extract_video_id};
