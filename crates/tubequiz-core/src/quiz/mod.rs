//! Quiz generation, parsing and grading.

pub mod contract;
pub mod free_text;
pub mod generator;
pub mod grader;
pub mod model;
pub mod normalize;
pub mod structured;

pub use contract::QuizContract;
pub use free_text::{ANSWER_KEY_MARKER, parse_free_text};
pub use generator::{RawQuiz, generate_quiz};
pub use grader::{GradeResult, Verdict, grade};
pub use model::{
    AnswerKey, AnswerOption, CHOICE_LETTERS, Question, QuestionKind, Quiz, QuizIssue,
    SubmittedAnswers,
};
pub use normalize::strip_code_fences;
pub use structured::parse_structured;
