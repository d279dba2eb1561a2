use crate::{
    error::Result,
    quiz::{Quiz, SubmittedAnswers},
};

/// Renders a quiz as a form and collects the answers.
///
/// Implementations show a single-choice selector for multiple-choice and
/// true/false questions (convert the chosen letter with
/// [`Question::answer_token`](crate::quiz::Question::answer_token)) and a
/// free-text field for fill-in-the-blank. Answers are returned only once the
/// respondent submits the whole form; `Ok(None)` means the form was abandoned.
pub trait QuizPresenter {
    fn present(&mut self, quiz: &Quiz) -> Result<Option<SubmittedAnswers>>;
}
