use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::{Result, TubequizError},
    quiz::{GradeResult, Quiz, RawQuiz, SubmittedAnswers, grade},
};

/// State owned by one respondent: at most one quiz and its latest result.
///
/// Nothing here is shared between sessions; each front-end request handler
/// takes the session by `&mut`.
#[derive(Debug)]
pub struct QuizSession {
    id: Uuid,
    active: Option<ActiveQuiz>,
    last_result: Option<GradeResult>,
}

#[derive(Debug)]
struct ActiveQuiz {
    raw: RawQuiz,
    quiz: Quiz,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        debug!(session = %id, "session started");
        Self {
            id,
            active: None,
            last_result: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Forget the current quiz and result before a new quiz is requested.
    pub fn begin_generation(&mut self) {
        self.active = None;
        self.last_result = None;
    }

    /// Replace whatever was stored with a freshly parsed quiz.
    pub fn install(&mut self, raw: RawQuiz, quiz: Quiz) -> &Quiz {
        info!(
            session = %self.id,
            contract = %raw.contract,
            questions = quiz.len(),
            complete = quiz.is_complete(),
            "quiz installed"
        );
        self.last_result = None;
        &self.active.insert(ActiveQuiz { raw, quiz }).quiz
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.active.as_ref().map(|active| &active.quiz)
    }

    pub fn raw(&self) -> Option<&RawQuiz> {
        self.active.as_ref().map(|active| &active.raw)
    }

    /// Grade a submission against the current quiz and keep the result.
    pub fn grade(&mut self, answers: &SubmittedAnswers) -> Result<&GradeResult> {
        let quiz = self.quiz().ok_or(TubequizError::NoActiveQuiz)?;
        let result = grade(quiz, answers);
        info!(session = %self.id, score = result.score, total = result.total, "quiz graded");
        Ok(&*self.last_result.insert(result))
    }

    pub fn last_result(&self) -> Option<&GradeResult> {
        self.last_result.as_ref()
    }
}

impl Drop for QuizSession {
    fn drop(&mut self) {
        debug!(session = %self.id, "session ended");
    }
}
