use serde::Serialize;

use crate::quiz::model::{Question, QuestionKind, Quiz, SubmittedAnswers};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub number: u32,
    pub correct: bool,
    pub user_answer: String,
    /// `None` when the answer key has no entry for this question.
    pub correct_answer_display: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeResult {
    pub score: usize,
    pub total: usize,
    pub verdicts: Vec<Verdict>,
}

impl GradeResult {
    pub fn is_perfect(&self) -> bool {
        self.score == self.total
    }
}

/// Grade every submitted answer against the quiz's answer key.
///
/// Answers match when equal after trimming and lowercasing, whatever the
/// question type. Skipped questions are not in `submitted` and do not count
/// towards `total`.
pub fn grade(quiz: &Quiz, submitted: &SubmittedAnswers) -> GradeResult {
    let verdicts: Vec<Verdict> = submitted
        .iter()
        .map(|(&number, user_answer)| {
            let question = quiz.question(number);
            match quiz.answer_key().get(&number) {
                Some(correct) => Verdict {
                    number,
                    correct: answers_match(user_answer, correct),
                    user_answer: user_answer.clone(),
                    correct_answer_display: Some(display_answer(question, correct)),
                },
                None => Verdict {
                    number,
                    correct: false,
                    user_answer: user_answer.clone(),
                    correct_answer_display: None,
                },
            }
        })
        .collect();

    GradeResult {
        score: verdicts.iter().filter(|v| v.correct).count(),
        total: verdicts.len(),
        verdicts,
    }
}

fn answers_match(user_answer: &str, correct: &str) -> bool {
    user_answer.trim().to_lowercase() == correct.trim().to_lowercase()
}

fn display_answer(question: Option<&Question>, correct: &str) -> String {
    let Some(question) = question else {
        return correct.to_string();
    };
    match question.kind {
        QuestionKind::MultipleChoice => {
            let mut chars = correct.trim().chars();
            let option = match (chars.next(), chars.next()) {
                (Some(letter), None) => question.option(letter),
                _ => None,
            };
            match option {
                Some(opt) => format!("{}) {}", opt.letter.to_ascii_uppercase(), opt.text),
                None => correct.to_string(),
            }
        }
        QuestionKind::TrueFalse => match correct.trim().to_lowercase().as_str() {
            "a" | "true" => "True".to_string(),
            "b" | "false" => "False".to_string(),
            _ => correct.to_string(),
        },
        QuestionKind::FillBlank => correct.to_string(),
    }
}
