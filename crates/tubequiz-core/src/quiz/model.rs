use std::{collections::BTreeMap, fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Letters a multiple-choice question is expected to use, in order.
pub const CHOICE_LETTERS: [char; 4] = ['a', 'b', 'c', 'd'];

static CHOICE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[(.]*([a-dA-D])(?:[).:]|\s|$)").expect("choice token pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    FillBlank,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::TrueFalse => "true_false",
            QuestionKind::FillBlank => "fill_blank",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    pub letter: char,
    pub text: String,
}

impl AnswerOption {
    pub fn new(letter: char, text: impl Into<String>) -> Self {
        Self {
            letter,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub number: u32,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub text: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn multiple_choice(number: u32, text: impl Into<String>, options: Vec<AnswerOption>) -> Self {
        Self {
            number,
            kind: QuestionKind::MultipleChoice,
            text: text.into(),
            options,
        }
    }

    /// True/false questions always carry the fixed `a) True`, `b) False` pair.
    pub fn true_false(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            kind: QuestionKind::TrueFalse,
            text: text.into(),
            options: vec![AnswerOption::new('a', "True"), AnswerOption::new('b', "False")],
        }
    }

    pub fn fill_blank(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            kind: QuestionKind::FillBlank,
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn option(&self, letter: char) -> Option<&AnswerOption> {
        let letter = letter.to_ascii_lowercase();
        self.options.iter().find(|opt| opt.letter == letter)
    }

    /// A multiple-choice question the parser could not find any options for.
    pub fn is_missing_options(&self) -> bool {
        self.kind == QuestionKind::MultipleChoice && self.options.is_empty()
    }

    /// Token to grade when the respondent picks `letter` from this question's options.
    pub fn answer_token(&self, letter: char) -> Option<String> {
        let option = self.option(letter)?;
        match self.kind {
            QuestionKind::TrueFalse => Some(option.text.to_lowercase()),
            QuestionKind::MultipleChoice => Some(option.letter.to_string()),
            QuestionKind::FillBlank => None,
        }
    }
}

/// Question number to canonical answer token.
pub type AnswerKey = BTreeMap<u32, String>;

/// Question number to whatever the respondent entered. Skipped questions are absent.
pub type SubmittedAnswers = BTreeMap<u32, String>;

/// Best-effort repairs made while reading a free-text quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum QuizIssue {
    InvalidNumber { raw: String },
    EmptyQuestion { number: u32 },
    DuplicateQuestion { number: u32 },
    MissingOptions { number: u32 },
    UnexpectedOptionCount { number: u32, found: usize },
    MissingAnswer { number: u32 },
}

impl fmt::Display for QuizIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizIssue::InvalidNumber { raw } => write!(f, "question number {raw:?} is not valid"),
            QuizIssue::EmptyQuestion { number: 0 } => write!(f, "question 0 was skipped, numbering starts at 1"),
            QuizIssue::EmptyQuestion { number } => write!(f, "question {number} has no text"),
            QuizIssue::DuplicateQuestion { number } => {
                write!(f, "question {number} appears more than once")
            }
            QuizIssue::MissingOptions { number } => write!(f, "no options found for question {number}"),
            QuizIssue::UnexpectedOptionCount { number, found } => {
                write!(f, "question {number} has {found} options instead of 4")
            }
            QuizIssue::MissingAnswer { number } => {
                write!(f, "answer key has no entry for question {number}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quiz {
    questions: Vec<Question>,
    answer_key: AnswerKey,
    issues: Vec<QuizIssue>,
}

impl Quiz {
    /// Sort questions by number and drop key entries for questions that do not exist.
    pub(crate) fn assemble(
        mut questions: Vec<Question>,
        mut answer_key: AnswerKey,
        issues: Vec<QuizIssue>,
    ) -> Self {
        questions.sort_by_key(|q| q.number);
        answer_key.retain(|number, _| {
            let known = questions.iter().any(|q| q.number == *number);
            if !known {
                debug!(number, "ignoring answer for unknown question");
            }
            known
        });
        Self {
            questions,
            answer_key,
            issues,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answer_key(&self) -> &AnswerKey {
        &self.answer_key
    }

    pub fn issues(&self) -> &[QuizIssue] {
        &self.issues
    }

    pub fn question(&self, number: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.number == number)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// False when the parser had to repair or skip anything.
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Leading option letter of answers like `b`, `(B)`, `b) Paris`, lowercased.
pub(crate) fn choice_letter(token: &str) -> Option<char> {
    CHOICE_TOKEN
        .captures(token.trim())
        .and_then(|caps| caps[1].chars().next())
        .map(|c| c.to_ascii_lowercase())
}

/// `true`/`false` for any casing of those words or the option letters `a`/`b`.
pub(crate) fn true_false_token(token: &str) -> Option<&'static str> {
    let token = token.trim().trim_end_matches('.').trim().to_lowercase();
    match token.as_str() {
        "true" | "a" | "a) true" => Some("true"),
        "false" | "b" | "b) false" => Some("false"),
        _ => None,
    }
}
