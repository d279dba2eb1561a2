//! Best-effort reader for the `Question N:` / `ANSWER KEY:` contract.
//!
//! Question type is guessed from the block content with a fixed precedence:
//! a block mentioning both `True` and `False` in at most three lines is a
//! true/false question, a block containing a run of five or more underscores
//! is fill-in-the-blank, anything else is multiple choice. A multiple-choice
//! question whose text itself says "True" and "False" is therefore misread
//! when its options are missing; that weakness is kept on purpose and covered
//! by tests. Problems are recorded as [`QuizIssue`]s instead of aborting.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::quiz::model::{
    AnswerKey, AnswerOption, Question, QuestionKind, Quiz, QuizIssue, choice_letter,
    true_false_token,
};

pub const ANSWER_KEY_MARKER: &str = "ANSWER KEY:";

static QUESTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Question\s+(\d+):").expect("question header pattern"));
static OPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-d])[).]\s*(.*)$").expect("option line pattern"));
static ANSWER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[.)]?\s*(.*)$").expect("answer line pattern"));
static BLANK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{5,}").expect("blank pattern"));

/// Parse a free-text quiz. Never fails; check [`Quiz::issues`] for repairs.
pub fn parse_free_text(payload: &str) -> Quiz {
    let (questions_text, answers_text) = payload
        .split_once(ANSWER_KEY_MARKER)
        .unwrap_or((payload, ""));

    let mut issues = Vec::new();
    let questions = parse_questions(questions_text, &mut issues);
    let answer_key = parse_answers(answers_text, &questions);

    for question in &questions {
        if !answer_key.contains_key(&question.number) {
            issues.push(QuizIssue::MissingAnswer {
                number: question.number,
            });
        }
    }
    for issue in &issues {
        warn!(%issue, "free-text quiz repaired");
    }

    Quiz::assemble(questions, answer_key, issues)
}

fn parse_questions(text: &str, issues: &mut Vec<QuizIssue>) -> Vec<Question> {
    // (header start, body start, number text)
    let headers: Vec<(usize, usize, &str)> = QUESTION_HEADER
        .captures_iter(text)
        .filter_map(|caps| {
            let header = caps.get(0)?;
            let number = caps.get(1)?;
            Some((header.start(), header.end(), number.as_str()))
        })
        .collect();

    let mut questions: Vec<Question> = Vec::with_capacity(headers.len());
    for (i, &(_, body_start, raw_number)) in headers.iter().enumerate() {
        let body_end = headers.get(i + 1).map_or(text.len(), |next| next.0);
        let body = &text[body_start..body_end];

        let number = match raw_number.parse::<u32>() {
            Ok(0) => {
                issues.push(QuizIssue::EmptyQuestion { number: 0 });
                continue;
            }
            Ok(n) => n,
            Err(_) => {
                issues.push(QuizIssue::InvalidNumber {
                    raw: raw_number.to_string(),
                });
                continue;
            }
        };
        if questions.iter().any(|q| q.number == number) {
            issues.push(QuizIssue::DuplicateQuestion { number });
            continue;
        }
        if let Some(question) = parse_block(number, body, issues) {
            questions.push(question);
        }
    }
    questions
}

fn parse_block(number: u32, body: &str, issues: &mut Vec<QuizIssue>) -> Option<Question> {
    let content = body.trim();
    let lines: Vec<&str> = content.split('\n').collect();
    let text = lines[0].trim();
    if text.is_empty() {
        issues.push(QuizIssue::EmptyQuestion { number });
        return None;
    }

    if content.contains("True") && content.contains("False") && lines.len() <= 3 {
        return Some(Question::true_false(number, text));
    }
    if BLANK.is_match(content) {
        return Some(Question::fill_blank(number, text));
    }

    let mut options: Vec<AnswerOption> = Vec::new();
    for line in &lines[1..] {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(caps) = OPTION_LINE.captures(line) else {
            debug!(number, line, "ignoring stray line in question block");
            continue;
        };
        let Some(letter) = caps[1].chars().next() else {
            continue;
        };
        if options.iter().any(|opt| opt.letter == letter) {
            continue;
        }
        let option_text = caps[2].trim_end_matches('(').trim();
        options.push(AnswerOption::new(letter, option_text));
    }

    match options.len() {
        0 => issues.push(QuizIssue::MissingOptions { number }),
        4 => {}
        found => issues.push(QuizIssue::UnexpectedOptionCount { number, found }),
    }
    Some(Question::multiple_choice(number, text, options))
}

fn parse_answers(text: &str, questions: &[Question]) -> AnswerKey {
    let kinds: HashMap<u32, QuestionKind> = questions.iter().map(|q| (q.number, q.kind)).collect();
    let mut key = AnswerKey::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(caps) = ANSWER_LINE.captures(line) else {
            continue;
        };
        let Ok(number) = caps[1].parse::<u32>() else {
            continue;
        };
        let Some(kind) = kinds.get(&number) else {
            debug!(number, "answer line for unknown question");
            continue;
        };

        let mut answer = caps[2].trim();
        if answer.len() >= 2 && answer.starts_with('(') && answer.ends_with(')') {
            answer = answer[1..answer.len() - 1].trim();
        }
        if answer.is_empty() {
            continue;
        }

        let token = match kind {
            QuestionKind::MultipleChoice => choice_letter(answer)
                .map(String::from)
                .unwrap_or_else(|| answer.to_string()),
            QuestionKind::TrueFalse => true_false_token(answer)
                .map(String::from)
                .unwrap_or_else(|| answer.to_lowercase()),
            QuestionKind::FillBlank => answer.to_string(),
        };
        key.insert(number, token);
    }
    key
}
