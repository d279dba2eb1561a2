use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{Result, TubequizError},
    quiz::{
        model::{
            AnswerKey, AnswerOption, CHOICE_LETTERS, Question, QuestionKind, Quiz, choice_letter,
            true_false_token,
        },
        normalize::strip_code_fences,
    },
};

#[derive(Debug, Deserialize)]
struct RawPayload {
    questions: Vec<RawQuestion>,
    answer_key: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    number: u32,
    #[serde(rename = "type")]
    kind: QuestionKind,
    text: String,
    #[serde(default)]
    options: Option<RawOptions>,
}

/// Models emit options either as a list of `{letter, text}` or as `{"a": "..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOptions {
    List(Vec<RawOption>),
    Map(BTreeMap<String, String>),
}

#[derive(Debug, Deserialize)]
struct RawOption {
    letter: String,
    text: String,
}

impl RawOptions {
    fn into_pairs(self) -> Vec<(String, String)> {
        match self {
            RawOptions::List(list) => list.into_iter().map(|o| (o.letter, o.text)).collect(),
            RawOptions::Map(map) => map.into_iter().collect(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            RawOptions::List(list) => list.is_empty(),
            RawOptions::Map(map) => map.is_empty(),
        }
    }
}

/// Parse a JSON quiz. Any shape violation rejects the whole payload.
pub fn parse_structured(payload: &str) -> Result<Quiz> {
    let fail = |reason: String| TubequizError::MalformedQuizPayload {
        reason,
        raw: payload.to_string(),
    };

    let body = strip_code_fences(payload);
    let raw: RawPayload = serde_json::from_str(body).map_err(|e| fail(e.to_string()))?;
    if raw.questions.is_empty() {
        return Err(fail("payload has no questions".into()));
    }

    let mut seen = HashSet::new();
    let mut questions = Vec::with_capacity(raw.questions.len());
    for question in raw.questions {
        if question.number == 0 {
            return Err(fail("question numbers must start at 1".into()));
        }
        if !seen.insert(question.number) {
            return Err(fail(format!("question {} appears more than once", question.number)));
        }
        questions.push(validate_question(question).map_err(fail)?);
    }

    let answers = answers_by_number(raw.answer_key);
    let mut answer_key = AnswerKey::new();
    for question in &questions {
        let Some(value) = answers.get(&question.number) else {
            return Err(fail(format!(
                "answer_key has no entry for question {}",
                question.number
            )));
        };
        let token = validate_answer(question, value).map_err(fail)?;
        answer_key.insert(question.number, token);
    }

    debug!(questions = questions.len(), "structured quiz parsed");
    Ok(Quiz::assemble(questions, answer_key, Vec::new()))
}

fn validate_question(raw: RawQuestion) -> std::result::Result<Question, String> {
    let number = raw.number;
    let text = raw.text.trim();
    if text.is_empty() {
        return Err(format!("question {number} has no text"));
    }

    match raw.kind {
        QuestionKind::MultipleChoice => {
            let pairs = raw.options.map(RawOptions::into_pairs).unwrap_or_default();
            if pairs.len() != CHOICE_LETTERS.len() {
                return Err(format!(
                    "multiple_choice question {number} has {} options instead of 4",
                    pairs.len()
                ));
            }

            let mut options = Vec::with_capacity(pairs.len());
            for (letter, option_text) in pairs {
                let letter = parse_letter(&letter).ok_or_else(|| {
                    format!("question {number} has invalid option letter {letter:?}")
                })?;
                if options.iter().any(|o: &AnswerOption| o.letter == letter) {
                    return Err(format!("question {number} repeats option {letter}"));
                }
                options.push(AnswerOption::new(letter, option_text.trim()));
            }
            options.sort_by_key(|o| o.letter);
            Ok(Question::multiple_choice(number, text, options))
        }
        // Any options the model sent are replaced with the fixed pair.
        QuestionKind::TrueFalse => Ok(Question::true_false(number, text)),
        QuestionKind::FillBlank => {
            if raw.options.is_some_and(|o| !o.is_empty()) {
                return Err(format!("fill_blank question {number} must not have options"));
            }
            Ok(Question::fill_blank(number, text))
        }
    }
}

fn parse_letter(raw: &str) -> Option<char> {
    let mut chars = raw.trim().chars();
    let letter = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() || !CHOICE_LETTERS.contains(&letter) {
        return None;
    }
    Some(letter)
}

/// Non-numeric keys are ignored along with numbers no question uses.
fn answers_by_number(map: serde_json::Map<String, Value>) -> BTreeMap<u32, Value> {
    map.into_iter()
        .filter_map(|(key, value)| match key.trim().parse::<u32>() {
            Ok(number) => Some((number, value)),
            Err(_) => {
                debug!(key, "ignoring non-numeric answer_key entry");
                None
            }
        })
        .collect()
}

fn validate_answer(question: &Question, value: &Value) -> std::result::Result<String, String> {
    let number = question.number;
    let token = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(format!("answer for question {number} is not text")),
    };

    match question.kind {
        QuestionKind::MultipleChoice => choice_letter(&token)
            .filter(|letter| question.option(*letter).is_some())
            .map(String::from)
            .ok_or_else(|| format!("answer {token:?} for question {number} is not one of a-d")),
        QuestionKind::TrueFalse => true_false_token(&token)
            .map(String::from)
            .ok_or_else(|| format!("answer {token:?} for question {number} is not true/false")),
        QuestionKind::FillBlank => {
            if token.is_empty() {
                Err(format!("answer for question {number} is empty"))
            } else {
                Ok(token)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mc(number: u32) -> Value {
        serde_json::json!({
            "number": number,
            "type": "multiple_choice",
            "text": format!("Question {number}?"),
            "options": [
                {"letter": "a", "text": "first"},
                {"letter": "b", "text": "second"},
                {"letter": "c", "text": "third"},
                {"letter": "d", "text": "fourth"}
            ]
        })
    }

    fn ten_question_payload() -> String {
        let mut questions: Vec<Value> = (1..=6).map(mc).collect();
        questions.push(serde_json::json!({"number": 7, "type": "true_false", "text": "Rust is memory safe."}));
        questions.push(serde_json::json!({"number": 8, "type": "true_false", "text": "Rust has a GC."}));
        questions.push(serde_json::json!({"number": 9, "type": "fill_blank", "text": "Cargo is Rust's _____ manager."}));
        questions.push(serde_json::json!({"number": 10, "type": "fill_blank", "text": "A _____ owns a value."}));
        serde_json::json!({
            "questions": questions,
            "answer_key": {
                "1": "a", "2": "b", "3": "c", "4": "d", "5": "A", "6": "b) second",
                "7": "true", "8": false, "9": "package", "10": "variable"
            }
        })
        .to_string()
    }

    #[test]
    fn parses_ten_question_quiz() {
        let quiz = parse_structured(&ten_question_payload()).unwrap();
        assert_eq!(quiz.len(), 10);
        for question in quiz.questions() {
            assert!(quiz.answer_key().contains_key(&question.number));
        }
        assert!(quiz.is_complete());
        assert_eq!(quiz.answer_key()[&5], "a");
        assert_eq!(quiz.answer_key()[&6], "b");
        assert_eq!(quiz.answer_key()[&8], "false");
    }

    #[test]
    fn multiple_choice_has_letters_a_to_d() {
        let quiz = parse_structured(&ten_question_payload()).unwrap();
        for question in quiz
            .questions()
            .iter()
            .filter(|q| q.kind == QuestionKind::MultipleChoice)
        {
            let letters: Vec<char> = question.options.iter().map(|o| o.letter).collect();
            assert_eq!(letters, CHOICE_LETTERS.to_vec());
        }
    }

    #[test]
    fn parses_inside_json_fences() {
        let fenced = format!("```json\n{}\n```", ten_question_payload());
        assert_eq!(parse_structured(&fenced).unwrap().len(), 10);
    }

    #[test]
    fn truncated_json_is_malformed() {
        let payload = ten_question_payload();
        let truncated = &payload[..payload.len() / 2];
        match parse_structured(truncated) {
            Err(TubequizError::MalformedQuizPayload { raw, .. }) => assert_eq!(raw, truncated),
            other => panic!("expected MalformedQuizPayload, got {other:?}"),
        }
    }

    #[test]
    fn sorts_payload_order_and_accepts_option_maps() {
        let payload = r#"{
            "questions": [
                {"number": 2, "type": "fill_blank", "text": "The _____ checker", "options": []},
                {"number": 1, "type": "multiple_choice", "text": "Pick",
                 "options": {"d": "four", "c": "three", "B": "two", "a": "one"}}
            ],
            "answer_key": {"1": "b", "2": "borrow", "note": "ignored", "9": "ignored"}
        }"#;
        let quiz = parse_structured(payload).unwrap();
        assert_eq!(quiz.questions()[0].number, 1);
        assert_eq!(quiz.questions()[0].options[1], AnswerOption::new('b', "two"));
        assert_eq!(quiz.answer_key().len(), 2);
    }

    #[test]
    fn one_bad_question_rejects_the_quiz() {
        let cases = [
            // three options
            r#"{"questions": [{"number": 1, "type": "multiple_choice", "text": "Q",
                "options": [{"letter": "a", "text": "x"}, {"letter": "b", "text": "y"}, {"letter": "c", "text": "z"}]}],
                "answer_key": {"1": "a"}}"#,
            // repeated letter
            r#"{"questions": [{"number": 1, "type": "multiple_choice", "text": "Q",
                "options": [{"letter": "a", "text": "x"}, {"letter": "a", "text": "y"}, {"letter": "c", "text": "z"}, {"letter": "d", "text": "w"}]}],
                "answer_key": {"1": "a"}}"#,
            // unknown type
            r#"{"questions": [{"number": 1, "type": "essay", "text": "Q"}], "answer_key": {"1": "a"}}"#,
            // missing answer
            r#"{"questions": [{"number": 1, "type": "fill_blank", "text": "Q _____"}], "answer_key": {}}"#,
            // bad true/false answer
            r#"{"questions": [{"number": 1, "type": "true_false", "text": "Q"}], "answer_key": {"1": "maybe"}}"#,
            // duplicate number
            r#"{"questions": [{"number": 1, "type": "true_false", "text": "Q"}, {"number": 1, "type": "true_false", "text": "R"}],
                "answer_key": {"1": "true"}}"#,
            // missing root key
            r#"{"questions": []}"#,
            // no questions at all
            r#"{"questions": [], "answer_key": {}}"#,
            // empty text
            r#"{"questions": [{"number": 1, "type": "true_false", "text": "  "}], "answer_key": {"1": "true"}}"#,
        ];
        for payload in cases {
            assert!(
                matches!(
                    parse_structured(payload),
                    Err(TubequizError::MalformedQuizPayload { .. })
                ),
                "accepted: {payload}"
            );
        }
    }

    #[test]
    fn empty_question_list_keeps_raw_payload() {
        let payload = "```json\n{\"questions\": [], \"answer_key\": {}}\n```";
        let err = parse_structured(payload).unwrap_err();
        assert!(matches!(err, TubequizError::MalformedQuizPayload { .. }));
        assert_eq!(err.raw_payload(), Some(payload));
    }

    #[test]
    fn answer_letter_must_name_an_option() {
        let payload = ten_question_payload().replace(r#""1":"a""#, r#""1":"e""#);
        assert!(parse_structured(&payload).is_err());
    }

    #[test]
    fn prose_around_json_fails_closed() {
        let payload = format!("Here is your quiz:\n{}", ten_question_payload());
        assert!(parse_structured(&payload).is_err());
    }
}
