use std::sync::LazyLock;

use regex::Regex;

use crate::{
    quiz::{GradeResult, QuestionKind, Quiz},
    types::Transcript,
};

static TIMESTAMP_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\d+:\d+:\d+\.\d+ --> \d+:\d+:\d+\.\d+\] ?").expect("timestamp marker pattern")
});

/// Format seconds as HH:MM:SS.ss
pub fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let hours = (seconds / 3600.0) as u32;
    let minutes = ((seconds % 3600.0) / 60.0) as u32;
    let secs = seconds % 60.0;
    format!("{:02}:{:02}:{:05.2}", hours, minutes, secs)
}

/// Format transcript segments as `[start --> end] text` lines
pub fn format_transcript_with_timestamps(transcript: &Transcript) -> String {
    transcript
        .segments
        .iter()
        .map(|seg| {
            format!(
                "[{} --> {}] {}",
                format_time(seg.start),
                format_time(seg.end()),
                seg.text.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove `[start --> end]` markers, leaving the spoken text
pub fn strip_timestamps(text: &str) -> String {
    TIMESTAMP_MARKER.replace_all(text, "").into_owned()
}

/// Format a quiz as markdown, answer key excluded
pub fn format_quiz_readable(quiz: &Quiz) -> String {
    let mut output = String::new();

    for question in quiz.questions() {
        output.push_str(&format!("**Question {}:** {}\n", question.number, question.text));
        match question.kind {
            QuestionKind::MultipleChoice if question.is_missing_options() => {
                output.push_str(&format!("  (no options found for question {})\n", question.number));
            }
            QuestionKind::MultipleChoice | QuestionKind::TrueFalse => {
                for option in &question.options {
                    output.push_str(&format!("  {}) {}\n", option.letter, option.text));
                }
            }
            QuestionKind::FillBlank => {}
        }
        output.push('\n');
    }

    output
}

/// One line per verdict plus the score, e.g. `Question 2: Incorrect - Correct answer: B) Paris`
pub fn format_grade_report(result: &GradeResult) -> String {
    let mut output = format!("Your Score: {}/{}\n\n", result.score, result.total);

    for verdict in &result.verdicts {
        if verdict.correct {
            output.push_str(&format!("Question {}: Correct!\n", verdict.number));
            continue;
        }
        match &verdict.correct_answer_display {
            Some(display) => output.push_str(&format!(
                "Question {}: Incorrect - Correct answer: {}\n",
                verdict.number, display
            )),
            None => output.push_str(&format!(
                "Question {}: Incorrect - no answer key entry\n",
                verdict.number
            )),
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        quiz::{SubmittedAnswers, grade, parse_free_text},
        types::Segment,
    };

    #[test]
    fn time_has_hours_minutes_and_fractional_seconds() {
        assert_eq!(format_time(0.0), "00:00:00.00");
        assert_eq!(format_time(65.5), "00:01:05.50");
        assert_eq!(format_time(3725.25), "01:02:05.25");
    }

    #[test]
    fn timestamps_round_trip_to_plain_text() {
        let transcript = Transcript {
            video_id: "dQw4w9WgXcQ".into(),
            language: "en".into(),
            segments: vec![
                Segment {
                    text: "hello".into(),
                    start: 0.0,
                    duration: 1.5,
                },
                Segment {
                    text: "world".into(),
                    start: 61.0,
                    duration: 2.0,
                },
            ],
        };
        let with_timestamps = format_transcript_with_timestamps(&transcript);
        assert_eq!(
            with_timestamps,
            "[00:00:00.00 --> 00:00:01.50] hello\n[00:01:01.00 --> 00:01:03.00] world"
        );
        assert_eq!(strip_timestamps(&with_timestamps), "hello\nworld");
    }

    #[test]
    fn quiz_rendering_hides_answers_and_flags_missing_options() {
        let quiz = parse_free_text(
            "Question 1: Pick a tool\nnone listed\nQuestion 2: Rust is safe.\nTrue\nFalse\nANSWER KEY:\n1. a\n2. true",
        );
        let text = format_quiz_readable(&quiz);
        assert!(text.contains("**Question 1:** Pick a tool"));
        assert!(text.contains("(no options found for question 1)"));
        assert!(text.contains("  a) True\n  b) False"));
        assert!(!text.contains("ANSWER KEY"));
    }

    #[test]
    fn grade_report_lists_verdicts() {
        let quiz = parse_free_text(
            "Question 1: Capital of France?\na) London\nb) Paris\nc) Rome\nd) Berlin\nQuestion 2: A _____ barks.\nANSWER KEY:\n1. b\n2. dog",
        );
        let answers = SubmittedAnswers::from([(1, "c".to_string()), (2, "Dog".to_string())]);
        let report = format_grade_report(&grade(&quiz, &answers));
        assert!(report.starts_with("Your Score: 1/2"));
        assert!(report.contains("Question 1: Incorrect - Correct answer: B) Paris"));
        assert!(report.contains("Question 2: Correct!"));
    }
}
