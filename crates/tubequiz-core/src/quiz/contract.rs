use std::fmt;

/// Output shape the quiz prompt demands from the model. The generator records
/// which one it used so the matching parser runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizContract {
    /// `Question N:` blocks followed by an `ANSWER KEY:` section.
    FreeText,
    /// A single JSON object with `questions` and `answer_key`.
    #[default]
    Structured,
}

static FREE_TEXT_INSTRUCTION: &str = r#"Please generate a quiz based on the above YouTube transcript with exactly 10 questions total, divided as follows:
- 6 multiple choice questions (a, b, c, d options)
- 2 true/false questions
- 2 fill-in-the-blank questions

Format the quiz EXACTLY as follows, with NO ADDITIONAL TEXT before Question 1:
Question 1: [question text]
a) [option text]
b) [option text]
c) [option text]
d) [option text]

Question 2: [question text]
a) [option text]
... and so on

For true/false questions:
Question X: [statement]
True
False

For fill-in-the-blank:
Question X: [sentence with _____ for the blank]

After all questions, include 'ANSWER KEY:' followed by the answers in the format:
1. [correct answer]
2. [correct answer]
And so on for all 10 questions.
For multiple choice answer with the option letter only, for true/false answer True or False."#;

static STRUCTURED_INSTRUCTION: &str = r#"Please generate a quiz based on the above YouTube transcript with exactly 10 questions total, divided as follows:
- 6 multiple choice questions with exactly 4 options lettered a, b, c, d
- 2 true/false questions
- 2 fill-in-the-blank questions, each with _____ marking the blank

Output ONLY a single JSON object with this exact structure (no markdown, no explanation, no text before or after it):
{
  "questions": [
    {"number": 1, "type": "multiple_choice", "text": "Question text", "options": [
      {"letter": "a", "text": "Option text"},
      {"letter": "b", "text": "Option text"},
      {"letter": "c", "text": "Option text"},
      {"letter": "d", "text": "Option text"}
    ]},
    {"number": 7, "type": "true_false", "text": "Statement"},
    {"number": 9, "type": "fill_blank", "text": "Sentence with _____ for the blank"}
  ],
  "answer_key": {"1": "a", "7": "true", "9": "missing word"}
}

Rules:
- Number questions 1 to 10
- "type" is one of "multiple_choice", "true_false", "fill_blank"
- Only multiple_choice questions have "options"
- answer_key has one entry per question: the option letter for multiple_choice, "true" or "false" for true_false, the missing word or phrase for fill_blank
- Output ONLY the JSON, nothing else"#;

impl QuizContract {
    pub fn name(&self) -> &'static str {
        match self {
            QuizContract::FreeText => "free-text",
            QuizContract::Structured => "structured",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            QuizContract::FreeText => FREE_TEXT_INSTRUCTION,
            QuizContract::Structured => STRUCTURED_INSTRUCTION,
        }
    }

    /// Transcript followed by the contract instruction
    pub fn build_prompt(&self, transcript_text: &str) -> String {
        format!("{}\n\n{}", transcript_text, self.instruction())
    }
}

impl fmt::Display for QuizContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
