use console::{Term, style};
use tubequiz_core::{Question, QuestionKind, Quiz, QuizPresenter, Result, SubmittedAnswers};

/// Terminal form: one prompt per question, then an explicit submit.
pub struct ConsolePresenter {
    term: Term,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn ask(&self, prompt: &str) -> Result<String> {
        self.term.write_str(&format!("{} ", style(prompt).dim()))?;
        Ok(self.term.read_line()?.trim().to_string())
    }

    fn ask_choice(&self, question: &Question) -> Result<Option<String>> {
        for option in &question.options {
            self.term
                .write_line(&format!("  {}) {}", style(option.letter).cyan(), option.text))?;
        }
        loop {
            let input = self.ask(&format!("Select your answer for question {}:", question.number))?;
            if input.is_empty() {
                return Ok(None);
            }
            if let Some(token) = choice_token(question, &input) {
                return Ok(Some(token));
            }
            let letters: Vec<String> = question.options.iter().map(|o| o.letter.to_string()).collect();
            self.term.write_line(&format!(
                "{} choose one of {}",
                style("!").yellow().bold(),
                letters.join(", ")
            ))?;
        }
    }
}

impl QuizPresenter for ConsolePresenter {
    fn present(&mut self, quiz: &Quiz) -> Result<Option<SubmittedAnswers>> {
        self.term
            .write_line(&format!("\n{}", style("YouTube Video Quiz").cyan().bold()))?;
        self.term.write_line(&format!(
            "{}\n",
            style("Answer the questions and submit to see your score. Leave an answer empty to skip it.").dim()
        ))?;

        let mut answers = SubmittedAnswers::new();
        for question in quiz.questions() {
            self.term.write_line(&format!(
                "{} {}",
                style(format!("Question {}:", question.number)).bold(),
                question.text
            ))?;

            let answer = match question.kind {
                QuestionKind::MultipleChoice if question.is_missing_options() => {
                    self.term.write_line(&format!(
                        "{} No options found for question {}",
                        style("!").yellow().bold(),
                        question.number
                    ))?;
                    None
                }
                QuestionKind::MultipleChoice | QuestionKind::TrueFalse => self.ask_choice(question)?,
                QuestionKind::FillBlank => {
                    let input = self.ask(&format!("Your answer for question {}:", question.number))?;
                    (!input.is_empty()).then_some(input)
                }
            };
            if let Some(answer) = answer {
                answers.insert(question.number, answer);
            }
            self.term.write_line("")?;
        }

        let submit = self.ask("Submit quiz? [Y/n]")?;
        if matches!(submit.to_lowercase().as_str(), "n" | "no") {
            return Ok(None);
        }
        Ok(Some(answers))
    }
}

/// Accept an option letter or the option text itself (`true`, `Paris`).
fn choice_token(question: &Question, input: &str) -> Option<String> {
    let mut chars = input.chars();
    if let (Some(letter), None) = (chars.next(), chars.next()) {
        return question.answer_token(letter);
    }
    question
        .options
        .iter()
        .find(|opt| opt.text.eq_ignore_ascii_case(input))
        .and_then(|opt| question.answer_token(opt.letter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubequiz_core::quiz::AnswerOption;

    #[test]
    fn true_false_accepts_letters_and_words() {
        let q = Question::true_false(1, "Rust has a GC.");
        assert_eq!(choice_token(&q, "b").as_deref(), Some("false"));
        assert_eq!(choice_token(&q, "TRUE").as_deref(), Some("true"));
        assert_eq!(choice_token(&q, "x"), None);
    }

    #[test]
    fn multiple_choice_returns_letter() {
        let q = Question::multiple_choice(
            2,
            "Capital of France?",
            vec![
                AnswerOption::new('a', "London"),
                AnswerOption::new('b', "Paris"),
                AnswerOption::new('c', "Rome"),
                AnswerOption::new('d', "Berlin"),
            ],
        );
        assert_eq!(choice_token(&q, "C").as_deref(), Some("c"));
        assert_eq!(choice_token(&q, "paris").as_deref(), Some("b"));
        assert_eq!(choice_token(&q, "Madrid"), None);
    }
}
