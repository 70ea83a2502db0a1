//! Interactive quiz loop.

use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::console::Console;
use crate::model::QuizQuestion;

/// Typed at the answer prompt to end the quiz early (any case).
pub const EXIT_SENTINEL: &str = "EXIT";

const ANSWER_PROMPT: &str = "Your answer (A/B/C/D or type 'exit' to quit): ";

/// Tally of one quiz run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    /// Questions shown, including the one the user exited on.
    pub asked: usize,
    /// Questions that received a graded answer.
    pub answered: usize,
    pub correct: usize,
    /// The user typed the exit sentinel or input ended.
    pub exited: bool,
}

impl QuizOutcome {
    pub fn score_line(&self) -> String {
        format!("Score: {}/{} correct", self.correct, self.answered)
    }
}

/// Ask each question in turn and grade the typed label.
pub fn run_quiz<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    questions: &[QuizQuestion],
) -> io::Result<QuizOutcome> {
    let mut outcome = QuizOutcome::default();
    console.say("Quiz Started!")?;

    for (idx, question) in questions.iter().enumerate() {
        outcome.asked += 1;
        console.say("")?;
        console.say(format!("Q{}: {}", idx + 1, question.question))?;
        for option in question.options() {
            console.say(option.to_string())?;
        }

        let Some(response) = console.prompt(ANSWER_PROMPT)? else {
            outcome.exited = true;
            break;
        };
        let response = response.trim().to_uppercase();
        if response == EXIT_SENTINEL {
            outcome.exited = true;
            break;
        }

        outcome.answered += 1;
        if question.is_correct(&response) {
            outcome.correct += 1;
            console.say("Correct!")?;
        } else {
            console.say(format!("Incorrect! Correct answer: {}", question.answer()))?;
        }
    }

    console.say("")?;
    console.say("Quiz Finished!")?;
    console.say(outcome.score_line())?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entity, OptionLabel, QuestionOrigin};

    fn questions(n: usize) -> Vec<QuizQuestion> {
        (0..n)
            .map(|i| {
                QuizQuestion::new(
                    format!("Question {i}?"),
                    ["w".into(), "x".into(), "right".into(), "z".into()],
                    OptionLabel::C,
                    QuestionOrigin::Generated,
                )
            })
            .collect()
    }

    fn run(input: &str, qs: &[QuizQuestion]) -> (QuizOutcome, String) {
        let mut console = Console::new(input.as_bytes(), Vec::new());
        let outcome = run_quiz(&mut console, qs).unwrap();
        (outcome, String::from_utf8(console.into_output()).unwrap())
    }

    #[test]
    fn grades_each_answer() {
        let (outcome, out) = run("c\nA\n C \n", &questions(3));
        assert_eq!(
            outcome,
            QuizOutcome {
                asked: 3,
                answered: 3,
                correct: 2,
                exited: false
            }
        );
        assert!(out.contains("Q1: Question 0?"));
        assert!(out.contains("C) right"));
        assert!(out.contains("Incorrect! Correct answer: C"));
        assert!(out.contains("Score: 2/3 correct"));
    }

    #[test]
    fn exit_ends_quiz_at_any_position() {
        for position in 0..4 {
            let mut lines: Vec<&str> = vec!["c"; position];
            lines.push("exit");
            lines.extend(["c"; 3]);
            let input = lines.join("\n") + "\n";

            let (outcome, out) = run(&input, &questions(4));
            assert!(outcome.exited, "position {position}");
            assert_eq!(outcome.asked, position + 1);
            assert_eq!(outcome.answered, position);
            assert!(!out.contains(&format!("Q{}:", position + 2)));
            assert!(out.contains("Quiz Finished!"));
        }
    }

    #[test]
    fn exit_is_case_insensitive() {
        let (outcome, _) = run("ExIt\n", &questions(2));
        assert!(outcome.exited);
        assert_eq!(outcome.answered, 0);
    }

    #[test]
    fn end_of_input_ends_quiz() {
        let (outcome, out) = run("c\n", &questions(3));
        assert!(outcome.exited);
        assert_eq!(outcome.asked, 2);
        assert_eq!(outcome.correct, 1);
        assert!(out.contains("Quiz Finished!"));
    }

    #[test]
    fn placeholder_answer_is_a() {
        let qs = vec![QuizQuestion::placeholder(&Entity::from("Osmosis"))];
        let (outcome, out) = run("a\n", &qs);
        assert_eq!(outcome.correct, 1);
        assert!(out.contains("Q1: Osmosis"));
        assert!(out.contains("D) N/A"));
    }

    #[test]
    fn empty_quiz_still_finishes() {
        let (outcome, out) = run("", &[]);
        assert_eq!(outcome, QuizOutcome::default());
        assert!(out.contains("Quiz Finished!"));
    }
}
