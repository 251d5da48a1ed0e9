use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::QuestionError;
use quiz_core::scoring;
use quiz_core::{AnswerSlot, Question, QuestionId, QuizResult};

use crate::error::ApiError;
use crate::scorer::Scorer;
use crate::source::{LoadedQuestions, QuestionSource};

/// Delay the bundled bank adds before serving questions when simulating a network.
pub const SIMULATED_QUESTION_LATENCY: Duration = Duration::from_millis(500);
/// Delay the bundled bank adds before returning a score when simulating a network.
pub const SIMULATED_SCORING_LATENCY: Duration = Duration::from_millis(1000);

/// (prompt, options, correct, category, difficulty, explanation)
type Entry = (&'static str, [&'static str; 4], usize, &'static str, &'static str, &'static str);

const FULL_STACK: [Entry; 10] = [
    (
        "What is React primarily used for?",
        ["Backend API development", "Building user interfaces", "Database management", "Server configuration"],
        1,
        "frontend",
        "easy",
        "React is a JavaScript library for building user interfaces, particularly web applications.",
    ),
    (
        "Which database is commonly used with Node.js applications?",
        ["Oracle", "MongoDB", "MySQL", "All of the above"],
        3,
        "backend",
        "medium",
        "Node.js can work with various databases including MongoDB, MySQL, PostgreSQL, and Oracle.",
    ),
    (
        "What does API stand for?",
        ["Application Programming Interface", "Advanced Programming Integration", "Automated Program Interaction", "Application Process Interface"],
        0,
        "general",
        "easy",
        "API stands for Application Programming Interface, which allows different software applications to communicate.",
    ),
    (
        "Which HTTP method is used to retrieve data?",
        ["POST", "GET", "PUT", "DELETE"],
        1,
        "backend",
        "easy",
        "GET is the HTTP method used to retrieve/fetch data from a server.",
    ),
    (
        "What is the purpose of useState in React?",
        ["To handle routing", "To manage component state", "To make API calls", "To style components"],
        1,
        "frontend",
        "medium",
        "useState is a React hook that allows you to add state to functional components.",
    ),
    (
        "Which of the following is a NoSQL database?",
        ["PostgreSQL", "MySQL", "MongoDB", "SQLite"],
        2,
        "database",
        "medium",
        "MongoDB is a NoSQL (document-based) database, while the others are SQL databases.",
    ),
    (
        "What does CSS stand for?",
        ["Computer Style Sheets", "Cascading Style Sheets", "Creative Style Sheets", "Coded Style Sheets"],
        1,
        "frontend",
        "easy",
        "CSS stands for Cascading Style Sheets, used for styling web pages.",
    ),
    (
        "Which JavaScript framework is known for its virtual DOM?",
        ["Angular", "Vue.js", "React", "Ember.js"],
        2,
        "frontend",
        "medium",
        "React is famous for introducing and popularizing the virtual DOM concept.",
    ),
    (
        "What is the default port for HTTP?",
        ["443", "8080", "80", "3000"],
        2,
        "general",
        "easy",
        "HTTP uses port 80 by default, while HTTPS uses port 443.",
    ),
    (
        "Which of these is NOT a JavaScript data type?",
        ["String", "Boolean", "Float", "Number"],
        2,
        "general",
        "medium",
        "JavaScript doesn't have a 'Float' data type. It uses 'Number' for all numeric values.",
    ),
];

/// In-process question bank that also grades submissions against itself.
#[derive(Clone, Debug)]
pub struct BundledQuestionBank {
    questions: Arc<[Question]>,
    question_latency: Duration,
    scoring_latency: Duration,
}

impl BundledQuestionBank {
    /// The built-in ten-question full-stack development quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if a bundled entry fails validation.
    pub fn full_stack() -> Result<Self, QuestionError> {
        let questions = FULL_STACK
            .iter()
            .zip(1_u64..)
            .map(|(&(prompt, options, correct, category, difficulty, explanation), id)| {
                Question::new(
                    QuestionId::new(id),
                    prompt,
                    options.iter().map(|o| (*o).to_string()).collect(),
                    correct,
                    category,
                    difficulty,
                    explanation,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_questions(questions))
    }

    #[must_use]
    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self {
            questions: questions.into(),
            question_latency: Duration::ZERO,
            scoring_latency: Duration::ZERO,
        }
    }

    /// Pause before each response, the way a remote API would.
    #[must_use]
    pub fn with_latency(mut self, questions: Duration, scoring: Duration) -> Self {
        self.question_latency = questions;
        self.scoring_latency = scoring;
        self
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

async fn pause(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

#[async_trait]
impl QuestionSource for BundledQuestionBank {
    async fn get_questions(&self) -> Result<LoadedQuestions, ApiError> {
        pause(self.question_latency).await;
        Ok(LoadedQuestions::healthy(self.questions.to_vec()))
    }
}

#[async_trait]
impl Scorer for BundledQuestionBank {
    async fn submit_quiz(
        &self,
        answers: &[AnswerSlot],
        time_spent_secs: u32,
    ) -> Result<QuizResult, ApiError> {
        pause(self.scoring_latency).await;
        Ok(scoring::grade(&self.questions, answers, time_spent_secs)?)
    }
}
