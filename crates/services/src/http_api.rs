use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quiz_core::{AnswerSlot, Question, QuestionId, QuestionReview, QuizResult};

use crate::config::QuizApiConfig;
use crate::error::ApiError;
use crate::scorer::Scorer;
use crate::source::{LoadedQuestions, QuestionSource};

const QUESTIONS_PATH: &str = "quiz/questions";
const SUBMIT_PATH: &str = "quiz/submit";

/// Question source and scorer backed by a remote quiz API.
#[derive(Clone, Debug)]
pub struct HttpQuizApi {
    client: Client,
    config: QuizApiConfig,
}

impl HttpQuizApi {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: QuizApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
        fallback_message: &str,
    ) -> Result<T, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        let envelope: Envelope<T> = response.json().await?;
        envelope.into_data(fallback_message)
    }
}

#[async_trait]
impl QuestionSource for HttpQuizApi {
    #[instrument(level = "debug", skip(self), fields(base = %self.config.base_url))]
    async fn get_questions(&self) -> Result<LoadedQuestions, ApiError> {
        let response = self
            .client
            .get(self.config.endpoint(QUESTIONS_PATH))
            .send()
            .await?;
        let data: QuestionsData =
            Self::read_envelope(response, "Failed to fetch questions").await?;
        Ok(LoadedQuestions::healthy(data.into_questions()?))
    }
}

#[async_trait]
impl Scorer for HttpQuizApi {
    #[instrument(level = "debug", skip(self, answers), fields(answers = answers.len()))]
    async fn submit_quiz(
        &self,
        answers: &[AnswerSlot],
        time_spent_secs: u32,
    ) -> Result<QuizResult, ApiError> {
        let payload = SubmitRequest {
            answers,
            time_spent: time_spent_secs,
        };
        let response = self
            .client
            .post(self.config.endpoint(SUBMIT_PATH))
            .json(&payload)
            .send()
            .await?;
        let data: ResultDto = Self::read_envelope(response, "Failed to submit quiz").await?;
        Ok(data.into())
    }
}

//
// ─── WIRE FORMAT ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

impl<T> Envelope<T> {
    fn into_data(self, fallback_message: &str) -> Result<T, ApiError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(ApiError::Rejected(
                self.error
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| fallback_message.to_string()),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuestionsData {
    questions: Vec<QuestionDto>,
}

impl QuestionsData {
    fn into_questions(self) -> Result<Vec<Question>, ApiError> {
        if self.questions.is_empty() {
            return Err(ApiError::Empty);
        }
        self.questions
            .into_iter()
            .map(|dto| {
                Question::new(
                    QuestionId::new(dto.id),
                    dto.question,
                    dto.options,
                    dto.correct_answer,
                    dto.category,
                    dto.difficulty,
                    dto.explanation,
                )
                .map_err(ApiError::from)
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct QuestionDto {
    id: u64,
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    #[serde(default)]
    category: String,
    #[serde(default)]
    difficulty: String,
    #[serde(default)]
    explanation: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    answers: &'a [AnswerSlot],
    time_spent: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultDto {
    score: u32,
    total_questions: u32,
    percentage: u32,
    passed: bool,
    time_spent: u32,
    #[serde(default)]
    detailed_results: Vec<DetailDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailDto {
    question_id: u64,
    question: String,
    options: Vec<String>,
    user_answer: Option<usize>,
    correct_answer: usize,
    is_correct: bool,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    category: String,
}

impl From<ResultDto> for QuizResult {
    fn from(dto: ResultDto) -> Self {
        Self {
            score: dto.score,
            total_questions: dto.total_questions,
            percentage: dto.percentage,
            passed: dto.passed,
            time_spent_secs: dto.time_spent,
            details: dto
                .detailed_results
                .into_iter()
                .map(|detail| QuestionReview {
                    question_id: QuestionId::new(detail.question_id),
                    prompt: detail.question,
                    options: detail.options,
                    chosen: detail.user_answer,
                    correct_answer: detail.correct_answer,
                    is_correct: detail.is_correct,
                    explanation: detail.explanation,
                    category: detail.category,
                })
                .collect(),
        }
    }
}
