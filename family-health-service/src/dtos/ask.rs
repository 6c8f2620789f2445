use serde::{Deserialize, Serialize};

pub const MAX_QUESTION_CHARS: usize = 2000;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Missing and `null` are treated like a blank question.
    #[serde(default)]
    pub question: Option<String>,
}

impl AskRequest {
    /// The trimmed question, or why it was rejected.
    pub fn question(&self) -> Result<&str, String> {
        let question = self.question.as_deref().unwrap_or_default().trim();
        if question.is_empty() {
            return Err("Question is required".to_string());
        }
        if question.chars().count() > MAX_QUESTION_CHARS {
            return Err(format!(
                "Question must be at most {} characters",
                MAX_QUESTION_CHARS
            ));
        }
        Ok(question)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}
