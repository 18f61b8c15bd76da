use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One respondent answer, parallel to a question in the form. The shape is
/// tagged so a mis-matched entry (wrong shape for the question type) can be
/// detected and treated as unanswered instead of failing the submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionAnswer {
    /// item name -> chosen category; items missing from the map are unplaced.
    Categorize {
        #[serde(default)]
        placements: HashMap<String, String>,
    },
    /// The full sentence the respondent assembled.
    Cloze {
        #[serde(default)]
        text: String,
    },
    /// sub-question id -> answer.
    Comprehension {
        #[serde(default)]
        answers: HashMap<String, SubAnswer>,
    },
}

/// Answer to one comprehension sub-question: a free-text string, a single
/// option id, or a set of option ids. The wire shape disambiguates on its own
/// (string vs. array), so no tag is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubAnswer {
    Many(Vec<String>),
    One(String),
}

#[derive(Debug, Deserialize)]
pub struct SubmitResponseRequest {
    /// One entry per question, by position. `null` or a missing trailing
    /// entry means the question was left unanswered.
    #[serde(default)]
    pub answers: Vec<Option<QuestionAnswer>>,
    #[serde(rename = "idempotencyKey", alias = "idempotency_key", default)]
    pub idempotency_key: Option<String>,
}
