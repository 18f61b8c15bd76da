use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::answer::SubAnswer;

/// Per-question scoring outcome. Scores are percentages in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScoreResult {
    Categorize {
        score: f64,
        detail: BTreeMap<String, ItemScore>,
    },
    Cloze {
        score: f64,
        #[serde(rename = "isCorrect")]
        is_correct: bool,
        #[serde(rename = "userAnswer")]
        user_answer: Option<String>,
        #[serde(rename = "correctAnswer")]
        correct_answer: String,
    },
    Comprehension {
        score: f64,
        detail: BTreeMap<String, SubScore>,
    },
    /// Question types the scorer does not recognize score zero.
    Unknown { score: f64 },
}

impl ScoreResult {
    pub fn score(&self) -> f64 {
        match self {
            ScoreResult::Categorize { score, .. } => *score,
            ScoreResult::Cloze { score, .. } => *score,
            ScoreResult::Comprehension { score, .. } => *score,
            ScoreResult::Unknown { score } => *score,
        }
    }
}

/// Breakdown for one categorize item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemScore {
    #[serde(rename = "correctCategory")]
    pub correct_category: String,
    #[serde(rename = "userCategory")]
    pub user_category: Option<String>,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

/// Breakdown for one comprehension sub-question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubScore {
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
    #[serde(rename = "userAnswer")]
    pub user_answer: Option<SubAnswer>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: Option<SubAnswer>,
}

/// Full scoring report returned to the caller after a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub form_id: String,
    pub results: Vec<ScoreResult>,
    /// Average of the per-question scores, 0 for an empty form.
    pub total_score: f64,
    pub submitted_at: DateTime<Utc>,
}

/// What gets persisted after scoring. Raw answers are deliberately left out:
/// they live only for the duration of the filling session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: String,
    pub form_id: String,
    pub results: Vec<ScoreResult>,
    pub total_score: f64,
    pub submitted_at: DateTime<Utc>,
}

impl ResponseRecord {
    pub fn from_report(report: &ScoreReport) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            form_id: report.form_id.clone(),
            results: report.results.clone(),
            total_score: report.total_score,
            submitted_at: report.submitted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_result_serializes_with_type_tag() {
        let result = ScoreResult::Cloze {
            score: 100.0,
            is_correct: true,
            user_answer: Some("sky".to_string()),
            correct_answer: "sky".to_string(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "cloze");
        assert_eq!(json["isCorrect"], true);
        assert_eq!(json["score"], 100.0);
    }

    #[test]
    fn record_drops_nothing_but_carries_no_answers() {
        let report = ScoreReport {
            form_id: "abc".to_string(),
            results: vec![ScoreResult::Unknown { score: 0.0 }],
            total_score: 0.0,
            submitted_at: Utc::now(),
        };

        let record = ResponseRecord::from_report(&report);
        assert_eq!(record.form_id, report.form_id);
        assert_eq!(record.results.len(), 1);
        assert!(!record.id.is_empty());
    }
}
