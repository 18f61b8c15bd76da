use chrono::{LocalResult, TimeZone, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::question::Question;

#[derive(Debug, Serialize, Deserialize)]
pub struct FormDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "formTitle", alias = "form_title")]
    pub form_title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(rename = "createdAt", alias = "created_at")]
    pub created_at: mongodb::bson::DateTime,
    #[serde(rename = "updatedAt", alias = "updated_at")]
    pub updated_at: mongodb::bson::DateTime,
}

/// List view of a form: no question payloads, just enough for a dashboard.
#[derive(Debug, Serialize)]
pub struct FormSummary {
    pub id: String,
    #[serde(rename = "formTitle")]
    pub form_title: String,
    pub question_count: usize,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl FormSummary {
    pub fn from_doc(doc: &FormDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            form_title: doc.form_title.clone(),
            question_count: doc.questions.len(),
            updated_at: bson_to_iso(&doc.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FormDetail {
    pub id: String,
    #[serde(rename = "formTitle")]
    pub form_title: String,
    pub questions: Vec<Question>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl FormDetail {
    pub fn from_doc(doc: &FormDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            form_title: doc.form_title.clone(),
            questions: doc.questions.clone(),
            created_at: bson_to_iso(&doc.created_at),
            updated_at: bson_to_iso(&doc.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFormRequest {
    #[serde(rename = "formTitle")]
    #[validate(length(min = 5, message = "Form title should be at least 5 characters long"))]
    pub form_title: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFormRequest {
    #[serde(rename = "formTitle")]
    #[validate(length(min = 5, message = "Form title should be at least 5 characters long"))]
    pub form_title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

pub fn bson_to_iso(dt: &mongodb::bson::DateTime) -> String {
    match Utc.timestamp_millis_opt(dt.timestamp_millis()) {
        LocalResult::Single(value) => value.to_rfc3339(),
        LocalResult::Ambiguous(first, _) => first.to_rfc3339(),
        LocalResult::None => Utc.timestamp_millis_opt(0).unwrap().to_rfc3339(),
    }
}
