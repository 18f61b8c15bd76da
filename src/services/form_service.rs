use crate::metrics::{
    record_cache_hit, record_cache_miss, FORMS_CREATED_TOTAL, FORMS_SAVED_TOTAL,
    RESPONSES_SCORED_TOTAL,
};
use crate::models::answer::SubmitResponseRequest;
use crate::models::form::{CreateFormRequest, FormDetail, FormDocument, FormSummary, UpdateFormRequest};
use crate::models::question::{Question, QuestionEdit};
use crate::models::score::{ResponseRecord, ScoreReport};
use anyhow::{Context, Result};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::Database;
use redis::aio::ConnectionManager;

use super::{scoring, validation};
use crate::utils::retry::{retry_async_with_config, RetryConfig};

const FORMS_COLLECTION: &str = "forms";
const RESPONSES_COLLECTION: &str = "form_responses";

pub struct FormService {
    mongo: Database,
    redis: ConnectionManager,
}

impl FormService {
    pub fn new(mongo: Database, redis: ConnectionManager) -> Self {
        Self { mongo, redis }
    }

    fn forms(&self) -> mongodb::Collection<FormDocument> {
        self.mongo.collection(FORMS_COLLECTION)
    }

    pub async fn create_form(&self, req: &CreateFormRequest) -> Result<FormDetail> {
        let now = BsonDateTime::now();
        let doc = FormDocument {
            id: ObjectId::new(),
            form_title: req.form_title.clone(),
            questions: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.forms()
            .insert_one(&doc)
            .await
            .context("Failed to insert form")?;

        FORMS_CREATED_TOTAL.with_label_values(&["ok"]).inc();
        tracing::info!("Created form id={}", doc.id.to_hex());

        Ok(FormDetail::from_doc(&doc))
    }

    pub async fn list_forms(&self) -> Result<Vec<FormSummary>> {
        let cursor = self
            .forms()
            .find(doc! {})
            .sort(doc! { "updatedAt": -1 })
            .await
            .context("Failed to query forms")?;

        let docs: Vec<FormDocument> = cursor
            .try_collect()
            .await
            .context("Failed to read forms cursor")?;

        Ok(docs.iter().map(FormSummary::from_doc).collect())
    }

    pub async fn get_form(&self, form_id: &str) -> Result<FormDetail> {
        let doc = self.load_form(form_id).await?;
        Ok(FormDetail::from_doc(&doc))
    }

    /// Full save of a form: title plus the complete question list. The whole
    /// list is validated first; nothing is written when any question fails.
    pub async fn update_form(&self, form_id: &str, req: &UpdateFormRequest) -> Result<FormDetail> {
        let oid = parse_form_id(form_id)?;

        validation::validate_questions(&req.questions).map_err(anyhow::Error::new)?;

        let questions_bson =
            mongodb::bson::to_bson(&req.questions).context("Failed to serialize questions")?;
        let now = BsonDateTime::now();

        let result = self
            .forms()
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": {
                    "formTitle": &req.form_title,
                    "questions": questions_bson,
                    "updatedAt": now,
                }},
            )
            .await
            .context("Failed to update form")?;

        if result.matched_count == 0 {
            anyhow::bail!("Form {} not found", form_id);
        }

        FORMS_SAVED_TOTAL.with_label_values(&["ok"]).inc();
        tracing::info!("Saved form id={} ({} questions)", form_id, req.questions.len());

        self.get_form(form_id).await
    }

    pub async fn delete_form(&self, form_id: &str) -> Result<()> {
        let oid = parse_form_id(form_id)?;

        let result = self
            .forms()
            .delete_one(doc! { "_id": oid })
            .await
            .context("Failed to delete form")?;

        if result.deleted_count == 0 {
            anyhow::bail!("Form {} not found", form_id);
        }

        tracing::info!("Deleted form id={}", form_id);
        Ok(())
    }

    /// Saves one question in place while the form is being edited. Unlike the
    /// full-form save this applies the stricter per-question checks.
    pub async fn save_question(
        &self,
        form_id: &str,
        question_id: &str,
        question: Question,
    ) -> Result<FormDetail> {
        if question.id() != question_id {
            anyhow::bail!("Question id mismatch");
        }

        validation::validate_question_save(&question).map_err(anyhow::Error::new)?;

        let mut form = self.load_form(form_id).await?;
        match form.questions.iter_mut().find(|q| q.id() == question_id) {
            Some(slot) => *slot = question,
            None => form.questions.push(question),
        }

        self.persist_questions(&form).await?;

        FORMS_SAVED_TOTAL.with_label_values(&["ok"]).inc();
        Ok(FormDetail::from_doc(&form))
    }

    /// Applies one editing gesture to one question. The gesture either lands
    /// fully or leaves the stored question untouched.
    pub async fn edit_question(
        &self,
        form_id: &str,
        question_id: &str,
        edit: QuestionEdit,
    ) -> Result<Question> {
        let mut form = self.load_form(form_id).await?;

        let question = form
            .questions
            .iter_mut()
            .find(|q| q.id() == question_id)
            .ok_or_else(|| anyhow::anyhow!("Question {} not found", question_id))?;

        validation::apply_edit(question, edit).map_err(anyhow::Error::new)?;
        let updated = question.clone();

        self.persist_questions(&form).await?;
        Ok(updated)
    }

    pub async fn submit_response(
        &self,
        form_id: &str,
        req: &SubmitResponseRequest,
    ) -> Result<ScoreReport> {
        let retry_cfg = RetryConfig::default();
        let aggressive_cfg = RetryConfig::aggressive();

        // Idempotency only applies when the client supplies a key; anonymous
        // respondents may legitimately submit the same form twice.
        if let Some(key) = &req.idempotency_key {
            if let Some(cached) = retry_async_with_config(retry_cfg.clone(), || async {
                self.check_idempotency(key).await
            })
            .await?
            {
                record_cache_hit();
                RESPONSES_SCORED_TOTAL.with_label_values(&["true"]).inc();
                tracing::info!("Returning cached score report for idempotency_key={}", key);
                return Ok(cached);
            }
            record_cache_miss();
        }

        let form = self.load_form(form_id).await?;

        let results = scoring::score_form(&form.questions, &req.answers);
        let total_score = scoring::overall_score(&results);

        let report = ScoreReport {
            form_id: form.id.to_hex(),
            results,
            total_score,
            submitted_at: Utc::now(),
        };

        RESPONSES_SCORED_TOTAL.with_label_values(&["false"]).inc();
        tracing::info!(
            "Scored response: form={}, questions={}, total={:.1}",
            form_id,
            report.results.len(),
            report.total_score
        );

        self.save_response(ResponseRecord::from_report(&report));

        if let Some(key) = &req.idempotency_key {
            retry_async_with_config(aggressive_cfg, || async {
                self.cache_report(key, &report).await
            })
            .await?;
        }

        Ok(report)
    }

    async fn load_form(&self, form_id: &str) -> Result<FormDocument> {
        let oid = parse_form_id(form_id)?;

        self.forms()
            .find_one(doc! { "_id": oid })
            .await
            .context("Failed to query forms collection")?
            .ok_or_else(|| anyhow::anyhow!("Form {} not found", form_id))
    }

    async fn persist_questions(&self, form: &FormDocument) -> Result<()> {
        let questions_bson =
            mongodb::bson::to_bson(&form.questions).context("Failed to serialize questions")?;

        self.forms()
            .update_one(
                doc! { "_id": form.id },
                doc! { "$set": {
                    "questions": questions_bson,
                    "updatedAt": BsonDateTime::now(),
                }},
            )
            .await
            .context("Failed to persist questions")?;

        Ok(())
    }

    /// Background save; the caller gets its score report without waiting for
    /// the write to land.
    fn save_response(&self, record: ResponseRecord) {
        let mongo = self.mongo.clone();

        tokio::spawn(async move {
            let cfg = RetryConfig::aggressive();
            let collection: mongodb::Collection<ResponseRecord> =
                mongo.collection(RESPONSES_COLLECTION);

            let res: Result<_, mongodb::error::Error> = retry_async_with_config(cfg, || async {
                collection.insert_one(&record).await.map(|_| ())
            })
            .await;

            if let Err(e) = res {
                tracing::error!("Background response save failed: {:#?}", e);
            } else {
                tracing::info!("Background response saved: id={}", record.id);
            }
        });
    }

    async fn check_idempotency(&self, idempotency_key: &str) -> Result<Option<ScoreReport>> {
        let mut conn = self.redis.clone();
        let cache_key = format!("idempotency:response:{}", idempotency_key);

        let cached: Option<String> = redis::cmd("GET")
            .arg(&cache_key)
            .query_async(&mut conn)
            .await
            .context("Failed to check idempotency cache")?;

        if let Some(json) = cached {
            let report: ScoreReport =
                serde_json::from_str(&json).context("Failed to deserialize cached report")?;
            return Ok(Some(report));
        }

        Ok(None)
    }

    // 24 hour TTL, matching how long a filling session's key stays meaningful.
    async fn cache_report(&self, idempotency_key: &str, report: &ScoreReport) -> Result<()> {
        let mut conn = self.redis.clone();
        let cache_key = format!("idempotency:response:{}", idempotency_key);
        let json = serde_json::to_string(report).context("Failed to serialize report")?;

        redis::cmd("SETEX")
            .arg(&cache_key)
            .arg(86400)
            .arg(&json)
            .query_async::<()>(&mut conn)
            .await
            .context("Failed to cache report")?;

        Ok(())
    }
}

fn parse_form_id(form_id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(form_id).context("Invalid form id")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_form_ids() {
        assert!(parse_form_id("not-an-object-id").is_err());
        assert!(parse_form_id("").is_err());

        let oid = ObjectId::new();
        assert_eq!(parse_form_id(&oid.to_hex()).unwrap(), oid);
    }
}
