use crate::config::Config;
use mongodb::bson::doc;
use mongodb::{Client as MongoClient, Database, IndexModel};
use redis::aio::ConnectionManager;

pub struct AppState {
    pub config: Config,
    pub mongo: Database,
    pub redis: ConnectionManager,
}

impl AppState {
    pub async fn new(
        config: Config,
        mongo_client: MongoClient,
        redis_client: redis::Client,
    ) -> anyhow::Result<Self> {
        let mongo = mongo_client.database(&config.mongo_database);

        // Form listing sorts on updatedAt; make sure the index exists up
        // front rather than on the first slow list call.
        let forms: mongodb::Collection<mongodb::bson::Document> = mongo.collection("forms");
        if let Err(e) = forms
            .create_index(IndexModel::builder().keys(doc! { "updatedAt": -1 }).build())
            .await
        {
            tracing::warn!("Failed to ensure forms updatedAt index: {}", e);
        }

        tracing::info!("Attempting to connect to Redis...");

        let redis = tokio::time::timeout(
            std::time::Duration::from_secs(30),
            ConnectionManager::new(redis_client),
        )
        .await
        .map_err(|_| anyhow::anyhow!("Redis connection timeout after 30s"))??;

        tracing::info!("Redis ConnectionManager created, testing with PING...");

        let mut conn = redis.clone();
        tokio::time::timeout(
            std::time::Duration::from_secs(5),
            redis::cmd("PING").query_async::<String>(&mut conn),
        )
        .await
        .map_err(|_| anyhow::anyhow!("Redis PING timeout after 5s"))??;

        tracing::info!("Redis connection established successfully");

        Ok(Self {
            config,
            mongo,
            redis,
        })
    }
}

pub mod form_service;
pub mod scoring;
pub mod validation;
