use axum::Router;
use std::sync::Arc;

use formcraft_api::{config::Config, create_router, services::AppState};

pub async fn create_test_app() -> Router {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    // Load test environment from .env.test
    dotenvy::from_filename(".env.test").ok();

    let config = Config::load().expect("Failed to load test configuration");

    eprintln!("Test config loaded - Redis URI: {}", config.redis_uri);

    let mongo_client = mongodb::Client::with_uri_str(&config.mongo_uri)
        .await
        .expect("Failed to connect to test MongoDB");

    let redis_client =
        redis::Client::open(config.redis_uri.clone()).expect("Failed to create test Redis client");

    let app_state = Arc::new(
        AppState::new(config, mongo_client, redis_client)
            .await
            .expect("Failed to initialize test app state"),
    );

    create_router(app_state)
}

/// A complete, valid question set exercising all three question types.
#[allow(dead_code)]
pub fn sample_questions() -> serde_json::Value {
    serde_json::json!([
        {
            "id": "q-cat",
            "type": "categorize",
            "text": "Sort the animals",
            "categories": ["Mammals", "Birds"],
            "items": [
                { "name": "Dog", "category": "Mammals" },
                { "name": "Eagle", "category": "Birds" }
            ]
        },
        {
            "id": "q-cloze",
            "type": "cloze",
            "text": "Complete the sentence",
            "sentence": "The sky is blue",
            "underlinedWords": [{ "index": 4, "length": 3 }],
            "answer": "The sky is blue"
        },
        {
            "id": "q-comp",
            "type": "comprehension",
            "text": "Read and answer",
            "comprehension": "Water boils at 100 degrees Celsius at sea level.",
            "questions": [
                {
                    "id": "s1",
                    "type": "mcq",
                    "text": "At what temperature does water boil?",
                    "options": [
                        { "id": "o1", "label": "50" },
                        { "id": "o2", "label": "100" },
                        { "id": "o3", "label": "150" },
                        { "id": "o4", "label": "200" }
                    ],
                    "correctAnswer": "o2"
                }
            ]
        }
    ])
}
