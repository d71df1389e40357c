pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use axum::{
    routing::{get, post},
    Router,
};
use reqwest::Client;

use crate::services::{
    ai_service::AIService, exam_service::ExamService, image_service::ImageService,
    marking_service::MarkingService,
};

#[derive(Clone)]
pub struct AppState {
    pub ai_service: AIService,
    pub image_service: ImageService,
    pub exam_service: ExamService,
    pub marking_service: MarkingService,
}

impl AppState {
    pub fn new() -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");

        let ai_service = AIService::new(config, http_client.clone());
        let image_service = ImageService::new(config, http_client);
        let exam_service = ExamService::new(ai_service.clone(), image_service.clone());
        let marking_service = MarkingService::new(ai_service.clone());

        Self {
            ai_service,
            image_service,
            exam_service,
            marking_service,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// The full HTTP surface. One router shared by the server binary and the
/// integration tests, so transport wiring never drifts from what is tested.
pub fn app(state: AppState, rps: u32) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/generate-exam", post(routes::exam::generate_exam))
        .route("/mark-exam", post(routes::exam::mark_exam))
        .route("/model-answers", post(routes::exam::model_answers))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::RateLimiter::new(rps),
            middleware::rate_limit::rps_middleware,
        ))
        .with_state(state)
}
