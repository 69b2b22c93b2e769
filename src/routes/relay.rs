use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::middleware::auth::AuthMiddleware;
use crate::models::generation::GenerationError;
use crate::services::gemini_service::TextGeneration;

#[derive(Debug, Deserialize)]
pub struct RelayRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RelayResponse {
    pub text: String,
}

/*
    /api/gemini
*/
pub async fn relay<G: TextGeneration + 'static>(
    gemini: web::Data<G>,
    input: web::Json<RelayRequest>,
) -> impl Responder {
    if input.prompt.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "prompt is required" }));
    }

    match gemini.generate_text(&input.prompt).await {
        Ok(text) => HttpResponse::Ok().json(RelayResponse { text }),
        Err(GenerationError::UpstreamEmpty) => HttpResponse::Ok().json(RelayResponse {
            text: String::new(),
        }),
        Err(err) => {
            error!("Gemini relay failed: {}", err);
            HttpResponse::InternalServerError().json(json!({ "error": "Gemini API request failed" }))
        }
    }
}

pub fn configure<G: TextGeneration + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/gemini")
            .wrap(AuthMiddleware)
            .route("", web::post().to(relay::<G>)),
    );
}
