use actix_web::{web, HttpResponse, Responder};
use log::error;
use mongodb::{bson::doc, Client};
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use crate::db::mongo::DATABASE;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn ok(details: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            details: Some(details.into()),
        }
    }

    fn error(details: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            details: Some(details.into()),
        }
    }
}

/*
    /health
*/
pub async fn health_check(client: web::Data<Arc<Client>>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    health
        .services
        .insert("mongodb".to_string(), check_mongodb(&client).await);
    health
        .services
        .insert("gemini".to_string(), check_gemini_config());

    if health.services.values().any(|service| service.status != "ok") {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_mongodb(client: &Client) -> ServiceStatus {
    match client
        .database(DATABASE)
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => ServiceStatus::ok("Connected successfully to MongoDB"),
        Err(e) => {
            error!("MongoDB health check failed: {}", e);
            ServiceStatus::error(format!("Failed to connect: {}", e))
        }
    }
}

fn check_gemini_config() -> ServiceStatus {
    match env::var("GEMINI_API_KEY") {
        Ok(key) => ServiceStatus::ok(format!("Gemini API key configured ({})", mask_key(&key))),
        Err(_) => ServiceStatus::error("GEMINI_API_KEY not configured"),
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}***{}", head, tail)
    } else {
        "***".to_string()
    }
}
