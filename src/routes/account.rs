use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use log::{error, info, warn};
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::error::{ErrorKind, WriteError, WriteFailure};
use mongodb::{Client, Collection};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

use crate::db::mongo::DATABASE;
use crate::middleware::auth::{generate_token, AuthMiddleware, Claims};
use crate::models::user::{SigninRequest, SignupRequest, User, UserSession};

const USERS: &str = "Users";
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

fn users(client: &Client) -> Collection<User> {
    client.database(DATABASE).collection(USERS)
}

fn token_response(email: &str, user_id: &ObjectId) -> HttpResponse {
    match generate_token(email, &user_id.to_hex()) {
        Ok(token) => HttpResponse::Ok().json(TokenResponse { auth_token: token }),
        Err(err) => {
            error!("Token generation failed: {}", err);
            HttpResponse::InternalServerError().body("Token generation failed")
        }
    }
}

/*
    /api/auth/signup
*/
pub async fn signup(
    data: web::Data<Arc<Client>>,
    input: web::Json<SignupRequest>,
) -> impl Responder {
    let input = input.into_inner();

    if let Err(msg) = input.validate() {
        return HttpResponse::BadRequest().body(msg);
    }
    if !is_valid_email(&input.email) {
        return HttpResponse::BadRequest().body("Invalid email address");
    }

    let password = match bcrypt::hash(&input.password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Failed to hash password: {}", err);
            return HttpResponse::InternalServerError().body("Failed to create user");
        }
    };

    let now = Utc::now();
    let user = User {
        id: None,
        name: input.name.trim().to_string(),
        email: input.email.trim().to_lowercase(),
        password,
        last_signin: None,
        failed_signins: Some(0),
        created_at: Some(now),
        updated_at: Some(now),
    };

    let collection = users(&data);
    match collection.find_one(doc! { "email": &user.email }).await {
        Ok(Some(_)) => return HttpResponse::Conflict().body("User already exists"),
        Ok(None) => {}
        Err(err) => {
            error!("Failed to look up user: {}", err);
            return HttpResponse::InternalServerError().body("Failed to create user");
        }
    }

    match collection.insert_one(&user).await {
        Ok(result) => match result.inserted_id.as_object_id() {
            Some(user_id) => {
                info!("Created user {}", user_id);
                token_response(&user.email, &user_id)
            }
            None => HttpResponse::InternalServerError().body("Failed to create user"),
        },
        Err(err) => match *err.kind {
            ErrorKind::Write(WriteFailure::WriteError(WriteError { code, .. }))
                if code == DUPLICATE_KEY =>
            {
                HttpResponse::Conflict().body("User already exists")
            }
            _ => {
                error!("Failed to create user: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to create user")
            }
        },
    }
}

/*
    /api/auth/signin
*/
pub async fn signin(
    data: web::Data<Arc<Client>>,
    input: web::Json<SigninRequest>,
) -> impl Responder {
    let input = input.into_inner();
    let email = input.email.trim().to_lowercase();
    let collection = users(&data);

    let user = match collection.find_one(doc! { "email": &email }).await {
        Ok(Some(user)) => user,
        Ok(None) => return HttpResponse::NotFound().body("User not found"),
        Err(err) => {
            error!("Database error: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to process signin");
        }
    };

    if !bcrypt::verify(&input.password, &user.password).unwrap_or(false) {
        let failed_signins = user.failed_signins.unwrap_or(0) + 1;
        warn!("Failed signin for {} ({} in a row)", email, failed_signins);

        let update = doc! { "$set": { "failed_signins": failed_signins } };
        return match collection.update_one(doc! { "email": &email }, update).await {
            Ok(_) => HttpResponse::Unauthorized().body("Invalid credentials"),
            Err(err) => {
                error!("Failed to update failed signins: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to process signin")
            }
        };
    }

    let Some(user_id) = user.id else {
        return HttpResponse::InternalServerError().body("Failed to process signin");
    };

    let update = doc! {
        "$set": {
            "last_signin": Utc::now().to_rfc3339(),
            "failed_signins": 0
        }
    };
    if let Err(err) = collection.update_one(doc! { "_id": user_id }, update).await {
        error!("Failed to update document: {:?}", err);
        return HttpResponse::InternalServerError().body("Failed to sign in.");
    }

    token_response(&email, &user_id)
}

/*
    /api/auth/session
*/
pub async fn user_session(
    claims: web::ReqData<Claims>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let user_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    match users(&data).find_one(doc! { "_id": user_id }).await {
        Ok(Some(user)) => HttpResponse::Ok().json(UserSession {
            id: user_id.to_hex(),
            name: user.name,
            email: user.email,
            created_at: user.created_at.unwrap_or_default(),
        }),
        Ok(None) => HttpResponse::NotFound().body("User not found"),
        Err(err) => {
            error!("Failed to fetch user: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch user")
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/signup", web::post().to(signup))
            .route("/signin", web::post().to(signin))
            .service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .route("/session", web::get().to(user_session)),
            ),
    );
}

fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
        )
        .expect("email pattern is a valid regex")
    });
    re.is_match(email.trim())
}
