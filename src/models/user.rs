use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub password: String, // Always hashed
    pub last_signin: Option<DateTime<Utc>>,
    pub failed_signins: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: Option<String>,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.trim().is_empty()
        {
            return Err("Please fill in all fields");
        }
        if let Some(confirm) = &self.confirm_password {
            if confirm != &self.password {
                return Err("Passwords do not match");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct UserSession {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(password: &str, confirm: Option<&str>) -> SignupRequest {
        SignupRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.map(str::to_string),
        }
    }

    #[test]
    fn signup_requires_matching_passwords() {
        assert!(signup("secret", Some("secret")).validate().is_ok());
        assert!(signup("secret", None).validate().is_ok());
        assert_eq!(
            signup("secret", Some("other")).validate(),
            Err("Passwords do not match")
        );
        assert_eq!(signup("  ", None).validate(), Err("Please fill in all fields"));
    }
}
