// DTOs partagés entre routes et services
use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::NaiveDate;

use crate::models::{profiles, tasks, users};

// Payload d'inscription. Les règles métier (longueur du mot de passe,
// confirmation, unicité) passent par le pipeline de validation explicite,
// pas par des attributs validator.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub confirm_password: String,
}

// Représentation publique d'un user (jamais le hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub is_admin: bool,
    pub joined_date: NaiveDate,
}

impl From<&users::Model> for UserResponse {
    fn from(user: &users::Model) -> Self {
        UserResponse {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_verified: user.is_verified,
            is_active: user.is_active,
            is_admin: user.is_admin,
            joined_date: user.joined_date,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 12, message = "Username must be between 1 and 12 characters"))]
    pub username: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Full name must not be empty"))]
    pub full_name: Option<String>,
    pub password: Option<String>,
    // Réservés au staff, ignorés pour un update de soi-même
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

// Le user est exposé par username, comme dans les réponses /users
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: String,
    pub age: Option<i32>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub language: Option<String>,
    pub linkedin_profile: Option<String>,
    pub github_profile: Option<String>,
    pub instagram_profile: Option<String>,
    pub x_profile: Option<String>,
}

impl ProfileResponse {
    pub fn from_parts(username: &str, profile: &profiles::Model) -> Self {
        ProfileResponse {
            user: username.to_string(),
            age: profile.age,
            bio: profile.bio.clone(),
            location: profile.location.clone(),
            language: profile.language.clone(),
            linkedin_profile: profile.linkedin_profile.clone(),
            github_profile: profile.github_profile.clone(),
            instagram_profile: profile.instagram_profile.clone(),
            x_profile: profile.x_profile.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(range(min = 1, max = 150, message = "Age must be between 1 and 150"))]
    pub age: Option<i32>,
    pub bio: Option<String>,
    #[validate(length(max = 255, message = "Location is too long"))]
    pub location: Option<String>,
    #[validate(length(max = 10, message = "Language code is too long"))]
    pub language: Option<String>,
    #[validate(url(message = "Invalid URL"))]
    pub linkedin_profile: Option<String>,
    #[validate(url(message = "Invalid URL"))]
    pub github_profile: Option<String>,
    #[validate(url(message = "Invalid URL"))]
    pub instagram_profile: Option<String>,
    #[validate(url(message = "Invalid URL"))]
    pub x_profile: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub dead_line: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>, // 'PEN', 'COM' ou 'EXP'
    pub dead_line: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub dead_line: chrono::DateTime<chrono::Utc>,
}

impl From<tasks::Model> for TaskResponse {
    fn from(t: tasks::Model) -> Self {
        TaskResponse {
            id: t.id,
            title: t.title,
            slug: t.slug,
            description: t.description,
            status: t.status,
            created_at: t.created_at,
            updated_at: t.updated_at,
            dead_line: t.dead_line,
        }
    }
}
