use actix_web::{delete, get, put, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, ModelTrait, Set, ActiveModelTrait, QueryOrder};
use validator::Validate;

use crate::errors::ApiError;
use crate::middleware::AuthUser;
use crate::models::dto::{UpdateUserRequest, UserResponse};
use crate::models::users;
use crate::services::user_service::UserService;
use crate::utils::password;

/// GET /users - Lister tous les users (PROTÉGÉE, staff seulement)
#[get("")]
pub async fn list_users(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let caller = UserService::require_caller(db.get_ref(), auth_user.user_id).await?;

    if !caller.is_staff() {
        return Err(ApiError::Forbidden(
            "You do not have permission to view this content".to_string(),
        ));
    }

    let all_users = users::Entity::find()
        .order_by_asc(users::Column::JoinedDate)
        .all(db.get_ref())
        .await?;

    let response: Vec<UserResponse> = all_users.iter().map(UserResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /users/{username} - Détail d'un user (PROTÉGÉE, staff ou soi-même)
#[get("/{username}")]
pub async fn retrieve_user(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let username = path.into_inner();
    let caller = UserService::require_caller(db.get_ref(), auth_user.user_id).await?;

    if !caller.is_staff() && caller.username != username {
        return Err(ApiError::Forbidden(
            "You do not have permission to view this content".to_string(),
        ));
    }

    let target = UserService::find_by_username(db.get_ref(), &username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&target)))
}

/// PUT /users/{username}/update - Modifier un user (PROTÉGÉE, staff ou soi-même)
/// Update partiel: seuls les champs présents sont modifiés.
/// is_active / is_admin ne sont appliqués que pour un caller staff.
#[put("/{username}/update")]
pub async fn update_user(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let username = path.into_inner();
    let caller = UserService::require_caller(db.get_ref(), auth_user.user_id).await?;

    if !caller.is_staff() && caller.username != username {
        return Err(ApiError::Forbidden(
            "You do not have permission to update this content".to_string(),
        ));
    }

    let target = UserService::find_by_username(db.get_ref(), &username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    body.validate()?;

    let mut active: users::ActiveModel = target.clone().into();

    if let Some(new_email) = &body.email {
        let new_email = new_email.to_lowercase();
        if new_email != target.email {
            let taken = UserService::find_by_email(db.get_ref(), &new_email)
                .await?
                .is_some();
            if taken {
                return Err(ApiError::validation(
                    "email",
                    "A user with that email already exists.",
                ));
            }
            active.email = Set(new_email);
        }
    }

    if let Some(new_username) = &body.username {
        if *new_username != target.username {
            let taken = UserService::find_by_username(db.get_ref(), new_username)
                .await?
                .is_some();
            if taken {
                return Err(ApiError::validation(
                    "username",
                    "A user with that username already exists.",
                ));
            }
            active.username = Set(new_username.clone());
        }
    }

    if let Some(full_name) = &body.full_name {
        active.full_name = Set(full_name.clone());
    }

    if let Some(new_password) = &body.password {
        // Même politique de longueur qu'à l'inscription
        let len = new_password.chars().count();
        if len <= 8 || len >= 16 {
            return Err(ApiError::validation(
                "password",
                "Password must be between 9 and 15 characters long.",
            ));
        }
        let hash = password::hash_password(new_password).map_err(ApiError::Internal)?;
        active.password_hash = Set(hash);
    }

    if caller.is_staff() {
        if let Some(is_active) = body.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(is_admin) = body.is_admin {
            active.is_admin = Set(is_admin);
        }
    }

    // Un payload vide est un no-op, pas une erreur
    let updated = if active.is_changed() {
        active.update(db.get_ref()).await?
    } else {
        target
    };

    Ok(HttpResponse::Accepted().json(UserResponse::from(&updated)))
}

/// DELETE /users/{username}/delete - Supprimer un user (PROTÉGÉE, staff ou soi-même)
#[delete("/{username}/delete")]
pub async fn destroy_user(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let username = path.into_inner();
    let caller = UserService::require_caller(db.get_ref(), auth_user.user_id).await?;

    if !caller.is_staff() && caller.username != username {
        return Err(ApiError::Forbidden(
            "You do not have permission to delete this content".to_string(),
        ));
    }

    let target = UserService::find_by_username(db.get_ref(), &username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    target.delete(db.get_ref()).await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn users_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(list_users)
            .service(retrieve_user)
            .service(update_user)
            .service(destroy_user)
    );
}
