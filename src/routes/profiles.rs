use actix_web::{get, put, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, Set, ActiveModelTrait};
use validator::Validate;

use crate::errors::ApiError;
use crate::middleware::AuthUser;
use crate::models::dto::{ProfileResponse, UpdateProfileRequest};
use crate::models::{profiles, users};
use crate::services::user_service::UserService;

/// GET /profiles - Lister tous les profils (PROTÉGÉE, staff seulement)
#[get("")]
pub async fn list_profiles(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let caller = UserService::require_caller(db.get_ref(), auth_user.user_id).await?;

    if !caller.is_staff() {
        return Err(ApiError::Forbidden(
            "You do not have permission to view this content".to_string(),
        ));
    }

    // Profil + user en une requête pour exposer le username
    let rows = profiles::Entity::find()
        .find_also_related(users::Entity)
        .all(db.get_ref())
        .await?;

    let response: Vec<ProfileResponse> = rows
        .iter()
        .filter_map(|(profile, user)| {
            user.as_ref()
                .map(|u| ProfileResponse::from_parts(&u.username, profile))
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /profiles/{username} - Détail d'un profil (PROTÉGÉE, staff ou soi-même)
#[get("/{username}")]
pub async fn retrieve_profile(
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

    let owner = UserService::find_by_username(db.get_ref(), &username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let profile = profiles::Entity::find()
        .filter(profiles::Column::UserId.eq(owner.id))
        .one(db.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ProfileResponse::from_parts(&owner.username, &profile)))
}

/// PUT /profiles/{username}/update - Modifier un profil (PROTÉGÉE, staff ou soi-même)
/// Update partiel: seuls les champs présents sont modifiés
#[put("/{username}/update")]
pub async fn update_profile(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateProfileRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let username = path.into_inner();
    let caller = UserService::require_caller(db.get_ref(), auth_user.user_id).await?;

    if !caller.is_staff() && caller.username != username {
        return Err(ApiError::Forbidden(
            "You do not have permission to update this content".to_string(),
        ));
    }

    let owner = UserService::find_by_username(db.get_ref(), &username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let profile = profiles::Entity::find()
        .filter(profiles::Column::UserId.eq(owner.id))
        .one(db.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    body.validate()?;

    let mut active: profiles::ActiveModel = profile.clone().into();

    if let Some(age) = body.age {
        active.age = Set(Some(age));
    }
    if let Some(bio) = &body.bio {
        active.bio = Set(Some(bio.clone()));
    }
    if let Some(location) = &body.location {
        active.location = Set(Some(location.clone()));
    }
    if let Some(language) = &body.language {
        active.language = Set(Some(language.clone()));
    }
    if let Some(linkedin) = &body.linkedin_profile {
        active.linkedin_profile = Set(Some(linkedin.clone()));
    }
    if let Some(github) = &body.github_profile {
        active.github_profile = Set(Some(github.clone()));
    }
    if let Some(instagram) = &body.instagram_profile {
        active.instagram_profile = Set(Some(instagram.clone()));
    }
    if let Some(x_profile) = &body.x_profile {
        active.x_profile = Set(Some(x_profile.clone()));
    }

    // Un payload vide est un no-op, pas une erreur
    let updated = if active.is_changed() {
        active.update(db.get_ref()).await?
    } else {
        profile
    };

    Ok(HttpResponse::Accepted().json(ProfileResponse::from_parts(&owner.username, &updated)))
}

pub fn profiles_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profiles")
            .service(list_profiles)
            .service(retrieve_profile)
            .service(update_profile)
    );
}
