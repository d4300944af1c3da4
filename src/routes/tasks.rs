use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, ColumnTrait, Set, ActiveModelTrait, ModelTrait};
use uuid::Uuid;
use validator::Validate;

use crate::errors::ApiError;
use crate::middleware::AuthUser;
use crate::models::dto::{CreateTaskRequest, TaskResponse, UpdateTaskRequest};
use crate::models::tasks::{self, TASK_COMPLETED, TASK_EXPIRED, TASK_PENDING};

/// GET /tasks - Lister ses propres tâches (PROTÉGÉE)
#[get("")]
pub async fn list_tasks(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let rows = tasks::Entity::find()
        .filter(tasks::Column::UserId.eq(auth_user.user_id))
        .order_by_desc(tasks::Column::CreatedAt)
        .order_by_desc(tasks::Column::Id)
        .all(db.get_ref())
        .await?;

    let response: Vec<TaskResponse> = rows.into_iter().map(TaskResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// POST /tasks - Créer une tâche (PROTÉGÉE)
#[post("")]
pub async fn create_task(
    auth_user: AuthUser,
    body: web::Json<CreateTaskRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let now = Utc::now();

    let new_task = tasks::ActiveModel {
        user_id: Set(auth_user.user_id),
        title: Set(body.title.clone()),
        slug: Set(make_slug(&body.title)),
        description: Set(body.description.clone()),
        status: Set(TASK_PENDING.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        dead_line: Set(body.dead_line),
        ..Default::default()
    };

    let task = new_task.insert(db.get_ref()).await?;

    Ok(HttpResponse::Created().json(TaskResponse::from(task)))
}

/// GET /tasks/{slug} - Détail d'une tâche (PROTÉGÉE, owner seulement)
#[get("/{slug}")]
pub async fn retrieve_task(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let task = find_task_for(db.get_ref(), &path.into_inner(), auth_user.user_id).await?;

    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

/// PUT /tasks/{slug}/update - Modifier une tâche (PROTÉGÉE, owner seulement)
/// Update partiel: seuls les champs présents sont modifiés
#[put("/{slug}/update")]
pub async fn update_task(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateTaskRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let task = find_task_for(db.get_ref(), &path.into_inner(), auth_user.user_id).await?;

    body.validate()?;

    if let Some(status) = &body.status {
        let valid_statuses = [TASK_PENDING, TASK_COMPLETED, TASK_EXPIRED];
        if !valid_statuses.contains(&status.as_str()) {
            return Err(ApiError::BadRequest(
                "Invalid status. Must be one of: PEN, COM, EXP".to_string(),
            ));
        }
    }

    let mut active: tasks::ActiveModel = task.into();

    if let Some(title) = &body.title {
        active.title = Set(title.clone());
    }
    if let Some(description) = &body.description {
        active.description = Set(Some(description.clone()));
    }
    if let Some(status) = &body.status {
        active.status = Set(status.clone());
    }
    if let Some(dead_line) = body.dead_line {
        active.dead_line = Set(dead_line);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(db.get_ref()).await?;

    Ok(HttpResponse::Ok().json(TaskResponse::from(updated)))
}

/// DELETE /tasks/{slug}/delete - Supprimer une tâche (PROTÉGÉE, owner seulement)
#[delete("/{slug}/delete")]
pub async fn destroy_task(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let task = find_task_for(db.get_ref(), &path.into_inner(), auth_user.user_id).await?;

    task.delete(db.get_ref()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Charge une tâche par slug: 404 si absente, 403 si elle
/// appartient à quelqu'un d'autre
async fn find_task_for(
    db: &DatabaseConnection,
    slug: &str,
    caller_id: i32,
) -> Result<tasks::Model, ApiError> {
    let task = tasks::Entity::find()
        .filter(tasks::Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if task.user_id != caller_id {
        return Err(ApiError::Forbidden(
            "You do not have permission to access this task".to_string(),
        ));
    }

    Ok(task)
}

// Slug depuis le titre + suffixe aléatoire pour l'unicité
fn make_slug(title: &str) -> String {
    let mut base = String::new();
    let mut last_dash = true; // évite un dash en tête
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            base.push(c);
            last_dash = false;
        } else if !last_dash {
            base.push('-');
            last_dash = true;
        }
    }
    let base = base.trim_end_matches('-');

    let suffix = Uuid::new_v4().simple().to_string();
    if base.is_empty() {
        suffix[..8].to_string()
    } else {
        format!("{}-{}", base, &suffix[..8])
    }
}

pub fn tasks_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tasks")
            .service(list_tasks)
            .service(create_task)
            .service(retrieve_task)
            .service(update_task)
            .service(destroy_task)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_slug_normalizes_title() {
        let slug = make_slug("Faire les courses !");
        assert!(slug.starts_with("faire-les-courses-"));
        let suffix = slug.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 8);
    }

    #[test]
    fn test_make_slug_empty_title_still_unique() {
        let slug = make_slug("!!!");
        assert_eq!(slug.len(), 8);
    }

    #[test]
    fn test_make_slug_no_double_dashes() {
        let slug = make_slug("a  b");
        assert!(slug.starts_with("a-b-"));
        assert!(!slug.contains("--"));
    }
}
