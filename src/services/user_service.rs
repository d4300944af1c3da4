use sea_orm::*;
use chrono::Utc;

use crate::errors::ApiError;
use crate::models::dto::RegisterRequest;
use crate::models::{profiles, users};
use crate::utils::password;
use crate::utils::validation::{ErrorAccumulator, run_registration_checks};

pub struct UserService;

impl UserService {
    /// Inscrit un nouvel utilisateur: pipeline de validation, unicité,
    /// puis création du user ET de son profil vide dans une seule
    /// transaction (les deux ou aucun)
    pub async fn register(
        db: &DatabaseConnection,
        request: RegisterRequest,
    ) -> Result<users::Model, ApiError> {
        // 1. Pipeline de prédicats ordonnés (accumule par champ)
        let mut acc = ErrorAccumulator::new();
        run_registration_checks(&request, &mut acc);

        // 2. Unicité username/email, accumulée dans le même accumulateur
        let email = request.email.to_lowercase();

        let username_taken = users::Entity::find()
            .filter(users::Column::Username.eq(&request.username))
            .one(db)
            .await?
            .is_some();
        if username_taken {
            acc.add("username", "A user with that username already exists.");
        }

        let email_taken = users::Entity::find()
            .filter(users::Column::Email.eq(&email))
            .one(db)
            .await?
            .is_some();
        if email_taken {
            acc.add("email", "A user with that email already exists.");
        }

        acc.into_result()?;

        // 3. Hash du mot de passe
        let password_hash = password::hash_password(&request.password)
            .map_err(ApiError::Internal)?;

        // 4. Transaction: user + profil vide
        let txn = db.begin().await?;

        let new_user = users::ActiveModel {
            username: Set(request.username.clone()),
            email: Set(email),
            full_name: Set(request.full_name.clone()),
            password_hash: Set(password_hash),
            is_verified: Set(false),
            is_active: Set(true),
            is_admin: Set(false),
            joined_date: Set(Utc::now().date_naive()),
            ..Default::default()
        };

        let user = new_user.insert(&txn).await?;

        let new_profile = profiles::ActiveModel {
            user_id: Set(user.id),
            ..Default::default()
        };

        new_profile.insert(&txn).await?;

        txn.commit().await?;

        Ok(user)
    }

    pub async fn find_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<users::Model>, ApiError> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.to_lowercase()))
            .one(db)
            .await?;
        Ok(user)
    }

    pub async fn find_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<users::Model>, ApiError> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(db)
            .await?;
        Ok(user)
    }

    /// Vérification du mot de passe, déléguée au module password
    /// (comparaison à temps constant)
    pub fn check_password(user: &users::Model, candidate: &str) -> Result<bool, ApiError> {
        password::verify_password(candidate, &user.password_hash).map_err(ApiError::Internal)
    }

    /// Flippe is_verified. Prend une connexion générique pour pouvoir
    /// s'exécuter dans la transaction de l'appelant.
    pub async fn set_verified<C: ConnectionTrait>(
        conn: &C,
        user: users::Model,
    ) -> Result<users::Model, ApiError> {
        let mut active: users::ActiveModel = user.into();
        active.is_verified = Set(true);
        Ok(active.update(conn).await?)
    }

    /// Recharge l'utilisateur derrière un token d'accès valide.
    /// Un token valide dont le user a disparu vaut 401.
    pub async fn require_caller(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<users::Model, ApiError> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))
    }
}
