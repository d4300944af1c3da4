pub mod health;
pub mod auth;
pub mod accounts;
pub mod users;
pub mod profiles;
pub mod tasks;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health_check)
        .configure(auth::auth_routes)
        .configure(accounts::accounts_routes)
        .configure(users::users_routes)
        .configure(profiles::profiles_routes)
        .configure(tasks::tasks_routes);
}
