pub mod assignments;

pub mod auth;

pub mod courses;

pub mod submissions;

pub mod users;

#[cfg(test)]
mod tests;

pub use assignments::configure_assignments_routes;
pub use auth::configure_auth_routes;
pub use courses::configure_courses_routes;
pub use submissions::configure_submissions_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_courses_routes)
        .configure(configure_assignments_routes)
        .configure(configure_submissions_routes);
}
