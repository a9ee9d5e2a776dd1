//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod health;
mod posts;
mod tags;
mod users;
mod views;


use actix_web::web;

use crate::middleware::error::json_error_handler;

/// Register request body limits and every route.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .configure(configure_routes);
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login)),
            )
            .route("/me", web::get().to(users::me))
            .route("/me/posts", web::get().to(users::my_posts))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    // Must come before the id-or-slug routes
                    .route("/slug/{slug}", web::get().to(posts::get_by_slug))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/comments", web::get().to(comments::list))
                    .route("/{id}/comments", web::post().to(comments::create)),
            )
            .service(
                web::scope("/categories")
                    .route("", web::get().to(categories::list))
                    .route("", web::post().to(categories::create))
                    .route("/{id}", web::put().to(categories::update))
                    .route("/{id}", web::delete().to(categories::delete))
                    .route("/{id}/posts", web::get().to(categories::posts)),
            )
            .service(
                web::scope("/tags")
                    .route("", web::get().to(tags::list))
                    .route("", web::post().to(tags::create))
                    .route("/{id}", web::put().to(tags::update))
                    .route("/{id}", web::delete().to(tags::delete))
                    .route("/{slug}/posts", web::get().to(tags::posts)),
            ),
    );
}
