//! URL table.

use actix_web::web;

use crate::error::AppError;
use crate::handlers;
use crate::metrics::serve_metrics;

/// Register every route plus the JSON 404 fallback.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // A post id that is not an integer names no post.
    cfg.app_data(web::PathConfig::default().error_handler(|err, req| {
        tracing::debug!(path = %req.path(), error = %err, "unparsable path segment");
        AppError::NotFound(req.path().to_string()).into()
    }));

    cfg.route("/metrics", web::get().to(serve_metrics))
        // Health check endpoints
        .route("/health", web::get().to(handlers::health_summary))
        .route("/health/ready", web::get().to(handlers::readiness_summary))
        .route("/health/live", web::get().to(handlers::liveness_check))
        .route("/", web::get().to(handlers::index))
        .route("/follow/", web::get().to(handlers::follow_index))
        .route("/group/{slug}/", web::get().to(handlers::group_posts))
        .service(
            web::resource("/create/")
                .route(web::get().to(handlers::post_create_form))
                .route(web::post().to(handlers::post_create)),
        )
        .service(
            web::scope("/profile/{username}")
                .route("/", web::get().to(handlers::profile))
                .service(
                    web::resource("/follow/")
                        .route(web::get().to(handlers::profile_follow))
                        .route(web::post().to(handlers::profile_follow)),
                )
                .service(
                    web::resource("/unfollow/")
                        .route(web::get().to(handlers::profile_unfollow))
                        .route(web::post().to(handlers::profile_unfollow)),
                ),
        )
        .service(
            web::scope("/posts/{post_id}")
                .route("/", web::get().to(handlers::post_detail))
                .service(
                    web::resource("/edit/")
                        .route(web::get().to(handlers::post_edit_form))
                        .route(web::post().to(handlers::post_edit)),
                )
                .route("/comment/", web::post().to(handlers::add_comment)),
        )
        .default_service(web::to(handlers::not_found));
}
