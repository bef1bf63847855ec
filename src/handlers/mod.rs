pub mod applications;
pub mod auth;
pub mod contests;
pub mod dashboard;
pub mod notifications;
pub mod products;
pub mod profiles;
pub mod submissions;
pub mod users;
pub mod videos;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(
        web::scope("/auth")
            .route("/me", web::get().to(auth::me))
            .route("/complete-profile", web::post().to(auth::complete_profile)),
    );

    // ── User and profile routes ──
    cfg.service(web::resource("/users").route(web::get().to(users::get_users)));
    cfg.service(
        web::resource("/users/{id}")
            .route(web::get().to(users::get_user))
            .route(web::put().to(users::update_user))
            .route(web::delete().to(users::delete_user)),
    );
    cfg.service(
        web::scope("/profiles")
            .route("/creator", web::get().to(profiles::get_creator_profile))
            .route("/creator", web::put().to(profiles::update_creator_profile))
            .route("/brand", web::get().to(profiles::get_brand_profile))
            .route("/brand", web::put().to(profiles::update_brand_profile)),
    );

    // ── Contest routes (static segments before /{id}) ──
    cfg.service(
        web::scope("/contests")
            .route("", web::get().to(contests::get_contests))
            .route("", web::post().to(contests::create_contest))
            .route("/active", web::get().to(contests::get_active_contests))
            .route("/featured", web::get().to(contests::get_featured_contests))
            .route("/search", web::get().to(contests::search_contests))
            .route("/{id}", web::get().to(contests::get_contest))
            .route("/{id}", web::put().to(contests::update_contest))
            .route("/{id}", web::delete().to(contests::delete_contest))
            .route("/{id}/status", web::put().to(contests::update_status))
            .route("/{id}/winner", web::post().to(contests::select_winner))
            .route("/{id}/products", web::get().to(products::get_contest_products))
            .route("/{id}/apply", web::post().to(applications::apply))
            .route(
                "/{id}/application-status",
                web::get().to(applications::application_status),
            )
            .route("/{id}/applications", web::get().to(applications::get_contest_applications))
            .route("/{id}/submit", web::post().to(submissions::submit))
            .route("/{id}/submissions", web::get().to(submissions::get_contest_submissions)),
    );
    cfg.service(web::resource("/brand/contests").route(web::get().to(contests::get_brand_contests)));

    // ── Application routes ──
    cfg.service(
        web::scope("/applications")
            .route("/{id}", web::put().to(applications::update_application))
            .route("/{id}/approve", web::post().to(applications::approve))
            .route("/{id}/reject", web::post().to(applications::reject)),
    );
    cfg.service(
        web::scope("/admin/applications")
            .route("/approve", web::post().to(applications::batch_approve))
            .route("/reject", web::post().to(applications::batch_reject)),
    );

    // ── Product routes ──
    cfg.service(
        web::scope("/products")
            .route("", web::post().to(products::create_product))
            .route("/{id}", web::get().to(products::get_product))
            .route("/{id}", web::put().to(products::update_product))
            .route("/{id}/reduce-stock", web::post().to(products::reduce_stock))
            .route("/{id}/increase-stock", web::post().to(products::increase_stock))
            .route("/{id}/archive", web::put().to(products::set_archived)),
    );
    cfg.service(
        web::resource("/brands/{brand_id}/products")
            .route(web::get().to(products::get_brand_products)),
    );

    // ── Submission review ──
    cfg.service(
        web::resource("/submissions/{id}/review")
            .route(web::put().to(submissions::review_submission)),
    );

    // ── Creator dashboard ──
    cfg.service(
        web::scope("/creator")
            .route("/dashboard", web::get().to(dashboard::creator_dashboard))
            .route("/submissions", web::get().to(dashboard::creator_submissions))
            .route("/earnings", web::get().to(dashboard::creator_earnings)),
    );

    // ── Notifications ──
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(notifications::get_notifications))
            .route("/unread", web::get().to(notifications::get_unread))
            .route("/read-all", web::post().to(notifications::mark_all_read))
            .route("/broadcast", web::post().to(notifications::broadcast))
            .route("/{id}/read", web::post().to(notifications::mark_read)),
    );

    // ── Videos ──
    cfg.service(
        web::scope("/videos")
            .route("", web::get().to(videos::get_videos))
            .route("", web::post().to(videos::create_video))
            .route("/featured", web::get().to(videos::get_featured))
            .route("/creator/{creator_id}", web::get().to(videos::get_creator_videos))
            .route("/{id}", web::get().to(videos::get_video))
            .route("/{id}/like", web::post().to(videos::like_video))
            .route("/{id}/view", web::post().to(videos::view_video))
            .route("/{id}/moderation", web::put().to(videos::moderate_video)),
    );
}
