use crate::{
    api::{announcements, attendance, leaves, users},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    cfg.service(
        web::scope(&config.api_prefix)
            // Credential endpoints; /me tolerates missing sessions, /logout
            // requires one.
            .service(
                web::scope("/auth")
                    .service(
                        web::resource("/login")
                            .wrap(build_limiter(config.rate_login_per_min))
                            .route(web::post().to(handlers::login)),
                    )
                    .service(
                        web::resource("/signup")
                            .wrap(build_limiter(config.rate_signup_per_min))
                            .route(web::post().to(handlers::signup)),
                    )
                    .service(web::resource("/me").route(web::get().to(handlers::me)))
                    .service(
                        web::resource("/logout")
                            .wrap(from_fn(auth_middleware))
                            .route(web::post().to(handlers::logout)),
                    ),
            )
            // Everything below requires a session.
            .service(
                web::scope("")
                    .wrap(from_fn(auth_middleware))
                    .wrap(build_limiter(config.rate_protected_per_min))
                    .service(
                        web::scope("/attendance")
                            // /attendance
                            .service(
                                web::resource("")
                                    .route(web::post().to(attendance::mark_attendance))
                                    .route(web::get().to(attendance::list_attendance)),
                            )
                            // /attendance/summary
                            .service(
                                web::resource("/summary")
                                    .route(web::get().to(attendance::monthly_summary)),
                            ),
                    )
                    .service(
                        web::scope("/users").service(
                            web::resource("")
                                .route(web::get().to(users::list_users))
                                .route(web::patch().to(users::update_user))
                                .route(web::put().to(users::update_user)),
                        ),
                    )
                    .service(
                        web::scope("/leaves").service(
                            web::resource("")
                                .route(web::get().to(leaves::list_leaves))
                                .route(web::post().to(leaves::create_leave))
                                .route(web::patch().to(leaves::review_leave)),
                        ),
                    )
                    .service(
                        web::scope("/announcements")
                            // /announcements
                            .service(
                                web::resource("")
                                    .route(web::get().to(announcements::list_announcements))
                                    .route(web::post().to(announcements::create_announcement)),
                            )
                            // /announcements/{id}
                            .service(
                                web::resource("/{id}")
                                    .route(web::delete().to(announcements::delete_announcement)),
                            ),
                    ),
            ),
    );
}
