// Route exports
pub mod submissions;

use actix_web::web;

pub use submissions::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(submissions::configure),
    );
}
