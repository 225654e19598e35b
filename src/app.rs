use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/register", get(handlers::get_register))
        .route("/api/range", put(handlers::set_range))
        .route("/api/students", post(handlers::add_student))
        .route("/api/students/sort", post(handlers::commit_names))
        .route("/api/students/:index", delete(handlers::delete_student))
        .route("/api/students/:index/name", put(handlers::set_name))
        .route(
            "/api/students/:index/days/:day/toggle",
            post(handlers::toggle_attendance),
        )
        .route("/api/export", get(handlers::export_csv))
        .route("/api/import", post(handlers::import_csv))
        .route("/api/remote/status", get(handlers::remote_status))
        .route("/api/remote/sign-in", post(handlers::remote_sign_in))
        .route("/api/remote/sign-out", post(handlers::remote_sign_out))
        .route("/api/remote/save", post(handlers::remote_save))
        .route("/api/remote/load", post(handlers::remote_load))
        .with_state(state)
}
