mod attendance;
mod grades;
mod materials;
mod me;
mod roster;
mod scoped;

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::server::AppState;

pub fn user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(me::get_me))
        // Student-associated records, scoped per caller
        .route(
            "/attendance",
            get(attendance::list_attendance).post(attendance::create_attendance),
        )
        .route("/grades", get(grades::list_grades).post(grades::create_grade))
        .route(
            "/materials",
            get(materials::list_materials).post(materials::create_material),
        )
        .route("/roster", get(roster::list_roster))
}
