mod accounts;
mod assignments;
mod enrollments;
mod guardians;
mod tokens;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::server::AppState;

pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        // Account routes
        .route("/accounts", post(accounts::create_account))
        .route("/accounts", get(accounts::list_accounts))
        .route("/accounts/{id}", get(accounts::get_account))
        .route("/accounts/{id}", patch(accounts::update_account))
        .route("/accounts/{id}/tokens", get(accounts::list_account_tokens))
        .route("/accounts/{id}/tokens", post(accounts::create_account_token))
        // Token routes
        .route("/tokens", get(tokens::list_tokens))
        .route("/tokens/{id}", get(tokens::get_token))
        .route("/tokens/{id}", delete(tokens::delete_token))
        // Assignment routes
        .route(
            "/accounts/{id}/assignments",
            get(assignments::list_account_assignments)
                .post(assignments::create_account_assignment)
                .patch(assignments::update_account_assignment)
                .delete(assignments::delete_account_assignment),
        )
        .route(
            "/courses/{course}/assignments",
            get(assignments::list_course_assignments),
        )
        .route(
            "/courses/{course}/homeroom-label",
            put(assignments::set_homeroom_label),
        )
        // Guardian link routes
        .route("/guardian-links", post(guardians::create_guardian_link))
        .route(
            "/accounts/{id}/guardian-links",
            get(guardians::list_guardian_links),
        )
        .route(
            "/guardian-links/{guardian_id}/{student_id}",
            delete(guardians::delete_guardian_link),
        )
        // Enrollment routes
        .route("/enrollments", post(enrollments::create_enrollment))
        .route(
            "/enrollments/{course}/{student_id}",
            delete(enrollments::delete_enrollment),
        )
}
