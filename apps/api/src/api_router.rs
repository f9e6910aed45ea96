use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};


pub fn build_router(app_state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/api/{domain}/user-accesses",
            get(handlers::user_accesses::list_user_accesses_handler),
        )
        .route(
            "/api/{domain}/user-accesses/create-many",
            post(handlers::user_accesses::create_user_accesses_handler),
        )
        .route(
            "/api/{domain}/user-accesses/delete-many",
            post(handlers::user_accesses::delete_user_accesses_handler),
        )
        .route(
            "/api/{domain}/user-accesses/accessible-areas",
            get(handlers::user_accesses::accessible_areas_handler),
        )
        .route(
            "/api/{domain}/user-accesses/{grant_id}",
            delete(handlers::user_accesses::delete_user_access_handler),
        )
        .route(
            "/api/records/{model}",
            get(handlers::records::list_scoped_records_handler),
        )
        .route(
            "/api/records/{model}/{record_id}",
            get(handlers::records::check_scoped_record_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
