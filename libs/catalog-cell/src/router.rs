use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::admin_auth_middleware;

use crate::handlers;

pub fn catalog_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/services", get(handlers::list_services))
        .route("/services/{service_id}", get(handlers::get_service))
        .route("/categories", get(handlers::list_categories))
        .route("/stylists", get(handlers::list_stylists));

    let admin_routes = Router::new()
        .route("/admin/services", post(handlers::create_service))
        .route("/admin/services/{service_id}", put(handlers::update_service).delete(handlers::delete_service))
        .route("/admin/stylists", post(handlers::create_stylist))
        .route("/admin/stylists/{stylist_id}", put(handlers::update_stylist).delete(handlers::delete_stylist))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
}
