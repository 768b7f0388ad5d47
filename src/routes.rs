use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{health, products, session},
    middleware::{error_handling_middleware, request_id_middleware, require_session},
    state::AppState,
};

/// Create the main application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Session routes
    let session_routes = Router::new()
        .route("/jwt", post(session::issue_token))
        .route("/signOut", post(session::sign_out));

    // Product routes, optionally behind the session cookie
    let mut product_routes = Router::new()
        .route("/products", get(products::list_products))
        .route("/count", get(products::count_products));

    if state.config.auth.require_auth {
        tracing::info!("Session verification enabled for product routes");
        product_routes = product_routes.route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));
    }

    // Main router combining all routes
    Router::new()
        .route("/", get(health::liveness))
        .merge(session_routes)
        .merge(product_routes)
        .layer(middleware::from_fn(error_handling_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
