mod api;
mod block;
mod middleware;

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::application::{
    error::ErrorReport,
    repos::{HealthRepo, RepoError},
    search::SearchService,
    taxonomy::TaxonomyService,
};

use middleware::{log_responses, set_request_context};

/// Path of the public post search endpoint.
pub const POSTS_ENDPOINT: &str = "/itc/v1/posts/";
pub const CATEGORIES_ENDPOINT: &str = "/itc/v1/categories";
pub const TAGS_ENDPOINT: &str = "/itc/v1/tags";

#[derive(Clone)]
pub struct HttpState {
    pub search: Arc<SearchService>,
    pub taxonomy: Arc<TaxonomyService>,
    pub health: Arc<dyn HealthRepo>,
}

/// Public router: search endpoints, the filter block page and the health probe.
///
/// `mount_path` must not collide with the endpoint paths; configuration
/// loading rejects such values.
pub fn build_router(state: HttpState, mount_path: &str) -> Router {
    Router::new()
        .route(POSTS_ENDPOINT, get(api::list_posts))
        .route(POSTS_ENDPOINT.trim_end_matches('/'), get(api::list_posts))
        .route(CATEGORIES_ENDPOINT, get(api::list_categories))
        .route(TAGS_ENDPOINT, get(api::list_tags))
        .route(mount_path, get(block::filter_block))
        .route("/_health/db", get(public_health))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.ping().await)
}

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
