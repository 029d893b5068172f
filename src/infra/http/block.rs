//! Server-rendered filter block.

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::Response,
};

use crate::application::error::ErrorReport;
use crate::form::{FetchStatus, FilterForm, MemoryHistory, ServiceFilterApi};
use crate::presentation::views::{FilterPageTemplate, render_template_response};

use super::HttpState;

const PAGE_TITLE: &str = "Filter posts";

pub(super) async fn filter_block(State(state): State<HttpState>, uri: Uri) -> Response {
    let api = ServiceFilterApi::new(state.search.clone(), state.taxonomy.clone());
    let history = MemoryHistory::new(
        uri.path_and_query()
            .map(|value| value.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string()),
    );

    let mut form = FilterForm::new(api, history);
    form.initialize().await;

    let failure = match &form.state().status {
        FetchStatus::Failed { message } => Some(message.clone()),
        _ => None,
    };
    let status = if failure.is_some() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    let mut response = render_template_response(
        FilterPageTemplate {
            title: PAGE_TITLE.to_string(),
            view: form.view(),
        },
        status,
    );
    if let Some(message) = failure {
        ErrorReport::from_message("infra::http::block::filter_block", status, message)
            .attach(&mut response);
    }
    response
}
