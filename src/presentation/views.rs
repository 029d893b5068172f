use crate::application::error::HttpError;
use crate::form::{FetchStatus, FormState};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// 1×1 transparent PNG shown for posts without a thumbnail.
pub const PLACEHOLDER_THUMBNAIL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mPs7+m/CAAF2QJ9Ghl9ggAAAABJRU5ErkJggg==";
pub const CATEGORY_PROMPT: &str = "Select a Category";
pub const FETCH_FAILED_NOTICE: &str = "Could not load posts.";

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_fragment<T: Template>(template: T) -> Result<String, TemplateRenderError> {
    template.render().map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_fragment",
            "Template rendering failed",
            err,
        )
    })
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    render_fragment(template).map(Html).map_err(HttpError::from)
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryOptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagCheckboxView {
    pub slug: String,
    pub label: String,
    pub input_id: String,
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostCardView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_src: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageButtonView {
    pub number: u32,
    pub active: bool,
}

/// Everything the form fragment needs, flattened for the template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterFormView {
    pub keyword: String,
    pub categories: Vec<CategoryOptionView>,
    pub tags: Vec<TagCheckboxView>,
    pub posts: Vec<PostCardView>,
    pub pages: Vec<PageButtonView>,
    pub show_pagination: bool,
    pub loading: bool,
    pub notice: Option<&'static str>,
}

impl FilterFormView {
    pub fn from_state(state: &FormState) -> Self {
        Self {
            keyword: state.draft.keyword.clone(),
            categories: category_options(state),
            tags: tag_checkboxes(state),
            posts: state
                .results
                .posts
                .iter()
                .map(|post| PostCardView {
                    id: post.id,
                    title: post.name.clone(),
                    description: post.description.clone(),
                    image_src: post
                        .thumbnail_url
                        .clone()
                        .unwrap_or_else(|| PLACEHOLDER_THUMBNAIL.to_string()),
                })
                .collect(),
            pages: (1..=state.results.max_pages)
                .map(|number| PageButtonView {
                    number,
                    active: number == state.results.current_page,
                })
                .collect(),
            show_pagination: state.results.max_pages > 1,
            loading: state.status == FetchStatus::Loading,
            notice: matches!(state.status, FetchStatus::Failed { .. })
                .then_some(FETCH_FAILED_NOTICE),
        }
    }
}

/// Prompt, known categories, then the selected slug when it is not listed.
fn category_options(state: &FormState) -> Vec<CategoryOptionView> {
    let selected = state.draft.category.as_str();
    let mut options = vec![CategoryOptionView {
        value: String::new(),
        label: CATEGORY_PROMPT.to_string(),
        selected: selected.is_empty(),
    }];
    options.extend(state.categories.iter().map(|term| CategoryOptionView {
        value: term.slug.clone(),
        label: term.name.clone(),
        selected: term.slug == selected,
    }));
    if !selected.is_empty() && !state.categories.iter().any(|term| term.slug == selected) {
        options.push(CategoryOptionView {
            value: selected.to_string(),
            label: selected.to_string(),
            selected: true,
        });
    }
    options
}

fn tag_checkboxes(state: &FormState) -> Vec<TagCheckboxView> {
    let mut boxes: Vec<TagCheckboxView> = state
        .tags
        .iter()
        .map(|term| TagCheckboxView {
            slug: term.slug.clone(),
            label: term.name.clone(),
            input_id: format!("filter-tag-{}", term.slug),
            checked: state.is_tag_selected(&term.slug),
        })
        .collect();

    for slug in &state.draft.tags {
        if !state.tags.iter().any(|term| &term.slug == slug) {
            boxes.push(TagCheckboxView {
                slug: slug.clone(),
                label: slug.clone(),
                input_id: format!("filter-tag-{slug}"),
                checked: true,
            });
        }
    }
    boxes
}

#[derive(Template)]
#[template(path = "filter/form.html")]
pub struct FilterFormTemplate {
    pub view: FilterFormView,
}

#[derive(Template)]
#[template(path = "filter/page.html")]
pub struct FilterPageTemplate {
    pub title: String,
    pub view: FilterFormView,
}
