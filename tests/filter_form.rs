mod support;

use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, atomic::Ordering};

use async_trait::async_trait;
use itc_filter::domain::criteria::FilterCriteria;
use itc_filter::form::{
    FetchStatus, FilterApi, FilterForm, FormError, MemoryHistory, ServiceFilterApi, url,
};
use itc_filter_api_types::{PostsPage, Term};

use support::{InMemoryContent, services};

/// In-process API that records every post request it serves.
#[derive(Clone)]
struct RecordingApi {
    inner: ServiceFilterApi,
    requests: Arc<Mutex<Vec<FilterCriteria>>>,
}

impl RecordingApi {
    fn new(content: Arc<InMemoryContent>) -> Self {
        let (search, taxonomy) = services(content);
        Self {
            inner: ServiceFilterApi::new(search, taxonomy),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn requests(&self) -> Vec<FilterCriteria> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl FilterApi for RecordingApi {
    async fn fetch_posts(&self, criteria: &FilterCriteria) -> Result<PostsPage, FormError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(criteria.clone());
        self.inner.fetch_posts(criteria).await
    }

    async fn categories(&self) -> Result<Vec<Term>, FormError> {
        self.inner.categories().await
    }

    async fn tags(&self) -> Result<Vec<Term>, FormError> {
        self.inner.tags().await
    }
}

fn page(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).expect("non-zero page")
}

fn form_at(
    content: Arc<InMemoryContent>,
    url: &str,
) -> (FilterForm<RecordingApi, MemoryHistory>, RecordingApi) {
    let api = RecordingApi::new(content);
    let form = FilterForm::new(api.clone(), MemoryHistory::new(url));
    (form, api)
}

#[tokio::test]
async fn initialize_reads_criteria_from_the_url() {
    let (mut form, api) = form_at(
        Arc::new(InMemoryContent::seeded()),
        "/blog?q=rust&cat=news&tags%5B%5D=foo&current-page=1",
    );

    form.initialize().await;

    let expected = FilterCriteria {
        keyword: "rust".into(),
        category: "news".into(),
        tags: vec!["foo".into()],
        page: page(1),
    };
    assert_eq!(api.requests(), vec![expected.clone()]);
    assert_eq!(form.state().draft, expected);
    assert_eq!(form.state().status, FetchStatus::Ready);

    let ids: Vec<i64> = form.state().results.posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![4, 1]);
    assert_eq!(form.state().categories.len(), 3);
    assert_eq!(form.state().tags.len(), 3);
    assert!(form.history().pushed().is_empty());
}

#[tokio::test]
async fn unknown_category_in_url_is_sent_verbatim() {
    let (mut form, api) = form_at(Arc::new(InMemoryContent::seeded()), "/?cat=Not%20Listed");

    form.initialize().await;

    assert_eq!(api.requests()[0].category, "Not Listed");
    assert!(
        !form
            .state()
            .categories
            .iter()
            .any(|term| term.slug == "Not Listed")
    );
}

#[tokio::test]
async fn results_carry_the_requested_page() {
    let (mut form, _) = form_at(Arc::new(InMemoryContent::seeded()), "/?current-page=7");

    form.initialize().await;

    assert!(form.state().results.posts.is_empty());
    assert_eq!(form.state().results.current_page, 7);
    assert_eq!(form.state().results.max_pages, 2);
}

#[tokio::test]
async fn submit_resets_to_first_page() {
    let (mut form, api) = form_at(Arc::new(InMemoryContent::seeded()), "/blog?current-page=3");
    form.initialize().await;
    assert_eq!(form.state().draft.page.get(), 3);

    form.set_keyword("rust");
    form.submit().await;

    let last = api.requests().pop().expect("submit request");
    assert_eq!(last.keyword, "rust");
    assert_eq!(last.page.get(), 1);
    assert_eq!(form.history().pushed(), ["/blog?q=rust".to_string()]);
    assert_eq!(form.state().results.current_page, 1);
}

#[tokio::test]
async fn paginate_pushes_url_and_fetches() {
    let (mut form, api) = form_at(Arc::new(InMemoryContent::seeded()), "/blog?q=word1");
    form.initialize().await;
    assert_eq!(form.state().results.max_pages, 2);

    form.paginate(page(2)).await;
    assert_eq!(api.requests().len(), 2);
    assert_eq!(form.history().current_url(), "/blog?q=word1&current-page=2");
    assert_eq!(form.state().results.current_page, 2);

    let ids: Vec<i64> = form.state().results.posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 1]);

    form.paginate(page(1)).await;
    assert_eq!(form.history().current_url(), "/blog?q=word1");
}

#[tokio::test]
async fn paginate_to_current_page_is_a_no_op() {
    let (mut form, api) = form_at(Arc::new(InMemoryContent::seeded()), "/");
    form.initialize().await;

    form.paginate(page(1)).await;

    assert_eq!(api.requests().len(), 1);
    assert!(form.history().pushed().is_empty());
}

#[tokio::test]
async fn failed_paginate_can_be_retried() {
    let content = Arc::new(InMemoryContent::seeded());
    let (mut form, api) = form_at(content.clone(), "/");
    form.initialize().await;

    content.fail_posts.store(true, Ordering::SeqCst);
    form.paginate(page(2)).await;
    assert!(matches!(form.state().status, FetchStatus::Failed { .. }));
    assert_eq!(form.state().results.current_page, 1);

    let html = form.render().expect("render");
    assert!(html.contains(r#"name="current-page" value="2" class="""#));

    content.fail_posts.store(false, Ordering::SeqCst);
    form.paginate(page(2)).await;

    assert_eq!(api.requests().len(), 3);
    assert_eq!(form.history().pushed().len(), 2);
    assert_eq!(form.state().status, FetchStatus::Ready);
    assert_eq!(form.state().results.current_page, 2);
    let ids: Vec<i64> = form.state().results.posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn first_page_is_reachable_after_a_failed_submit() {
    let content = Arc::new(InMemoryContent::seeded());
    let (mut form, api) = form_at(content.clone(), "/?current-page=2");
    form.initialize().await;
    assert_eq!(form.state().results.current_page, 2);

    content.fail_posts.store(true, Ordering::SeqCst);
    form.submit().await;
    assert_eq!(form.state().draft.page.get(), 1);

    content.fail_posts.store(false, Ordering::SeqCst);
    form.paginate(page(1)).await;

    let last = api.requests().pop().expect("retry request");
    assert_eq!(last.page.get(), 1);
    assert_eq!(api.requests().len(), 3);
    assert_eq!(form.state().results.current_page, 1);
    assert_eq!(form.state().status, FetchStatus::Ready);
}

#[tokio::test]
async fn paginate_uses_unsubmitted_inputs() {
    let (mut form, api) = form_at(Arc::new(InMemoryContent::seeded()), "/");
    form.initialize().await;

    form.toggle_tag("foo");
    form.paginate(page(2)).await;

    let last = api.requests().pop().expect("paginate request");
    assert_eq!(last.tags, vec!["foo"]);
    assert_eq!(last.page.get(), 2);
    assert_eq!(
        form.history().current_url(),
        "/?tags%5B%5D=foo&current-page=2"
    );
}

#[tokio::test]
async fn toggle_tag_adds_and_removes_by_slug() {
    let (mut form, _) = form_at(Arc::new(InMemoryContent::seeded()), "/");

    form.toggle_tag("foo");
    form.toggle_tag("bar");
    form.toggle_tag("foo");

    assert_eq!(form.state().draft.tags, vec!["bar"]);
    assert!(form.state().is_tag_selected("bar"));
    assert!(!form.state().is_tag_selected("foo"));
}

#[tokio::test]
async fn stale_response_does_not_overwrite_newer_results() {
    let content = Arc::new(InMemoryContent::seeded());
    let (mut form, api) = form_at(content, "/");

    let older_criteria = FilterCriteria {
        tags: vec!["baz".into()],
        ..FilterCriteria::default()
    };
    let newer_criteria = FilterCriteria {
        tags: vec!["bar".into()],
        ..FilterCriteria::default()
    };

    let older = form.begin_fetch(older_criteria.clone());
    let newer = form.begin_fetch(newer_criteria.clone());
    assert_eq!(form.state().status, FetchStatus::Loading);

    let newer_page = api.fetch_posts(&newer.criteria).await;
    let older_page = api.fetch_posts(&older.criteria).await;

    form.complete_fetch(newer, newer_page);
    form.complete_fetch(older, older_page);

    let ids: Vec<i64> = form.state().results.posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![4, 2]);
    assert_eq!(form.state().status, FetchStatus::Ready);
}

#[tokio::test]
async fn failed_fetch_keeps_previous_results() {
    let content = Arc::new(InMemoryContent::seeded());
    let (mut form, _) = form_at(content.clone(), "/");
    form.initialize().await;
    let before = form.state().results.clone();
    assert_eq!(before.posts.len(), 5);

    content.fail_posts.store(true, Ordering::SeqCst);
    form.set_keyword("rust");
    form.submit().await;

    assert_eq!(form.state().results, before);
    assert!(matches!(
        form.state().status,
        FetchStatus::Failed { ref message } if message.contains("posts unavailable")
    ));

    let html = form.render().expect("render");
    assert!(html.contains("Could not load posts."));
}

#[tokio::test]
async fn option_list_failures_leave_lists_empty() {
    let content = Arc::new(InMemoryContent::seeded());
    content.fail_terms.store(true, Ordering::SeqCst);
    let (mut form, _) = form_at(content, "/");

    form.initialize().await;

    assert!(form.state().categories.is_empty());
    assert!(form.state().tags.is_empty());
    assert_eq!(form.state().status, FetchStatus::Ready);
    assert_eq!(form.state().results.posts.len(), 5);
}

#[tokio::test]
async fn url_round_trip_preserves_criteria() {
    let criteria = FilterCriteria {
        keyword: "a&b = c".into(),
        category: "news/local".into(),
        tags: vec!["foo".into(), "b a r".into()],
        page: page(12),
    };

    let parsed = url::parse_query(&url::to_query(&criteria));

    assert_eq!(parsed, criteria);
}

#[tokio::test]
async fn rendered_form_marks_the_active_page() {
    let (mut form, _) = form_at(Arc::new(InMemoryContent::seeded()), "/?current-page=2");
    form.initialize().await;

    let html = form.render().expect("render");

    assert!(html.contains(r#"name="current-page" value="2" class="active" disabled"#));
    assert!(html.contains(r#"name="current-page" value="1" class="""#));
    assert!(html.contains("Select a Category"));
    assert_eq!(html.matches(r#"class="filterBlock""#).count(), 2);
}
