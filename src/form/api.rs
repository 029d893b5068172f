//! Transports the filter form uses to reach the search endpoint.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use itc_filter_api_types::{PostsPage, Term};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::application::{search::SearchService, taxonomy::TaxonomyService};
use crate::domain::criteria::FilterCriteria;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("search service failed: {0}")]
    Service(String),
}

#[async_trait]
pub trait FilterApi: Send + Sync {
    async fn fetch_posts(&self, criteria: &FilterCriteria) -> Result<PostsPage, FormError>;

    async fn categories(&self) -> Result<Vec<Term>, FormError>;

    async fn tags(&self) -> Result<Vec<Term>, FormError>;
}

/// Remote site reached over HTTP.
#[derive(Clone, Debug)]
pub struct HttpFilterApi {
    client: Client,
    base: Url,
}

impl HttpFilterApi {
    pub fn new(site: &str, timeout: Duration) -> Result<Self, FormError> {
        let mut base = Url::parse(site)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("itc-filter/", env!("CARGO_PKG_VERSION"))
    }

    pub fn url(&self, path: &str) -> Result<Url, FormError> {
        Ok(self.base.join(path)?)
    }

    pub fn posts_url(&self, criteria: &FilterCriteria) -> Result<Url, FormError> {
        let mut url = self.url("itc/v1/posts/")?;
        url.query_pairs_mut()
            .append_pair("keyword", &criteria.keyword)
            .append_pair("category", &criteria.category)
            .append_pair("tags", &criteria.tags_param())
            .append_pair("page", &criteria.page.to_string());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FormError> {
        let resp = self.client.get(url).send().await?;
        Self::handle(resp).await
    }

    async fn handle<T: DeserializeOwned>(resp: Response) -> Result<T, FormError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(FormError::Status {
                url: resp.url().to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl FilterApi for HttpFilterApi {
    async fn fetch_posts(&self, criteria: &FilterCriteria) -> Result<PostsPage, FormError> {
        let url = self.posts_url(criteria)?;
        self.get_json(url).await
    }

    async fn categories(&self) -> Result<Vec<Term>, FormError> {
        let url = self.url("itc/v1/categories")?;
        self.get_json(url).await
    }

    async fn tags(&self) -> Result<Vec<Term>, FormError> {
        let url = self.url("itc/v1/tags")?;
        self.get_json(url).await
    }
}

/// In-process services, used when the server renders the form itself.
#[derive(Clone)]
pub struct ServiceFilterApi {
    search: Arc<SearchService>,
    taxonomy: Arc<TaxonomyService>,
}

impl ServiceFilterApi {
    pub fn new(search: Arc<SearchService>, taxonomy: Arc<TaxonomyService>) -> Self {
        Self { search, taxonomy }
    }
}

#[async_trait]
impl FilterApi for ServiceFilterApi {
    async fn fetch_posts(&self, criteria: &FilterCriteria) -> Result<PostsPage, FormError> {
        self.search
            .search(criteria)
            .await
            .map(PostsPage::from)
            .map_err(|err| FormError::Service(err.to_string()))
    }

    async fn categories(&self) -> Result<Vec<Term>, FormError> {
        self.taxonomy
            .categories()
            .await
            .map_err(|err| FormError::Service(err.to_string()))
    }

    async fn tags(&self) -> Result<Vec<Term>, FormError> {
        self.taxonomy
            .tags()
            .await
            .map_err(|err| FormError::Service(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    #[test]
    fn posts_url_sends_every_parameter() {
        let api = HttpFilterApi::new("https://example.com/blog", Duration::from_secs(5)).unwrap();
        let criteria = FilterCriteria {
            keyword: "a b".into(),
            category: "news".into(),
            tags: vec!["foo".into(), "bar".into()],
            page: NonZeroU32::new(2).unwrap(),
        };

        let url = api.posts_url(&criteria).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/blog/itc/v1/posts/?keyword=a+b&category=news&tags=foo%2Cbar&page=2"
        );
    }

    #[test]
    fn invalid_site_is_rejected() {
        let err = HttpFilterApi::new("not a url", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, FormError::Url(_)));
    }
}
