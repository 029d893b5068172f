#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use itc_filter::application::{
    repos::{HealthRepo, PostSearchFilter, PostsRepo, RepoError, TermsRepo},
    search::SearchService,
    taxonomy::TaxonomyService,
};
use itc_filter::domain::entities::PostRecord;
use itc_filter::infra::http::HttpState;
use itc_filter_api_types::Term;
use time::{Duration, OffsetDateTime};

pub struct StoredCategory {
    pub name: &'static str,
    pub slug: &'static str,
    pub parent: Option<&'static str>,
}

pub struct StoredPost {
    pub record: PostRecord,
    pub published: bool,
    pub categories: Vec<&'static str>,
    pub tags: Vec<&'static str>,
}

/// Content store that applies search filters in memory.
#[derive(Default)]
pub struct InMemoryContent {
    pub posts: Vec<StoredPost>,
    pub categories: Vec<StoredCategory>,
    pub tags: Vec<Term>,
    pub fail_posts: AtomicBool,
    pub fail_terms: AtomicBool,
    pub time_out_posts: AtomicBool,
}

impl InMemoryContent {
    /// Seven published posts, one draft, a nested category tree and three tags.
    ///
    /// Post `n` is published `n` days after the epoch, so higher ids are newer.
    pub fn seeded() -> Self {
        let mut content = Self {
            categories: vec![
                StoredCategory {
                    name: "Uncategorized",
                    slug: "uncategorized",
                    parent: None,
                },
                StoredCategory {
                    name: "News",
                    slug: "news",
                    parent: None,
                },
                StoredCategory {
                    name: "Local News",
                    slug: "local",
                    parent: Some("news"),
                },
                StoredCategory {
                    name: "Events",
                    slug: "events",
                    parent: None,
                },
            ],
            tags: vec![term("Bar", "bar"), term("Baz", "baz"), term("Foo", "foo")],
            ..Self::default()
        };

        let seed: [(i64, &str, &'static str, &[&'static str]); 7] = [
            (1, "Rust async runtime", "news", &["foo"]),
            (2, "Harvest festival", "events", &["bar"]),
            (3, "Town hall update", "local", &["baz"]),
            (4, "Rust web frameworks", "news", &["foo", "bar"]),
            (5, "Summer concert", "events", &[]),
            (6, "Road works", "local", &["foo"]),
            (7, "General notes", "uncategorized", &[]),
        ];
        for (id, title, category, tags) in seed {
            content.posts.push(StoredPost {
                record: record(id, title, &lorem(50)),
                published: true,
                categories: vec![category],
                tags: tags.to_vec(),
            });
        }
        content.posts.push(StoredPost {
            record: record(99, "Rust draft", "unpublished"),
            published: false,
            categories: vec!["news"],
            tags: vec!["foo"],
        });
        content
    }

    fn descendants(&self, slug: &str) -> HashSet<&'static str> {
        let mut found: HashSet<&'static str> = self
            .categories
            .iter()
            .filter(|category| category.slug == slug)
            .map(|category| category.slug)
            .collect();
        loop {
            let before = found.len();
            for category in &self.categories {
                if category.parent.is_some_and(|parent| found.contains(parent)) {
                    found.insert(category.slug);
                }
            }
            if found.len() == before {
                return found;
            }
        }
    }

    fn matching(&self, filter: &PostSearchFilter) -> Vec<PostRecord> {
        let categories = filter
            .category
            .as_deref()
            .map(|slug| self.descendants(slug));

        let mut matches: Vec<PostRecord> = self
            .posts
            .iter()
            .filter(|post| post.published)
            .filter(|post| {
                filter.terms.iter().all(|term| {
                    let needle = term.to_lowercase();
                    [
                        &post.record.title,
                        &post.record.excerpt,
                        &post.record.body_markdown,
                    ]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
                })
            })
            .filter(|post| match &categories {
                Some(allowed) => post.categories.iter().any(|slug| allowed.contains(slug)),
                None => true,
            })
            .filter(|post| {
                filter.tags.is_empty()
                    || post
                        .tags
                        .iter()
                        .any(|slug| filter.tags.iter().any(|wanted| wanted == slug))
            })
            .map(|post| post.record.clone())
            .collect();

        matches.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        matches
    }
}

#[async_trait]
impl PostsRepo for InMemoryContent {
    async fn search_posts(
        &self,
        filter: &PostSearchFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<PostRecord>, RepoError> {
        if self.time_out_posts.load(Ordering::SeqCst) {
            return Err(RepoError::Timeout);
        }
        if self.fail_posts.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("posts unavailable"));
        }
        Ok(self
            .matching(filter)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_posts(&self, filter: &PostSearchFilter) -> Result<u64, RepoError> {
        if self.time_out_posts.load(Ordering::SeqCst) {
            return Err(RepoError::Timeout);
        }
        if self.fail_posts.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("posts unavailable"));
        }
        Ok(self.matching(filter).len() as u64)
    }
}

#[async_trait]
impl TermsRepo for InMemoryContent {
    async fn list_categories(&self) -> Result<Vec<Term>, RepoError> {
        if self.fail_terms.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("terms unavailable"));
        }
        let mut categories: Vec<Term> = self
            .categories
            .iter()
            .map(|category| term(category.name, category.slug))
            .collect();
        categories.sort_by_key(|term| term.name.to_lowercase());
        Ok(categories)
    }

    async fn list_tags(&self) -> Result<Vec<Term>, RepoError> {
        if self.fail_terms.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("terms unavailable"));
        }
        Ok(self.tags.clone())
    }
}

#[async_trait]
impl HealthRepo for InMemoryContent {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.fail_posts.load(Ordering::SeqCst) {
            Err(RepoError::Timeout)
        } else {
            Ok(())
        }
    }
}

pub fn term(name: &str, slug: &str) -> Term {
    Term {
        name: name.to_string(),
        slug: slug.to_string(),
    }
}

pub fn record(id: i64, title: &str, body: &str) -> PostRecord {
    PostRecord {
        id,
        title: title.to_string(),
        excerpt: String::new(),
        body_markdown: body.to_string(),
        published_at: Some(OffsetDateTime::UNIX_EPOCH + Duration::days(id)),
        thumbnail_url: (id % 2 == 0).then(|| format!("/thumbs/{id}-150x150.png")),
    }
}

/// `count` distinct words.
pub fn lorem(count: usize) -> String {
    (1..=count)
        .map(|n| format!("word{n}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn services(content: Arc<InMemoryContent>) -> (Arc<SearchService>, Arc<TaxonomyService>) {
    let search = Arc::new(SearchService::new(content.clone()));
    let taxonomy = Arc::new(TaxonomyService::new(
        content,
        vec!["uncategorized".to_string()],
    ));
    (search, taxonomy)
}

pub fn http_state(content: Arc<InMemoryContent>) -> HttpState {
    let (search, taxonomy) = services(content.clone());
    HttpState {
        search,
        taxonomy,
        health: content,
    }
}
