//! In-memory fetcher for engine tests

use crate::config::Config;
use crate::engine::{FetchError, PageFetcher};
use crate::extract::Department;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Serves canned pages by exact URL; unknown URLs are 404s
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    pages: HashMap<String, String>,
    broken: HashSet<String>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    /// Makes `url` fail with a network error
    pub fn broken(mut self, url: &str) -> Self {
        self.broken.insert(url.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == url).count()
    }
}

#[async_trait]
impl PageFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }

        if self.broken.contains(url) {
            return Err(FetchError::Network {
                url: url.to_string(),
                message: "connection reset".to_string(),
            });
        }

        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Canonical search results page listing `items` as (title, href) pairs
pub fn canonical_page(total: u64, items: &[(&str, &str)]) -> String {
    let entries: String = items
        .iter()
        .map(|(title, href)| {
            format!(
                r#"<li class="gem-c-document-list__item">
                    <a class="govuk-link" href="{href}">{title}</a>
                    <p class="gem-c-document-list__item-description">About {title}</p>
                    <ul class="gem-c-document-list__item-metadata"><li>Updated: 2 May 2024</li></ul>
                </li>"#
            )
        })
        .collect();

    format!(
        r#"<html><body>
            <div class="result-info__header">{total} results</div>
            <div class="finder-results js-finder-results"><ul>{entries}</ul></div>
        </body></html>"#
    )
}

/// Satellite listing page with one dated article per (title, href) pair
pub fn satellite_page(items: &[(&str, &str)]) -> String {
    let entries: String = items
        .iter()
        .map(|(title, href)| {
            format!(
                r#"<article><a href="{href}">{title}</a><time class="entry-date">5 Jan 23</time></article>"#
            )
        })
        .collect();

    format!(r#"<html><body><main class="site-main">{entries}</main></body></html>"#)
}

/// Config with one department and no satellite sources
pub fn test_config(base_url: &str) -> Config {
    let mut config = Config {
        departments: vec![Department {
            title: "Department for Testing".to_string(),
            link: format!("{}/government/organisations/department-for-testing", base_url),
            works_with: Vec::new(),
        }],
        ..Config::default()
    };
    config.canonical.base_url = base_url.to_string();
    config
}
