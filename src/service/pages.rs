//! Paginated download of the registry's XML tool listing
//!
//! The registry serves 25 tools per page; the total count is read from the
//! first page's `<count>` element and every page is saved to `page<N>.xml`.

use std::fs;
use std::path::Path;

use regex::Regex;
use reqwest::Client;

use crate::model::RegistryConfig;

const PAGE_SIZE: usize = 25;

#[derive(Debug, thiserror::Error)]
pub enum PagesError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("listing response carries no <count> element")]
    CountMissing,

    #[error("failed to write page file: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads the registry's paginated XML listing.
pub struct PageDownloader {
    client: Client,
    base_url: String,
    count_pattern: Regex,
}

impl PageDownloader {
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("biotools-harvest/0.1")
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.base_url.clone(),
            count_pattern: Regex::new(r"<count>(\d+)</count>").unwrap(),
        }
    }

    /// Fetch all listing pages into `out_dir`. Returns the page count.
    pub async fn download_all(&self, out_dir: &Path) -> Result<usize, PagesError> {
        let first = self.fetch_page(None).await?;
        let count = self.parse_count(&first)?;
        let pages = pages_for(count);

        tracing::info!(tools = count, pages, "Downloading registry listing");

        for page in 1..=pages {
            let body = self.fetch_page(Some(page)).await?;
            let path = out_dir.join(format!("page{}.xml", page));
            fs::write(&path, body)?;
            tracing::info!(page, pages, path = %path.display(), "Saved listing page");
        }

        Ok(pages)
    }

    async fn fetch_page(&self, page: Option<usize>) -> Result<String, PagesError> {
        let url = match page {
            Some(page) => format!("{}/api/tool/?page={}&format=xml", self.base_url, page),
            None => format!("{}/api/tool/?format=xml", self.base_url),
        };
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    fn parse_count(&self, xml: &str) -> Result<usize, PagesError> {
        self.count_pattern
            .captures(xml)
            .and_then(|captures| captures.get(1))
            .and_then(|count| count.as_str().parse::<usize>().ok())
            .ok_or(PagesError::CountMissing)
    }
}

fn pages_for(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}
