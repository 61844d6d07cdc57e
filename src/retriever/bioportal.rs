//! BioPortal class-view lookup for EDAM preferred labels

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use super::{LabelResolver, LookupError};
use crate::model::OntologyConfig;

/// Query-string template parameters for the BioPortal class view. The
/// concept is addressed by its EDAM namespace URI, percent-encoded once.
const CLASS_VIEW_QUERY: &str = "?p=classes&conceptid=http%3A%2F%2Fedamontology.org%2F";

/// Client for the BioPortal ontology browser.
///
/// Looks up the canonical preferred label of an EDAM concept by fetching the
/// rendered class view and extracting the first `span.prefLabel` element.
pub struct BioPortalClient {
    client: Client,
    base_url: String,
    pref_label: Selector,
}

impl BioPortalClient {
    pub fn new(config: &OntologyConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("biotools-harvest/0.1")
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.base_url.clone(),
            pref_label: Selector::parse("span.prefLabel").unwrap(),
        }
    }

    /// Build the class-view URL for a concept URI.
    ///
    /// Only the final path segment of the concept URI is substituted into
    /// the template; the rest of the namespace is fixed.
    fn class_view_url(&self, concept_uri: &str) -> Result<Url, LookupError> {
        let local_id = concept_uri.rsplit('/').next().unwrap_or(concept_uri);
        let raw = format!("{}{}{}", self.base_url, CLASS_VIEW_QUERY, local_id);
        Ok(Url::parse(&raw)?)
    }

    fn extract_pref_label(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.pref_label)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|label| !label.is_empty())
    }
}

#[async_trait]
impl LabelResolver for BioPortalClient {
    async fn preferred_label(&self, uri: &str) -> Result<String, LookupError> {
        let lookup_url = self.class_view_url(uri)?;

        tracing::debug!(concept = %uri, url = %lookup_url, "Resolving preferred label");

        let response = self
            .client
            .get(lookup_url)
            .send()
            .await?
            .error_for_status()?;

        let html = response.text().await?;

        self.extract_pref_label(&html)
            .ok_or_else(|| LookupError::MissingLabel(uri.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> BioPortalClient {
        BioPortalClient::new(&OntologyConfig {
            base_url: "http://bioportal.bioontology.org/ontologies/EDAM".to_string(),
        })
    }

    #[test]
    fn class_view_url_uses_final_path_segment() {
        let client = test_client();
        let url = client
            .class_view_url("http://edamontology.org/topic_0091")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://bioportal.bioontology.org/ontologies/EDAM?p=classes&conceptid=http%3A%2F%2Fedamontology.org%2Ftopic_0091"
        );
    }

    #[test]
    fn pref_label_takes_first_match() {
        let client = test_client();
        let html = r#"<html><body>
            <span class="prefLabel">Bioinformatics</span>
            <span class="prefLabel">Something else</span>
        </body></html>"#;
        assert_eq!(
            client.extract_pref_label(html).as_deref(),
            Some("Bioinformatics")
        );
    }

    #[test]
    fn missing_pref_label_yields_none() {
        let client = test_client();
        assert!(client.extract_pref_label("<html><body></body></html>").is_none());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn resolves_known_edam_topic() {
        let client = test_client();
        let label = client
            .preferred_label("http://edamontology.org/topic_0091")
            .await;
        assert!(label.is_ok());
    }
}
