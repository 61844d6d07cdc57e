use std::env;
use std::time::Duration;

const ENV_REGISTRY_BASE_URL: &str = "BIOTOOLS_BASE_URL";
const ENV_REGISTRY_TOKEN: &str = "BIOTOOLS_TOKEN";
const ENV_ONTOLOGY_BASE_URL: &str = "BIOPORTAL_BASE_URL";

const DEFAULT_REGISTRY_BASE_URL: &str = "https://bio.tools";
const DEFAULT_ONTOLOGY_BASE_URL: &str = "http://bioportal.bioontology.org/ontologies/EDAM";

/// Per-request timeout for registry submissions.
const SUBMIT_TIMEOUT_SECS: u64 = 10;

/// Registry API endpoint configuration.
///
/// The token authenticates write access and is only required by the submit
/// path; extraction and page download run without it.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

/// Ontology browser endpoint used for preferred-label lookups.
#[derive(Debug, Clone)]
pub struct OntologyConfig {
    pub base_url: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub registry: RegistryConfig,
    pub ontology: OntologyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: RegistryConfig {
                base_url: DEFAULT_REGISTRY_BASE_URL.to_string(),
                token: None,
                timeout: Duration::from_secs(SUBMIT_TIMEOUT_SECS),
            },
            ontology: OntologyConfig {
                base_url: DEFAULT_ONTOLOGY_BASE_URL.to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Base URLs fall back to the public bio.tools / BioPortal endpoints
    /// when the corresponding variable is unset, so tests can point both
    /// clients at local doubles.
    pub fn from_env() -> Self {
        let registry_base = env::var(ENV_REGISTRY_BASE_URL)
            .ok()
            .unwrap_or_else(|| DEFAULT_REGISTRY_BASE_URL.to_string());

        let ontology_base = env::var(ENV_ONTOLOGY_BASE_URL)
            .ok()
            .unwrap_or_else(|| DEFAULT_ONTOLOGY_BASE_URL.to_string());

        let token = env::var(ENV_REGISTRY_TOKEN).ok().filter(|t| !t.is_empty());

        Self {
            registry: RegistryConfig {
                base_url: registry_base,
                token,
                timeout: Duration::from_secs(SUBMIT_TIMEOUT_SECS),
            },
            ontology: OntologyConfig {
                base_url: ontology_base,
            },
        }
    }
}
