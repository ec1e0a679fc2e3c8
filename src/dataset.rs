use url::Url;

use crate::formats::StoryCollection;
use crate::language::LanguageCode;

pub const LANGUAGE_PLACEHOLDER: &str = "{lang}";

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("invalid dataset url {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("GET {url}: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {url} returned {status}")]
    Status {
        url: Url,
        status: reqwest::StatusCode,
    },
    #[error("decode dataset from {url}: {source}")]
    Decode {
        url: Url,
        #[source]
        source: serde_json::Error,
    },
}

/// Where story datasets come from.
pub trait DatasetSource: Send + Sync {
    fn fetch(&self, source: &LanguageCode) -> Result<StoryCollection, DatasetError>;
}

/// Fetches `{lang}`-templated JSON documents over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDatasetSource {
    url_template: String,
}

impl HttpDatasetSource {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
        }
    }

    pub fn url_for(&self, source: &LanguageCode) -> Result<Url, DatasetError> {
        dataset_url(&self.url_template, source)
    }
}

impl DatasetSource for HttpDatasetSource {
    fn fetch(&self, source: &LanguageCode) -> Result<StoryCollection, DatasetError> {
        let url = self.url_for(source)?;
        tracing::info!(%url, "fetch dataset");

        // The blocking client owns a runtime of its own; keep it scoped to the call.
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| DatasetError::Request {
                url: url.clone(),
                source,
            })?;

        let response = client
            .get(url.clone())
            .send()
            .map_err(|source| DatasetError::Request {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(DatasetError::Status { url, status });
        }

        let body = response.text().map_err(|source| DatasetError::Request {
            url: url.clone(),
            source,
        })?;
        let collection: StoryCollection =
            serde_json::from_str(&body).map_err(|source| DatasetError::Decode {
                url: url.clone(),
                source,
            })?;

        tracing::debug!(
            %url,
            chapters = collection.chapters.len(),
            app_words = collection.app_words.len(),
            "decoded dataset"
        );
        Ok(collection)
    }
}

pub fn dataset_url(template: &str, source: &LanguageCode) -> Result<Url, DatasetError> {
    let raw = template.replace(LANGUAGE_PLACEHOLDER, source.as_str());
    Url::parse(&raw).map_err(|source| DatasetError::Url { url: raw, source })
}
