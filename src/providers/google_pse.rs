//! Google Programmable Search Engine (Custom Search JSON API) provider

use super::traits::*;
use crate::config::Credentials;
use crate::results::RawResult;
use anyhow::Result as AnyhowResult;

/// The API rejects `num` above this
const MAX_NUM: usize = 10;

/// Google Custom Search JSON API
pub struct GooglePse {
    base_url: String,
}

impl GooglePse {
    pub fn new() -> Self {
        Self {
            base_url: "https://www.googleapis.com/customsearch/v1".to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for GooglePse {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for GooglePse {
    fn name(&self) -> &str {
        "google_pse"
    }

    fn required_credentials(&self) -> &'static [&'static str] {
        &["GOOGLE_PSE_KEY", "GOOGLE_PSE_CX"]
    }

    fn request(&self, params: &RequestParams, credentials: &Credentials) -> AnyhowResult<ProviderRequest> {
        let key = require(credentials, "GOOGLE_PSE_KEY")?;
        let cx = require(credentials, "GOOGLE_PSE_CX")?;

        Ok(ProviderRequest::get(&self.base_url)
            .header("Accept", "application/json")
            .param("key", key)
            .param("cx", cx)
            .param("q", &params.query)
            .param("num", params.max_results.min(MAX_NUM).to_string()))
    }

    fn response(&self, response: ProviderResponse) -> AnyhowResult<Vec<RawResult>> {
        response.ensure_success()?;

        let json: serde_json::Value = response.json()?;
        let results = json
            .get("items")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .map(|item| RawResult {
                        title: str_field(item, "title"),
                        url: str_field(item, "link"),
                        snippet: str_field(item, "snippet"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(results)
    }
}
