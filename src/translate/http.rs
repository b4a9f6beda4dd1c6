//! Remote translation model client.
//!
//! Posts block batches to a translation inference endpoint as JSON and reads
//! back the translated blocks. Connection-level failures surface as
//! [`TranslateError::ModelUnavailable`]; anything the endpoint itself
//! rejects surfaces as [`TranslateError::Model`].

use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::translate::{BlockText, TranslateError, Translator};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct TranslateRequest<'a> {
    model: &'a str,
    source_language: &'a str,
    target_language: &'a str,
    blocks: &'a [BlockText],
}

#[derive(Deserialize)]
struct TranslateResponse {
    blocks: Vec<BlockText>,
}

pub struct HttpTranslator {
    /// Built on first use. Translation always runs on a blocking worker
    /// thread, which is the only context the blocking client may live in.
    client: OnceCell<reqwest::blocking::Client>,
    endpoint: String,
    model: String,
    source_language: String,
    target_language: String,
}

impl HttpTranslator {
    #[must_use]
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            client: OnceCell::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    fn client(&self) -> Result<&reqwest::blocking::Client, TranslateError> {
        self.client.get_or_try_init(|| {
            reqwest::blocking::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .map_err(|e| TranslateError::ModelUnavailable {
                    message: e.to_string(),
                })
        })
    }
}

impl Translator for HttpTranslator {
    fn translate(&self, blocks: &[BlockText]) -> Result<Vec<BlockText>, TranslateError> {
        debug!(count = blocks.len(), "sending translation batch");

        let request = TranslateRequest {
            model: &self.model,
            source_language: &self.source_language,
            target_language: &self.target_language,
            blocks,
        };

        let response = self
            .client()?
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    TranslateError::ModelUnavailable {
                        message: e.to_string(),
                    }
                } else {
                    TranslateError::Model {
                        message: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            return Err(TranslateError::Model {
                message: format!("endpoint returned status {}", response.status()),
            });
        }

        let body: TranslateResponse = response.json().map_err(|e| TranslateError::Model {
            message: format!("invalid response body: {e}"),
        })?;

        Ok(body.blocks)
    }
}
