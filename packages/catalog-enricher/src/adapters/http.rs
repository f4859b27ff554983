use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::error::{EnrichError, Result};
use crate::traits::{LinkChecker, LinkStatus};

const CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// [`LinkChecker`] issuing a `HEAD` request, following redirects.
#[derive(Clone)]
pub struct HttpLinkChecker {
    client: reqwest::Client,
}

impl HttpLinkChecker {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(CHECK_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| EnrichError::LinkCheck {
                url: String::new(),
                source: Box::new(e),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LinkChecker for HttpLinkChecker {
    async fn check(&self, url: &str) -> Result<LinkStatus> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| EnrichError::LinkCheck {
                url: url.to_string(),
                source: Box::new(e),
            })?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(LinkStatus {
            status: response.status().as_u16(),
            content_type,
        })
    }
}
