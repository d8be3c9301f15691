use crate::model::{SessionConfig, SlugOptionsResponse};
use anyhow::{Context, Result};
use reqwest::Url;

/// Where slug suggestions are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugEndpoint {
    url: Url,
}

impl SlugEndpoint {
    pub fn parse(url: &str) -> Result<Self> {
        let url = Url::parse(url).with_context(|| format!("invalid slug endpoint url: {url}"))?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[derive(Debug, Clone)]
pub struct SlugClient {
    pub http: reqwest::Client,
    pub endpoint: SlugEndpoint,
}

impl SlugClient {
    pub fn new(cfg: &SessionConfig) -> Result<Self> {
        let endpoint = SlugEndpoint::parse(&cfg.slug_endpoint)?;
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.request_timeout)
            .build()
            .context("build reqwest client")?;
        Ok(Self { http, endpoint })
    }

    /// POST `reportContext=<json>` and return the suggested slugs.
    pub async fn fetch_options(&self, report_context: &serde_json::Value) -> Result<Vec<String>> {
        let payload =
            serde_json::to_string(report_context).context("serialize report context")?;
        let resp = self
            .http
            .post(self.endpoint.url().clone())
            .form(&[("reportContext", payload)])
            .send()
            .await
            .with_context(|| format!("POST {}", self.endpoint.url()))?;
        let resp = resp
            .error_for_status()
            .context("slug endpoint status")?;
        let body: SlugOptionsResponse = resp
            .json()
            .await
            .context("decode slug options response")?;
        Ok(body.options)
    }
}
