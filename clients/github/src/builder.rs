use crate::GithubClient;
use anyhow::Context;
use log::debug;
use repo_miner::Result;
use reqwest::header;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use url::Url;

const GITHUB_URL: &str = "https://api.github.com";

pub struct GithubClientBuilder {
    client_builder: ClientBuilder,
    github_url: String,
    headers: HeaderMap,
}

impl Default for GithubClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::default();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(concat!("repo_miner/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        Self {
            client_builder: ClientBuilder::default(),
            github_url: GITHUB_URL.to_string(),
            headers,
        }
    }
}

impl GithubClientBuilder {
    pub fn try_with_token(self, token: secrecy::SecretString) -> Result<GithubClientBuilder> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .context("API token is not a valid header value")?;
        value.set_sensitive(true);
        Ok(self.with_header(header::AUTHORIZATION, value))
    }

    pub fn with_github_url<STR: AsRef<str>>(mut self, url: STR) -> GithubClientBuilder {
        self.github_url = url.as_ref().to_string();
        self
    }

    fn with_header(mut self, key: HeaderName, val: HeaderValue) -> GithubClientBuilder {
        self.headers.insert(key, val);
        self
    }

    pub fn build(self) -> Result<GithubClient> {
        let github_url =
            Url::parse(&self.github_url).with_context(|| format!("Invalid API URL {}", self.github_url))?;
        if github_url.cannot_be_a_base() {
            return Err(anyhow::anyhow!("API URL {} cannot be a base URL", github_url).into());
        }
        let client = self
            .client_builder
            .default_headers(self.headers)
            .build()
            .context("Failed to build HTTP client")?;
        debug!("Built client for {}", github_url);
        Ok(GithubClient { client, github_url })
    }
}
