//! Blocking HTTP client for the Vault API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value;
use url::Url;

use crate::errors::{Error, Result};
use crate::rt;
use crate::vault::VaultWriter;

const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder wrapping the `reqwest::ClientBuilder` options we surface to
/// provisioning callers.
#[derive(Clone, Debug, Default)]
pub struct HttpVaultClientBuilder {
    address: String,
    token: String,
    timeout: Option<Duration>,
    danger_accept_invalid_certs: bool,
}

impl HttpVaultClientBuilder {
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    pub fn danger_accept_invalid_certs(mut self, on: bool) -> Self {
        self.danger_accept_invalid_certs = on;
        self
    }

    pub fn build(self) -> Result<HttpVaultClient> {
        let address =
            Url::parse(&self.address).map_err(|err| Error::Transport(err.into()))?;

        let mut token = HeaderValue::from_str(&self.token)
            .map_err(|err| Error::Transport(err.into()))?;
        token.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(VAULT_TOKEN_HEADER, token);

        let http = Client::builder()
            .use_rustls_tls()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs)
            .default_headers(headers)
            .build()
            .map_err(|err| Error::Transport(err.into()))?;

        Ok(HttpVaultClient { http, address })
    }
}

/// Synchronous facade over the async reqwest client, authenticated with a
/// vault token. Cloning shares the underlying connection pool.
#[derive(Clone, Debug)]
pub struct HttpVaultClient {
    http: Client,
    address: Url,
}

impl HttpVaultClient {
    /// Client for `address` authenticated with `token`, default timeout.
    pub fn new(address: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::builder().address(address).token(token).build()
    }

    pub fn builder() -> HttpVaultClientBuilder {
        HttpVaultClientBuilder::default()
    }

    /// Backend base address this client talks to.
    pub fn address(&self) -> &Url {
        &self.address
    }
}

impl VaultWriter for HttpVaultClient {
    fn put_policy(&self, name: &str, rules: &str) -> Result<()> {
        let path = format!("/v1/sys/policy/{name}");
        self.write(Method::PUT, &path, &serde_json::json!({ "policy": rules }))?;
        Ok(())
    }

    fn write(&self, method: Method, path: &str, body: &Value) -> Result<Value> {
        let url = self
            .address
            .join(path)
            .map_err(|err| Error::Transport(err.into()))?;

        rt::sync_await(async {
            let response = self
                .http
                .request(method.clone(), url)
                .json(body)
                .send()
                .await
                .map_err(|err| Error::Transport(err.into()))?;

            let status = response.status();
            tracing::debug!(%method, path, status = status.as_u16(), "vault write");

            let text = response
                .text()
                .await
                .map_err(|err| Error::Transport(err.into()))?;
            if !status.is_success() {
                return Err(Error::UnexpectedStatus {
                    status: status.as_u16(),
                    body: text,
                });
            }
            if text.is_empty() {
                return Ok(Value::Null);
            }
            Ok(serde_json::from_str(&text)?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_address() {
        let err = HttpVaultClient::new("not a url", "token").unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn joins_paths_against_the_base_address() {
        let client = HttpVaultClient::new("http://127.0.0.1:8200", "token").unwrap();
        let joined = client.address().join("/v1/sys/policy/demo").unwrap();
        assert_eq!(joined.as_str(), "http://127.0.0.1:8200/v1/sys/policy/demo");
    }
}
