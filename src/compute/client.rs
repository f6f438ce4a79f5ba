//! Blocking REST client for Compute Engine firewall rules.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{AccessToken, FirewallApi, FirewallPage, Operation};
use crate::config::ClientConfig;
use crate::rule::RuleDescriptor;
use crate::{Error, Result};

/// Compute API client.
///
/// One HTTP request per trait call, no retries. Non-2xx responses are
/// decoded into [`Error::Remote`].
pub struct ComputeClient {
    http: Client,
    /// Base URL, e.g. `https://compute.googleapis.com/compute/v1`
    endpoint: Url,
    token: AccessToken,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<u16>,
    #[serde(default)]
    message: String,
}

impl ComputeClient {
    /// Create a client.
    pub fn new(config: &ClientConfig, token: AccessToken) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| Error::InvalidEndpoint(format!("{}: {}", config.endpoint, e)))?;
        if endpoint.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint(config.endpoint.clone()));
        }

        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    /// Endpoint URL extended by `segments`, each percent-encoded as a
    /// single path segment.
    fn url_with(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidEndpoint(self.endpoint.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Collection URL of a project's firewall rules.
    fn firewalls_url(&self, project: &str) -> Result<Url> {
        self.url_with(&["projects", project, "global", "firewalls"])
    }

    /// URL of a single firewall rule.
    fn firewall_url(&self, project: &str, rule_name: &str) -> Result<Url> {
        self.url_with(&["projects", project, "global", "firewalls", rule_name])
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.bearer_auth(self.token.as_str()).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(remote_error(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl FirewallApi for ComputeClient {
    fn list_rules(&self, project: &str, page_token: Option<&str>) -> Result<FirewallPage> {
        let mut request = self.http.get(self.firewalls_url(project)?);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        self.send(request)
    }

    fn insert_rule(&self, project: &str, rule: &RuleDescriptor) -> Result<Operation> {
        let request = self.http.post(self.firewalls_url(project)?).json(rule);
        self.send(request)
    }

    fn delete_rule(&self, project: &str, rule_name: &str) -> Result<Operation> {
        let request = self.http.delete(self.firewall_url(project, rule_name)?);
        self.send(request)
    }
}

/// Build a remote error from a failed response body.
///
/// Falls back to the raw body when it is not the API's error envelope.
fn remote_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => Error::Remote {
            status: envelope.error.code.unwrap_or(status),
            message: envelope.error.message,
        },
        Err(_) => Error::Remote {
            status,
            message: body.trim().to_string(),
        },
    }
}
