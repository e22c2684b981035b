use std::sync::Arc;
use std::time::Duration;

use hyper::body::{Bytes, to_bytes};
use hyper::client::HttpConnector;
use hyper::header::{CONTENT_TYPE, HeaderName, RETRY_AFTER};
use hyper::{Body, Client, Request, StatusCode, Uri};
use hyper_rustls::HttpsConnector;
use rustls::{ClientConfig, OwnedTrustAnchor, RootCertStore};
use tokio::time::timeout;
use tracing::debug;
use webpki_roots::TLS_SERVER_ROOTS;

use crate::traits::{AdapterError, AdapterResult};

pub(crate) type HyperClient = Client<HttpsConnector<HttpConnector>, Body>;

const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// HTTPS-capable client shared by the HTTP adapters. Plain `http://` works too
/// so a local Ollama daemon can be reached.
pub(crate) fn build_https_client() -> HyperClient {
    let mut roots = RootCertStore::empty();
    roots.add_trust_anchors(TLS_SERVER_ROOTS.iter().map(|anchor| {
        OwnedTrustAnchor::from_subject_spki_name_constraints(
            anchor.subject,
            anchor.spki,
            anchor.name_constraints,
        )
    }));

    let config = ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let mut http = HttpConnector::new();
    http.enforce_http(false);

    let connector = HttpsConnector::from((http, Arc::new(config)));

    Client::builder()
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .build::<_, Body>(connector)
}

/// Validates and normalises a provider base URL (scheme required, trailing slash added).
pub(crate) fn sanitize_base_url(provider: &str, input: &str) -> AdapterResult<String> {
    let mut base = input.trim().to_owned();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(AdapterError::configuration(format!(
            "{provider} base URL must start with http:// or https://"
        )));
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    base.parse::<Uri>().map_err(|err| {
        AdapterError::configuration(format!("invalid {provider} base URL: {err}"))
    })?;
    Ok(base)
}

/// Posts a JSON body and returns the raw success payload.
///
/// `429` responses become [`AdapterError::RateLimited`] and any other
/// non-success status becomes [`AdapterError::Response`].
pub(crate) async fn post_json(
    client: &HyperClient,
    provider: &str,
    endpoint: Uri,
    headers: &[(HeaderName, String)],
    body: Vec<u8>,
    limit: Duration,
) -> AdapterResult<Bytes> {
    let mut builder = Request::post(endpoint).header(CONTENT_TYPE, "application/json");
    for (name, value) in headers {
        builder = builder.header(name, value.as_str());
    }
    let request = builder.body(Body::from(body)).map_err(|err| {
        AdapterError::transport(format!("failed to build {provider} request: {err}"))
    })?;

    let response = timeout(limit, client.request(request))
        .await
        .map_err(|_| AdapterError::transport(format!("{provider} request timed out")))?
        .map_err(|err| AdapterError::transport(format!("{provider} request failed: {err}")))?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        return Err(AdapterError::RateLimited { retry_after });
    }

    let bytes = to_bytes(response.into_body()).await.map_err(|err| {
        AdapterError::transport(format!("failed to read {provider} response: {err}"))
    })?;
    debug!(provider, status = %status, bytes = bytes.len(), "provider responded");

    if !status.is_success() {
        let reason = String::from_utf8_lossy(&bytes).to_string();
        return Err(AdapterError::response(format!(
            "{provider} returned {status}: {reason}"
        )));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_requires_scheme() {
        sanitize_base_url("Gemini", "example.com").expect_err("missing scheme");
        assert_eq!(
            sanitize_base_url("Gemini", " https://example.com/api ").unwrap(),
            "https://example.com/api/"
        );
    }
}
