// src/client/http.rs
use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::header::{HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use hyper::{Body, Client, Method, Request};
use hyper_tls::HttpsConnector;

use crate::client::handle::QueryHandle;
use crate::config::ServiceConfig;
use crate::domain::errors::{ClientError, ClientResult};
use crate::domain::models::StateResponse;

/// Read-only query interface against the state service.
#[async_trait]
pub trait StateQuery: Send + Sync {
    /// Begin a cancelable snapshot fetch.
    fn query_state(&self) -> QueryHandle<StateResponse>;

    /// Fetch a snapshot and await it in one step.
    async fn get_state(&self) -> ClientResult<StateResponse> {
        self.query_state().await
    }
}

/// HTTP implementation of the state service client.
///
/// Each call builds a fresh `GET` against the configured root endpoint: no
/// retries, no caching, no shared state between calls.
pub struct HttpStateClient {
    client: Client<HttpsConnector<HttpConnector>>,
    endpoint: hyper::Uri,
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl HttpStateClient {
    /// Build a client from configuration, validating the base URL and any
    /// injected header material up front.
    pub fn new(config: &ServiceConfig) -> ClientResult<Self> {
        let endpoint: hyper::Uri = config.base_url.parse().map_err(|e| {
            ClientError::Config(format!("Invalid base URL {:?}: {}", config.base_url, e))
        })?;

        let mut headers = Vec::new();
        if let Some(token) = &config.auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClientError::Config(format!("Invalid auth token: {}", e)))?;
            headers.push((AUTHORIZATION, value));
        }
        for (name, value) in &config.headers {
            let name = name
                .parse::<HeaderName>()
                .map_err(|e| ClientError::Config(format!("Invalid header name {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::Config(format!("Invalid header value: {}", e)))?;
            headers.push((name, value));
        }

        let https = HttpsConnector::new();
        let client = Client::builder().build::<_, Body>(https);

        Ok(Self {
            client,
            endpoint,
            headers,
        })
    }

    fn build_request(&self) -> ClientResult<Request<Body>> {
        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(self.endpoint.clone())
            .header(ACCEPT, "application/json");
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        Ok(builder.body(Body::empty())?)
    }
}

#[async_trait]
impl StateQuery for HttpStateClient {
    fn query_state(&self) -> QueryHandle<StateResponse> {
        match self.build_request() {
            Ok(request) => QueryHandle::spawn(fetch_state(self.client.clone(), request)),
            // Construction already validated the parts, but a builder
            // failure still has to surface through the handle.
            Err(e) => QueryHandle::spawn(async move { Err(e) }),
        }
    }
}

/// Perform one snapshot request and decode the body.
async fn fetch_state(
    client: Client<HttpsConnector<HttpConnector>>,
    request: Request<Body>,
) -> ClientResult<StateResponse> {
    log::debug!("GET {}", request.uri());

    let response = client.request(request).await?;
    let status = response.status();
    let body = hyper::body::to_bytes(response.into_body()).await?;

    if !status.is_success() {
        return Err(ClientError::Api {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    log::debug!("state response: {} bytes", body.len());
    let state = serde_json::from_slice(&body)?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    fn config(base_url: &str) -> ServiceConfig {
        ServiceConfig {
            base_url: base_url.to_string(),
            auth_token: None,
            headers: Vec::new(),
        }
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = HttpStateClient::new(&config("not a url")).err().unwrap();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn rejects_invalid_header_material() {
        let mut cfg = config("http://127.0.0.1:8000");
        cfg.headers = vec![("bad header name".to_string(), "x".to_string())];
        let err = HttpStateClient::new(&cfg).err().unwrap();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn injects_auth_and_extra_headers() {
        let mut cfg = config("https://state.example.com");
        cfg.auth_token = Some("secret".to_string());
        cfg.headers = vec![("x-api-key".to_string(), "abc".to_string())];

        let client = HttpStateClient::new(&cfg).unwrap();
        let request = client.build_request().unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.uri().path(), "/");
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer secret"
        );
        assert_eq!(request.headers().get("x-api-key").unwrap(), "abc");
    }
}
