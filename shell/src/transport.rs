//! Blocking HTTP transport.
//!
//! ureq's status-as-error behaviour is disabled so 4xx/5xx responses come
//! back as data for the core to interpret; only failures to get a response
//! at all become `ApiError::Network`.

use std::time::Duration;

use todo_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let result = match (req.method, req.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&req.path), req).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(&req.path), req).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&req.path), req).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&req.path), req).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                with_headers(self.agent.patch(&req.path), req).send(body.as_bytes())
            }
            (HttpMethod::Patch, None) => {
                with_headers(self.agent.patch(&req.path), req).send_empty()
            }
        };
        let mut response = result.map_err(|e| {
            tracing::error!(path = %req.path, error = %e, "transport failure");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(HttpResponse::new(status, body))
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, req: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
