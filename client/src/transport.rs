//! Blocking `reqwest` implementation of the core `Transport`.
//!
//! One attempt per request, no retries. Non-2xx responses come back as data;
//! only failures that produced no response become `ApiError::Transport`.

use chemvision_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};
use reqwest::blocking::{multipart, Client};

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
        })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };
        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.body(body.clone()),
            // The form encoder writes the content type with its boundary.
            RequestBody::Multipart(file) => {
                let part = multipart::Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.content_type)
                    .map_err(transport_error)?;
                builder.multipart(multipart::Form::new().part(file.field.clone(), part))
            }
        };

        let response = builder.send().map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().map_err(transport_error)?;
        tracing::debug!(url = %request.url, status, "response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    tracing::warn!(error = %err, "transport failure");
    ApiError::Transport(err.to_string())
}
