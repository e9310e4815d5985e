//! Stateless HTTP request builder and response parser for the ChemVision API.
//!
//! # Design
//! `ChemVisionClient` holds only where the backend lives and which route
//! family it speaks. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. A [`Transport`](crate::http::Transport) executes the
//! round-trip in between, keeping this module deterministic and free of I/O.

use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::{BaseUrl, Endpoint, RouteFamily, UrlContext};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, MultipartFile, RequestBody, CORRELATION_ID_HEADER};
use crate::normalize::normalize;
use crate::types::{
    ConversionRequest, HealthStatus, ImageFile, NameResult, NameToStructureBody, StructureResult,
    StructureToNameBody,
};

/// Multipart field the backend reads the uploaded image from.
pub const IMAGE_FIELD: &str = "image";

/// Synchronous, stateless client for the ChemVision API.
#[derive(Debug, Clone)]
pub struct ChemVisionClient {
    base_url: BaseUrl,
    routes: RouteFamily,
}

impl ChemVisionClient {
    /// Client bound to a fixed base URL using the default route family.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: BaseUrl::Fixed(base_url.to_string()),
            routes: RouteFamily::default(),
        }
    }

    /// Client that re-reads the base URL from the environment on every build.
    pub fn from_env(context: UrlContext) -> Self {
        Self::with_base_url(BaseUrl::Env(context))
    }

    pub fn with_base_url(base_url: BaseUrl) -> Self {
        Self {
            base_url,
            routes: RouteFamily::default(),
        }
    }

    pub fn with_routes(mut self, routes: RouteFamily) -> Self {
        self.routes = routes;
        self
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url.resolve(), self.routes.path(endpoint))
    }

    pub fn build_image_to_structure(&self, image: &ImageFile) -> HttpRequest {
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: self.url(Endpoint::ImageToStructure),
            headers: vec![correlation_header()],
            body: RequestBody::Multipart(MultipartFile {
                field: IMAGE_FIELD.to_string(),
                file_name: image.file_name.clone(),
                content_type: image.content_type.clone(),
                bytes: image.bytes.clone(),
            }),
        };
        tracing::debug!(url = %request.url, size = image.size(), "built image-to-structure request");
        request
    }

    pub fn build_name_to_structure(&self, name: &str) -> Result<HttpRequest, ApiError> {
        let body = NameToStructureBody {
            name: name.to_string(),
        };
        self.build_json(Endpoint::NameToStructure, &body)
    }

    pub fn build_structure_to_name(&self, smiles: &str) -> Result<HttpRequest, ApiError> {
        let body = StructureToNameBody {
            smiles: smiles.to_string(),
        };
        self.build_json(Endpoint::StructureToName, &body)
    }

    pub fn build_health(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url(Endpoint::Health),
            headers: vec![correlation_header()],
            body: RequestBody::Empty,
        }
    }

    /// Build the request for any conversion.
    pub fn build(&self, request: &ConversionRequest) -> Result<HttpRequest, ApiError> {
        match request {
            ConversionRequest::Image(image) => Ok(self.build_image_to_structure(image)),
            ConversionRequest::Name(name) => self.build_name_to_structure(name),
            ConversionRequest::Structure(smiles) => self.build_structure_to_name(smiles),
        }
    }

    fn build_json<B: serde::Serialize>(&self, endpoint: Endpoint, body: &B) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: self.url(endpoint),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                correlation_header(),
            ],
            body: RequestBody::Json(body),
        };
        tracing::debug!(url = %request.url, "built json request");
        Ok(request)
    }

    /// Parse the answer of image→structure or name→structure.
    pub fn parse_structure(&self, response: HttpResponse) -> Result<StructureResult, ApiError> {
        parse_json(response)
    }

    /// Parse the answer of structure→name.
    pub fn parse_name(&self, response: HttpResponse) -> Result<NameResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_health(&self, response: HttpResponse) -> Result<HealthStatus, ApiError> {
        parse_json(response)
    }
}

fn correlation_header() -> (String, String) {
    (CORRELATION_ID_HEADER.to_string(), Uuid::new_v4().to_string())
}

/// Map non-2xx responses to the normalized backend error.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let err = normalize(response);
    tracing::warn!(
        status = err.status_code,
        error_code = %err.error_code,
        correlation_id = %err.correlation_id,
        "backend rejected request"
    );
    Err(ApiError::Backend(err))
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
