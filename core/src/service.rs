//! The three conversion operations, wired to a transport.

use crate::client::ChemVisionClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{ConversionRequest, HealthStatus, ImageFile, NameResult, StructureResult};

/// Outcome of [`ConversionApi::convert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    Structure(StructureResult),
    Name(NameResult),
}

/// What the forms need from a backend.
///
/// A non-2xx answer surfaces as `ApiError::Backend`; anything else that goes
/// wrong uses the untyped variants.
pub trait ConversionApi {
    fn image_to_structure(&self, image: &ImageFile) -> Result<StructureResult, ApiError>;

    fn name_to_structure(&self, name: &str) -> Result<StructureResult, ApiError>;

    fn structure_to_name(&self, smiles: &str) -> Result<NameResult, ApiError>;

    fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult, ApiError> {
        tracing::debug!(kind = request.kind(), "converting");
        match request {
            ConversionRequest::Image(image) => self.image_to_structure(image).map(ConversionResult::Structure),
            ConversionRequest::Name(name) => self.name_to_structure(name).map(ConversionResult::Structure),
            ConversionRequest::Structure(smiles) => self.structure_to_name(smiles).map(ConversionResult::Name),
        }
    }
}

/// `ChemVisionClient` plus the transport that carries its requests.
#[derive(Debug, Clone)]
pub struct Converter<T> {
    client: ChemVisionClient,
    transport: T,
}

impl<T: Transport> Converter<T> {
    pub fn new(client: ChemVisionClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ChemVisionClient {
        &self.client
    }

    pub fn health(&self) -> Result<HealthStatus, ApiError> {
        let response = self.transport.send(&self.client.build_health())?;
        self.client.parse_health(response)
    }
}

impl<T: Transport> ConversionApi for Converter<T> {
    fn image_to_structure(&self, image: &ImageFile) -> Result<StructureResult, ApiError> {
        let request = self.client.build_image_to_structure(image);
        let response = self.transport.send(&request)?;
        self.client.parse_structure(response)
    }

    fn name_to_structure(&self, name: &str) -> Result<StructureResult, ApiError> {
        let request = self.client.build_name_to_structure(name)?;
        let response = self.transport.send(&request)?;
        self.client.parse_structure(response)
    }

    fn structure_to_name(&self, smiles: &str) -> Result<NameResult, ApiError> {
        let request = self.client.build_structure_to_name(smiles)?;
        let response = self.transport.send(&request)?;
        self.client.parse_name(response)
    }
}
