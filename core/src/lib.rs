//! Client core for the ChemVision conversion service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A [`Transport`] executes the
//! round-trip, so everything in this crate is deterministic and testable.
//!
//! # Design
//! - `ChemVisionClient` is stateless: it holds where the backend lives and
//!   which route family it speaks.
//! - Every non-2xx response is folded into one [`NormalizedError`] by
//!   [`normalize`], whatever shape the backend used.
//! - The forms in [`forms`] own client-side validation and the
//!   idle/loading/success/error state machine, and talk to the backend only
//!   through [`ConversionApi`].
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod forms;
pub mod http;
pub mod normalize;
pub mod render;
pub mod service;
pub mod types;
pub mod validation;

pub use client::ChemVisionClient;
pub use config::{BaseUrl, Endpoint, RouteFamily, UrlContext};
pub use error::{ApiError, NormalizedError, UNEXPECTED_ERROR_MESSAGE};
pub use form::{Form, FormEvent, FormStatus, FormViewState, SubmitTicket, Transition};
pub use forms::{ImageToStructureForm, NameToStructureForm, StructureToNameForm};
pub use http::{HttpMethod, HttpRequest, HttpResponse, MultipartFile, RequestBody, Transport};
pub use normalize::normalize;
pub use render::{IntoResultCard, ResultCard, ResultKind};
pub use service::{ConversionApi, ConversionResult, Converter};
pub use types::{ConversionRequest, HealthStatus, ImageFile, NameResult, Source, StructureResult};
pub use validation::ValidationError;
