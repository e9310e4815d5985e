//! HTTP transport and command-line front end for the ChemVision client core.
//!
//! # Overview
//! `chemvision-core` builds requests and parses responses without doing any
//! I/O. This crate is the host: [`ReqwestTransport`] executes the round-trip,
//! and [`app`] runs the core's forms for the `chemvision` binary.

pub mod app;
pub mod error;
pub mod logging;
pub mod settings;
pub mod transport;

pub use app::{download, load_image, run_conversion, Conversion, Outcome};
pub use error::CliError;
pub use settings::Settings;
pub use transport::ReqwestTransport;
