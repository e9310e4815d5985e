//! Input checks that run before any request is built.

use thiserror::Error;

use crate::types::ImageFile;

/// Largest accepted upload, 10 MiB.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

pub const NAME_MAX_CHARS: usize = 500;
pub const SMILES_MAX_CHARS: usize = 1000;

/// A rejected input. The display text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a chemical name")]
    NameMissing,
    #[error("Name is too long")]
    NameTooLong,
    #[error("Please enter a SMILES notation")]
    SmilesMissing,
    #[error("SMILES is too long")]
    SmilesTooLong,
    #[error("Please select an image file")]
    NoImageSelected,
    #[error("Please select a valid image file (PNG or JPEG)")]
    UnsupportedImageType,
    #[error("File size must be less than 10MB")]
    ImageTooLarge,
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    check_length(name, NAME_MAX_CHARS, ValidationError::NameMissing, ValidationError::NameTooLong)
}

pub fn validate_smiles(smiles: &str) -> Result<(), ValidationError> {
    check_length(
        smiles,
        SMILES_MAX_CHARS,
        ValidationError::SmilesMissing,
        ValidationError::SmilesTooLong,
    )
}

/// Type is checked before size, so an oversized text file reports its type.
pub fn validate_image(image: &ImageFile) -> Result<(), ValidationError> {
    let essence = image
        .content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !ACCEPTED_IMAGE_TYPES.contains(&essence.as_str()) {
        return Err(ValidationError::UnsupportedImageType);
    }
    if image.size() > MAX_IMAGE_BYTES {
        return Err(ValidationError::ImageTooLarge);
    }
    Ok(())
}

fn check_length(
    value: &str,
    max: usize,
    missing: ValidationError,
    too_long: ValidationError,
) -> Result<(), ValidationError> {
    match value.chars().count() {
        0 => Err(missing),
        n if n > max => Err(too_long),
        _ => Ok(()),
    }
}
