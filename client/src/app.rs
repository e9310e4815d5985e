//! Drives one form per CLI invocation.

use std::fs;
use std::path::{Path, PathBuf};

use chemvision_core::{
    ConversionApi, FormStatus, ImageFile, ImageToStructureForm, IntoResultCard, NameToStructureForm,
    ResultCard, StructureToNameForm,
};

use crate::error::CliError;

/// One user request, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    Image(PathBuf),
    Name(String),
    Smiles(String),
}

/// What a form ended up showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: FormStatus,
    pub rendered: String,
    pub card: Option<ResultCard>,
}

impl Outcome {
    pub fn succeeded(&self) -> bool {
        self.status == FormStatus::Success
    }
}

/// Read a file from disk, sniffing its content type.
pub fn load_image(path: &Path) -> Result<ImageFile, CliError> {
    let bytes = fs::read(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(ImageFile::sniffed(file_name, bytes))
}

pub fn run_conversion<A: ConversionApi + ?Sized>(api: &A, conversion: &Conversion) -> Result<Outcome, CliError> {
    let outcome = match conversion {
        Conversion::Image(path) => {
            let mut form = ImageToStructureForm::new();
            form.select_file(load_image(path)?);
            if form.can_submit() {
                form.submit(api);
            }
            Outcome {
                status: form.state().status,
                rendered: form.render(),
                card: form.state().result.as_ref().map(|r| r.to_card()),
            }
        }
        Conversion::Name(name) => {
            let mut form = NameToStructureForm::new();
            form.submit(api, name);
            Outcome {
                status: form.state().status,
                rendered: form.render(),
                card: form.state().result.as_ref().map(|r| r.to_card()),
            }
        }
        Conversion::Smiles(smiles) => {
            let mut form = StructureToNameForm::new();
            form.submit(api, smiles);
            Outcome {
                status: form.state().status,
                rendered: form.render(),
                card: form.state().result.as_ref().map(|r| r.to_card()),
            }
        }
    };
    Ok(outcome)
}

/// Save a result under its download name inside `dir`.
pub fn download(card: &ResultCard, dir: &Path) -> Result<PathBuf, CliError> {
    let path = dir.join(card.download_file_name());
    fs::write(&path, &card.value).map_err(|source| CliError::WriteFile {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), "result saved");
    Ok(path)
}
