//! Text rendering of conversion results and form state.

use std::fmt;

use crate::form::{FormStatus, FormViewState};
use crate::types::{NameResult, Source, StructureResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Smiles,
    Name,
}

impl ResultKind {
    pub fn title(self) -> &'static str {
        match self {
            ResultKind::Smiles => "SMILES Notation",
            ResultKind::Name => "IUPAC Name",
        }
    }

    /// File name offered when the result is downloaded.
    pub fn download_file_name(self) -> &'static str {
        match self {
            ResultKind::Smiles => "molecule.smi",
            ResultKind::Name => "molecule.txt",
        }
    }
}

/// A successful conversion, ready to show, copy or download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub kind: ResultKind,
    pub value: String,
    pub source: Source,
}

impl ResultCard {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn download_file_name(&self) -> &'static str {
        self.kind.download_file_name()
    }
}

impl fmt::Display for ResultCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]", self.title(), self.source.label())?;
        writeln!(f, "Successfully converted")?;
        write!(f, "{}", self.value)
    }
}

/// Results that render as a [`ResultCard`].
pub trait IntoResultCard {
    fn to_card(&self) -> ResultCard;
}

impl IntoResultCard for StructureResult {
    fn to_card(&self) -> ResultCard {
        ResultCard {
            kind: ResultKind::Smiles,
            value: self.smiles.clone(),
            source: self.source,
        }
    }
}

impl IntoResultCard for NameResult {
    fn to_card(&self) -> ResultCard {
        ResultCard {
            kind: ResultKind::Name,
            value: self.name.clone(),
            source: self.source,
        }
    }
}

/// What a form currently shows, as plain text.
pub fn render_state<T: IntoResultCard>(state: &FormViewState<T>) -> String {
    let mut lines = Vec::new();
    if let Some(field_error) = &state.field_error {
        lines.push(field_error.clone());
    }
    match state.status {
        FormStatus::Idle => {}
        FormStatus::Loading => lines.push("Converting...".to_string()),
        FormStatus::Success => {
            if let Some(result) = &state.result {
                lines.push(result.to_card().to_string());
            }
        }
        FormStatus::Error => {
            if let Some(result) = &state.result {
                lines.push(result.to_card().to_string());
            }
            if let Some(message) = &state.error_message {
                lines.push(message.clone());
            }
        }
    }
    lines.join("\n")
}
