//! The three conversion forms: input checks, the state machine and an API.
//!
//! Each form validates its own input, then runs exactly one conversion
//! through a [`ConversionApi`]. Nothing here knows about HTTP.

use crate::form::{Form, FormEvent, FormStatus, FormViewState, Transition};
use crate::render::render_state;
use crate::service::ConversionApi;
use crate::types::{ImageFile, NameResult, StructureResult};
use crate::validation::{validate_image, validate_name, validate_smiles, ValidationError};

/// IUPAC name → SMILES.
#[derive(Debug, Default)]
pub struct NameToStructureForm {
    form: Form<StructureResult>,
}

impl NameToStructureForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormViewState<StructureResult> {
        self.form.state()
    }

    pub fn submit<A: ConversionApi + ?Sized>(&mut self, api: &A, name: &str) -> Transition {
        if let Err(err) = validate_name(name) {
            return self.form.dispatch(FormEvent::InvalidInput(err.to_string()));
        }
        self.form.run(|_| api.name_to_structure(name))
    }

    pub fn render(&self) -> String {
        render_state(self.form.state())
    }

    pub fn unmount(&mut self) {
        self.form.dispatch(FormEvent::Unmount);
    }
}

/// SMILES → IUPAC name.
#[derive(Debug, Default)]
pub struct StructureToNameForm {
    form: Form<NameResult>,
}

impl StructureToNameForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormViewState<NameResult> {
        self.form.state()
    }

    pub fn submit<A: ConversionApi + ?Sized>(&mut self, api: &A, smiles: &str) -> Transition {
        if let Err(err) = validate_smiles(smiles) {
            return self.form.dispatch(FormEvent::InvalidInput(err.to_string()));
        }
        self.form.run(|_| api.structure_to_name(smiles))
    }

    pub fn render(&self) -> String {
        render_state(self.form.state())
    }

    pub fn unmount(&mut self) {
        self.form.dispatch(FormEvent::Unmount);
    }
}

/// Structure image → SMILES.
///
/// File problems surface as a top-level error, the same place a failed
/// conversion would, because the file picker has no inline message slot.
#[derive(Debug, Default)]
pub struct ImageToStructureForm {
    form: Form<StructureResult>,
    selected_file: Option<ImageFile>,
}

impl ImageToStructureForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormViewState<StructureResult> {
        self.form.state()
    }

    pub fn selected_file(&self) -> Option<&ImageFile> {
        self.selected_file.as_ref()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.selected_file.is_some() && self.form.status() != FormStatus::Loading
    }

    /// Pick (or drop onto the form) a file. A rejected file is not kept.
    pub fn select_file(&mut self, file: ImageFile) -> Transition {
        if self.form.status() == FormStatus::Loading {
            return Transition::Busy;
        }
        if let Err(err) = validate_image(&file) {
            tracing::debug!(file = %file.file_name, reason = %err, "rejected image selection");
            return self.form.dispatch(FormEvent::Fail(err.to_string()));
        }
        self.selected_file = Some(file);
        self.form.dispatch(FormEvent::Reset)
    }

    /// Drop the selection along with any result or error.
    pub fn clear(&mut self) -> Transition {
        if self.form.status() == FormStatus::Loading {
            return Transition::Busy;
        }
        self.selected_file = None;
        self.form.dispatch(FormEvent::Reset)
    }

    pub fn submit<A: ConversionApi + ?Sized>(&mut self, api: &A) -> Transition {
        let Some(file) = self.selected_file.as_ref() else {
            return self
                .form
                .dispatch(FormEvent::Fail(ValidationError::NoImageSelected.to_string()));
        };
        self.form.run(|_| api.image_to_structure(file))
    }

    pub fn render(&self) -> String {
        render_state(self.form.state())
    }

    pub fn unmount(&mut self) {
        self.form.dispatch(FormEvent::Unmount);
    }
}
