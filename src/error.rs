//! Error types for the registration wizard.

use thiserror::Error;

use crate::registration::Section;

/// Errors raised while filling in or submitting a registration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The form has no field with this name
    #[error("Unknown form field: {name}")]
    UnknownField { name: String },

    /// The document checklist has no entry with this id
    #[error("Unknown document: {id}")]
    UnknownDocument { id: String },

    /// Required fields of the active section are blank
    #[error("Missing required fields in {section} section: {}", .fields.join(", "))]
    MissingFields {
        section: Section,
        fields: Vec<String>,
    },

    /// Tried to move forward from the last section
    #[error("No section after {section}")]
    NoNextSection { section: Section },

    /// Tried to move back from the first section
    #[error("No section before {section}")]
    NoPreviousSection { section: Section },

    /// Submit is only available from the payment section
    #[error("Registration can only be submitted from the payment section (currently on {section})")]
    NotOnFinalSection { section: Section },

    /// The form is closed once submitted
    #[error("Registration has already been submitted")]
    AlreadySubmitted,
}
