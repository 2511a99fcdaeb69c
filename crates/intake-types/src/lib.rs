//! Shared types for the design request intake service.
//!
//! The validation rules in [`validation`] are linked by both the server and
//! the submitting client so the two sides can never drift apart.

pub mod api;
pub mod models;
pub mod validation;

pub use models::{
    Category, Choice, FileFormat, Finishing, Media, NotificationOutcome, PortfolioItem,
    PrintMediaType, RequestDetails, SIZE_PRESETS, ValidatedRequest,
};
pub use validation::{FieldErrors, validate};
