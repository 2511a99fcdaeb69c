//! Validation rules for design requests.
//!
//! Every rule runs independently so a single pass reports all problems at
//! once. The server is the authority; clients run the same function only as
//! an advisory pre-check.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::api::DesignRequestInput;
use crate::models::{
    Category, Choice, FileFormat, Finishing, Media, PrintMediaType, RequestDetails, SIZE_PRESETS,
    ValidatedRequest,
};

/// Minimum description length, counted in UTF-16 code units.
pub const MIN_DESCRIPTION_LEN: usize = 20;

/// Field name -> human readable message, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Checks a raw payload against every rule, using `today` as the reference
/// date for the deadline policy.
pub fn validate(
    input: &DesignRequestInput,
    today: NaiveDate,
) -> Result<ValidatedRequest, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required_text(&mut errors, "name", input.name.as_deref(), "Name is required");
    let role = required_text(&mut errors, "role", input.role.as_deref(), "Role is required");
    let description = description(&mut errors, input.description.as_deref());
    let deadline = deadline(&mut errors, input.deadline.as_deref(), input.is_urgent, today);

    let category: Option<Category> = required_choice(
        &mut errors,
        "category",
        input.category.as_deref(),
        "Category is required",
    );
    let details = match category {
        Some(Category::Online) => online_details(&mut errors, input),
        Some(Category::Offline) => offline_details(&mut errors, input),
        None => None,
    };

    match (name, role, description, deadline, details) {
        (Some(name), Some(role), Some(description), Some(deadline), Some(details))
            if errors.is_empty() =>
        {
            Ok(ValidatedRequest {
                name,
                role,
                description,
                deadline,
                is_urgent: input.is_urgent,
                details,
            })
        }
        _ => Err(errors),
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    missing: &str,
) -> Option<String> {
    match present(value) {
        Some(v) => Some(v.to_string()),
        None => {
            errors.insert(field, missing);
            None
        }
    }
}

fn required_choice<C: Choice>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    missing: &str,
) -> Option<C> {
    let Some(value) = present(value) else {
        errors.insert(field, missing);
        return None;
    };

    match C::parse(value) {
        Some(choice) => Some(choice),
        None => {
            errors.insert(
                field,
                format!("Must be one of: {}", C::labels().join(", ")),
            );
            None
        }
    }
}

fn description(errors: &mut FieldErrors, value: Option<&str>) -> Option<String> {
    let Some(text) = present(value) else {
        errors.insert("description", "Description is required");
        return None;
    };

    if text.encode_utf16().count() < MIN_DESCRIPTION_LEN {
        errors.insert(
            "description",
            format!("Minimum {MIN_DESCRIPTION_LEN} characters"),
        );
        return None;
    }

    Some(text.to_string())
}

/// Accepts `YYYY-MM-DD`, or an RFC 3339 timestamp whose calendar date is used.
pub fn parse_deadline(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn deadline(
    errors: &mut FieldErrors,
    value: Option<&str>,
    is_urgent: bool,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let Some(raw) = present(value) else {
        errors.insert("deadline", "Deadline is required");
        return None;
    };

    let Some(date) = parse_deadline(raw) else {
        errors.insert("deadline", "Deadline must be a date (YYYY-MM-DD)");
        return None;
    };

    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);

    // Urgent requests may skip the one-day lead time, never the past-date floor.
    if date < tomorrow && !is_urgent {
        errors.insert("deadline", "Minimal deadline is tomorrow");
        None
    } else if date < today {
        errors.insert("deadline", "Cannot be in the past");
        None
    } else {
        Some(date)
    }
}

fn online_details(errors: &mut FieldErrors, input: &DesignRequestInput) -> Option<RequestDetails> {
    let media: Option<Media> =
        required_choice(errors, "media", input.media.as_deref(), "Media is required");
    let file_format: Option<FileFormat> = required_choice(
        errors,
        "file_format",
        input.file_format.as_deref(),
        "Format is required",
    );

    Some(RequestDetails::Online {
        media: media?,
        file_format: file_format?,
    })
}

fn offline_details(errors: &mut FieldErrors, input: &DesignRequestInput) -> Option<RequestDetails> {
    let print_media_type: Option<PrintMediaType> = required_choice(
        errors,
        "print_media_type",
        input.print_media_type.as_deref(),
        "Media type is required",
    );
    let size = required_text(errors, "size", input.size.as_deref(), "Size is required");
    let finishing: Option<Finishing> = required_choice(
        errors,
        "finishing",
        input.finishing.as_deref(),
        "Finishing is required",
    );

    Some(RequestDetails::Offline {
        print_media_type: print_media_type?,
        size: canonical_size(size?),
        finishing: finishing?,
    })
}

/// Known presets are stored with their canonical spelling, anything else as typed.
fn canonical_size(size: String) -> String {
    SIZE_PRESETS
        .iter()
        .find(|preset| preset.eq_ignore_ascii_case(&size))
        .map_or(size, |preset| preset.to_string())
}
