//! Add/Edit desk form: field rules and conversion into desks and patches.
//!
//! Rules are declared with `validator` and reported per field so a host can
//! show them inline next to each input.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::desk::{Desk, DeskPatch};
use crate::error::CoreError;
use crate::types::{ClientId, DbId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum desk width/height in pixels.
pub const MIN_DESK_SIZE_PX: f64 = 20.0;

/// Maximum desk width/height in pixels.
pub const MAX_DESK_SIZE_PX: f64 = 200.0;

/// Minimum opacity percentage.
pub const MIN_OPACITY: f64 = 5.0;

/// Maximum opacity percentage.
pub const MAX_OPACITY: f64 = 100.0;

/// Width/height prefilled on a blank add form.
pub const DEFAULT_DESK_SIZE: &str = "100";

/// Colour prefilled on a blank add form.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#1677ff";

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Values of the add/edit desk form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeskForm {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    pub owner_id: Option<DbId>,

    #[validate(custom(function = "validate_width"))]
    pub width: String,

    #[validate(custom(function = "validate_height"))]
    pub height: String,

    #[validate(
        required(message = "Opacity is required"),
        range(min = 5.0, max = 100.0, message = "Opacity must be between 5 and 100"),
        custom(function = "validate_opacity")
    )]
    pub opacity: Option<f64>,

    #[validate(custom(function = "validate_background_color"))]
    pub background_color: String,
}

impl Default for DeskForm {
    fn default() -> Self {
        Self::blank()
    }
}

impl DeskForm {
    /// Values shown when the add form opens.
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            owner_id: None,
            width: DEFAULT_DESK_SIZE.to_string(),
            height: DEFAULT_DESK_SIZE.to_string(),
            opacity: Some(MAX_OPACITY),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
        }
    }

    /// Pre-populate the edit form from an existing desk.
    pub fn from_desk(desk: &Desk) -> Self {
        Self {
            name: desk.name.clone(),
            owner_id: desk.owner_id,
            width: desk.width.clone(),
            height: desk.height.clone(),
            opacity: Some(desk.opacity),
            background_color: desk.background_color.clone(),
        }
    }

    /// Run every field rule.
    pub fn check(&self) -> Result<(), FormErrors> {
        self.validate().map_err(FormErrors::from)
    }

    /// Build a brand-new desk at the canvas origin with a fresh client id.
    pub fn to_new_desk(&self) -> Result<Desk, FormErrors> {
        let patch = self.to_patch()?;
        let mut desk = Desk {
            client_id: ClientId::generate(),
            desk_id: None,
            name: String::new(),
            position_x: 0.0,
            position_y: 0.0,
            width: String::new(),
            height: String::new(),
            opacity: 0.0,
            background_color: String::new(),
            owner_id: None,
        };
        patch.apply_to(&mut desk);
        Ok(desk)
    }

    /// Build the patch applied to an existing desk on edit.
    pub fn to_patch(&self) -> Result<DeskPatch, FormErrors> {
        self.check()?;
        Ok(DeskPatch {
            name: self.name.trim().to_string(),
            owner_id: self.owner_id,
            width: self.width.trim().to_string(),
            height: self.height.trim().to_string(),
            opacity: self.opacity.unwrap_or(MAX_OPACITY),
            background_color: self.background_color.trim().to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

fn field_error(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(field_error("required", "Name is required".to_string()));
    }
    Ok(())
}

fn validate_width(width: &str) -> Result<(), ValidationError> {
    validate_size("Width", width)
}

fn validate_height(height: &str) -> Result<(), ValidationError> {
    validate_size("Height", height)
}

/// A string-encoded pixel size must be numeric and within
/// [`MIN_DESK_SIZE_PX`]..=[`MAX_DESK_SIZE_PX`].
fn validate_size(label: &str, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(field_error("required", format!("{label} is required")));
    }
    let parsed: f64 = value
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| field_error("number", format!("{label} must be a number")))?;

    if parsed < MIN_DESK_SIZE_PX {
        return Err(field_error(
            "range",
            format!("{label} must be at least {MIN_DESK_SIZE_PX}"),
        ));
    }
    if parsed > MAX_DESK_SIZE_PX {
        return Err(field_error(
            "range",
            format!("{label} must be at most {MAX_DESK_SIZE_PX}"),
        ));
    }
    Ok(())
}

fn validate_opacity(opacity: f64) -> Result<(), ValidationError> {
    if !opacity.is_finite() {
        return Err(field_error("number", "Opacity must be a number".to_string()));
    }
    Ok(())
}

/// Accepts `#RGB`, `#RRGGBB` and `#RRGGBBAA`.
fn validate_background_color(color: &str) -> Result<(), ValidationError> {
    let color = color.trim();
    if color.is_empty() {
        return Err(field_error("required", "Color is required".to_string()));
    }
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| field_error("hex", format!("Invalid color '{color}'. Must start with '#'")))?;

    let valid_length = matches!(hex.len(), 3 | 6 | 8);
    if !valid_length || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(field_error(
            "hex",
            format!("Invalid color '{color}'. Must be in #RGB, #RRGGBB or #RRGGBBAA hex format"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Inline validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages for one field, e.g. `"width"`.
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.field(name).first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();
        for (field, errs) in errors.field_errors() {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }
        Self { fields }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

impl From<FormErrors> for CoreError {
    fn from(errors: FormErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> DeskForm {
        DeskForm {
            name: "Desk 1".to_string(),
            ..DeskForm::blank()
        }
    }

    #[test]
    fn blank_form_only_misses_a_name() {
        let errors = DeskForm::blank().check().unwrap_err();
        assert_eq!(errors.first("name"), Some("Name is required"));
        assert_eq!(errors.iter().count(), 1);
    }

    #[test]
    fn valid_form_passes() {
        assert!(valid_form().check().is_ok());
    }

    #[test]
    fn whitespace_name_is_rejected() {
        let form = DeskForm {
            name: "   ".to_string(),
            ..valid_form()
        };
        assert_eq!(form.check().unwrap_err().first("name"), Some("Name is required"));
    }

    #[test]
    fn width_below_minimum() {
        let form = DeskForm {
            width: "10".to_string(),
            ..valid_form()
        };
        let errors = form.check().unwrap_err();
        assert_eq!(errors.first("width"), Some("Width must be at least 20"));
    }

    #[test]
    fn size_bounds_are_inclusive() {
        let form = DeskForm {
            width: "20".to_string(),
            height: "200".to_string(),
            ..valid_form()
        };
        assert!(form.check().is_ok());

        let form = DeskForm {
            height: "200.5".to_string(),
            ..valid_form()
        };
        assert_eq!(
            form.check().unwrap_err().first("height"),
            Some("Height must be at most 200")
        );
    }

    #[test]
    fn size_must_be_present_and_numeric() {
        let form = DeskForm {
            width: String::new(),
            height: "wide".to_string(),
            ..valid_form()
        };
        let errors = form.check().unwrap_err();
        assert_eq!(errors.first("width"), Some("Width is required"));
        assert_eq!(errors.first("height"), Some("Height must be a number"));
    }

    #[test]
    fn opacity_rules() {
        let missing = DeskForm {
            opacity: None,
            ..valid_form()
        };
        assert_eq!(
            missing.check().unwrap_err().first("opacity"),
            Some("Opacity is required")
        );

        let low = DeskForm {
            opacity: Some(4.0),
            ..valid_form()
        };
        assert!(low.check().unwrap_err().first("opacity").is_some());

        let edge = DeskForm {
            opacity: Some(5.0),
            ..valid_form()
        };
        assert!(edge.check().is_ok());
    }

    #[test]
    fn nan_opacity_is_rejected() {
        let form = DeskForm {
            opacity: Some(f64::NAN),
            ..valid_form()
        };
        assert_eq!(
            form.check().unwrap_err().first("opacity"),
            Some("Opacity must be a number")
        );
        assert!(form.to_new_desk().is_err());
    }

    #[test]
    fn color_must_be_hex() {
        for ok in ["#fff", "#A0b1C2", "#00000080"] {
            let form = DeskForm {
                background_color: ok.to_string(),
                ..valid_form()
            };
            assert!(form.check().is_ok(), "{ok} should be accepted");
        }
        for bad in ["", "fff", "#ggg", "#12345"] {
            let form = DeskForm {
                background_color: bad.to_string(),
                ..valid_form()
            };
            assert!(
                form.check().unwrap_err().first("background_color").is_some(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn new_desk_starts_at_origin_without_desk_id() {
        let desk = DeskForm {
            name: "  Window  ".to_string(),
            owner_id: Some(4),
            ..valid_form()
        }
        .to_new_desk()
        .unwrap();

        assert_eq!(desk.desk_id, None);
        assert_eq!((desk.position_x, desk.position_y), (0.0, 0.0));
        assert_eq!(desk.name, "Window");
        assert_eq!(desk.owner_id, Some(4));
        assert!(!desk.client_id.as_str().is_empty());
    }

    #[test]
    fn each_new_desk_gets_its_own_client_id() {
        let a = valid_form().to_new_desk().unwrap();
        let b = valid_form().to_new_desk().unwrap();
        assert_ne!(a.client_id, b.client_id);
    }

    #[test]
    fn invalid_form_produces_no_desk() {
        let form = DeskForm {
            width: "10".to_string(),
            ..valid_form()
        };
        assert!(form.to_new_desk().is_err());
    }

    #[test]
    fn from_desk_round_trips_editable_fields() {
        let desk = valid_form().to_new_desk().unwrap();
        let form = DeskForm::from_desk(&desk);
        assert_eq!(form.name, desk.name);
        assert_eq!(form.opacity, Some(desk.opacity));
        assert!(form.check().is_ok());
    }

    #[test]
    fn form_errors_convert_to_core_validation() {
        let errors = DeskForm::blank().check().unwrap_err();
        let core: CoreError = errors.into();
        assert!(core.to_string().contains("Name is required"));
    }
}
