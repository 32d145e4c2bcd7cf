use std::collections::BTreeMap;

use serde::Serialize;

use crate::notes::WARNING;

/// Field level form errors, rendered next to the offending inputs.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duplicate_slug(slug: &str) -> Self {
        let mut errors = Self::new();
        errors.add("slug", format!("{slug}{WARNING}"));
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

pub fn require(errors: &mut FormErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, "This field is required.");
        return false;
    }
    true
}

pub fn max_length(errors: &mut FormErrors, field: &str, value: &str, max: usize) {
    let length = value.chars().count();
    if length > max {
        errors.add(
            field,
            format!("Ensure this value has at most {max} characters (it has {length})."),
        );
    }
}
