//! Form collection for one panel.
//!
//! A [`FormCollector`] holds whatever the user has entered for the active panel until submit.
//! Categorical selections are translated to their numeric code as soon as they are entered;
//! free-text values are kept exactly as typed. Nothing is validated numerically here.

use crate::panels::{FieldKind, PanelId, PanelSpec};

/// A value as entered on the form.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Free text, passed through unmodified.
    Text(String),
    /// Code of the selected choice.
    Code(f64),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FormError {
    #[error("{panel} has no field named '{key}'")]
    UnknownField { panel: PanelId, key: String },
    #[error("'{value}' is not one of the choices for {field}")]
    InvalidChoice { field: &'static str, value: String },
}

/// The values of one submit, aligned with the panel's field order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSubmission {
    panel: PanelId,
    values: Vec<Option<RawValue>>,
}

impl RawSubmission {
    pub fn panel(&self) -> PanelId {
        self.panel
    }

    pub fn spec(&self) -> &'static PanelSpec {
        self.panel.spec()
    }

    /// Values in field order; `None` for fields left empty.
    pub fn values(&self) -> &[Option<RawValue>] {
        &self.values
    }
}

/// Ephemeral form state for one panel.
#[derive(Debug, Clone)]
pub struct FormCollector {
    spec: &'static PanelSpec,
    values: Vec<Option<RawValue>>,
}

impl FormCollector {
    /// Empty form for `panel`.
    pub fn new(panel: PanelId) -> Self {
        let spec = panel.spec();
        Self {
            spec,
            values: vec![None; spec.fields.len()],
        }
    }

    /// Build a form from key/value pairs, rejecting unknown keys and choices.
    pub fn from_pairs<I, K, V>(panel: PanelId, pairs: I) -> Result<Self, FormError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut form = Self::new(panel);
        for (key, value) in pairs {
            form.set(key.as_ref(), value.as_ref())?;
        }
        Ok(form)
    }

    pub fn panel(&self) -> PanelId {
        self.spec.id
    }

    /// Enter a value for `key`.
    ///
    /// Text fields keep `value` as typed. Categorical fields translate the choice label to its
    /// code. An empty (or whitespace-only) categorical value clears the field; an empty text
    /// value is stored as typed so the completeness check can report it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), FormError> {
        let index = self
            .spec
            .field_index(key)
            .ok_or_else(|| FormError::UnknownField {
                panel: self.spec.id,
                key: key.to_owned(),
            })?;
        let field = &self.spec.fields[index];

        self.values[index] = match field.kind {
            FieldKind::Numeric => Some(RawValue::Text(value.to_owned())),
            FieldKind::Categorical(_) => {
                let value = value.trim();
                if value.is_empty() {
                    None
                } else {
                    let code =
                        field
                            .code_for(value)
                            .ok_or_else(|| FormError::InvalidChoice {
                                field: field.label,
                                value: value.to_owned(),
                            })?;
                    Some(RawValue::Code(code))
                }
            }
        };
        Ok(())
    }

    pub fn value(&self, key: &str) -> Option<&RawValue> {
        self.spec
            .field_index(key)
            .and_then(|i| self.values[i].as_ref())
    }

    /// The value as it should be shown back on the form: the typed text, or the label of the
    /// selected choice.
    pub fn display_value(&self, key: &str) -> Option<String> {
        let field = self.spec.field(key)?;
        match self.value(key)? {
            RawValue::Text(text) => Some(text.clone()),
            RawValue::Code(code) => field.label_for(*code).map(str::to_owned),
        }
    }

    pub fn submit(self) -> RawSubmission {
        RawSubmission {
            panel: self.spec.id,
            values: self.values,
        }
    }
}
