use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use super::validation::Rule;

/// One entry of a fixed choice list: what the operator sees, and what is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub label: &'static str,
    pub value: &'static str,
}

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// One value from a fixed list; the empty string means "not selected".
    Choice(&'static [Choice]),
    /// A boolean switch.
    Flag,
}

/// Static description of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key in the [`FieldMap`] and the name used in error maps.
    pub name: &'static str,
    /// Display label, also used in validation messages.
    pub label: &'static str,
    pub kind: FieldKind,
    /// Rules checked by the validator, in order.
    pub rules: &'static [Rule],
    /// Derived fields are kept in the mapping but never rendered or typed into.
    pub hidden: bool,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str, rules: &'static [Rule]) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            rules,
            hidden: false,
        }
    }

    pub const fn choice(
        name: &'static str,
        label: &'static str,
        choices: &'static [Choice],
        rules: &'static [Rule],
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Choice(choices),
            rules,
            hidden: false,
        }
    }

    pub const fn flag(name: &'static str, label: &'static str, rules: &'static [Rule]) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Flag,
            rules,
            hidden: false,
        }
    }

    pub const fn hidden(name: &'static str, label: &'static str, rules: &'static [Rule]) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            rules,
            hidden: true,
        }
    }

    /// The value a fresh create form starts with.
    pub fn empty_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Flag => FieldValue::Flag(false),
            FieldKind::Text | FieldKind::Choice(_) => FieldValue::Text(String::new()),
        }
    }

    /// Returns `true` if the field's rules include [`Rule::Required`] or [`Rule::Flag`].
    pub fn is_required(&self) -> bool {
        self.rules
            .iter()
            .any(|r| matches!(r, Rule::Required | Rule::Flag))
    }
}

/// The raw value of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    /// Text content, or `""` for flags.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::Flag(_) => "",
        }
    }

    /// Flag content, or `None` for text values.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// The live set of named input values for one form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldMap {
    values: BTreeMap<&'static str, FieldValue>,
}

impl FieldMap {
    /// Builds the empty initial shape for a schema.
    pub fn empty(specs: &'static [FieldSpec]) -> Self {
        Self {
            values: specs.iter().map(|s| (s.name, s.empty_value())).collect(),
        }
    }

    /// Returns the value for `name`, if the field exists.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Returns the text of `name`, or `""` when absent or a flag.
    pub fn text(&self, name: &str) -> &str {
        self.values.get(name).map_or("", FieldValue::as_text)
    }

    /// Returns the flag value of `name`, or `false` when absent or text.
    pub fn flag(&self, name: &str) -> bool {
        self.values
            .get(name)
            .and_then(FieldValue::as_flag)
            .unwrap_or(false)
    }

    /// Writes a value. Field names come from static schemas.
    pub fn set(&mut self, name: &'static str, value: impl Into<FieldValue>) {
        self.values.insert(name, value.into());
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }
}

/// Deserializes a JSON string, number, bool, or null into its text form.
///
/// Stored records are not consistent about numeric fields: `seat_number` may
/// come back as `20` or `"20"`, `price` as `5` or `"5$"`.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}
