use std::fmt;

use serde::Serialize;

use super::field::{FieldMap, FieldSpec};
use super::{club, event, news};

/// The kinds of content record the console edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Club,
    Event,
    News,
}

static ALL_KINDS: &[EntityKind] = &[EntityKind::Club, EntityKind::Event, EntityKind::News];

impl EntityKind {
    /// Returns all kinds in menu order.
    pub fn all() -> &'static [EntityKind] {
        ALL_KINDS
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Club => "Sport Club",
            Self::Event => "Event",
            Self::News => "News",
        }
    }

    /// The static field schema, in display order.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Club => club::FIELDS,
            Self::Event => event::FIELDS,
            Self::News => news::FIELDS,
        }
    }

    /// Looks up one field of the schema.
    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|s| s.name == name)
    }

    /// The human-readable field the slug is derived from.
    pub fn title_field(self) -> &'static str {
        match self {
            Self::Club => club::TITLE,
            Self::Event => event::TITLE,
            Self::News => news::TITLE,
        }
    }

    /// The field an uploaded image identifier is written into.
    pub fn image_field(self) -> &'static str {
        match self {
            Self::Club => club::IMAGE,
            Self::Event => event::IMAGE,
            Self::News => news::IMAGE,
        }
    }

    /// Name and label of the rich-text field carried in the payload.
    pub fn body_field(self) -> (&'static str, &'static str) {
        match self {
            Self::Club | Self::Event => ("description", "Description"),
            Self::News => ("body", "Body"),
        }
    }

    /// Recomputes hidden fields that depend on `changed`.
    pub fn derive_dependents(self, changed: &str, values: &mut FieldMap) {
        if self == Self::Club && changed == club::LOCATION {
            club::derive_coordinates(values);
        }
    }

    /// Builds the wire payload from the field mapping and the rich-text HTML.
    pub fn payload(self, values: &FieldMap, html: String) -> Payload {
        match self {
            Self::Club => Payload::Club(club::payload(values, html)),
            Self::Event => Payload::Event(event::payload(values, html)),
            Self::News => Payload::News(news::payload(values, html)),
        }
    }
}

#[mutants::skip]
impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a form creates a new record or updates an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Update of the record with this server identifier.
    Update(String),
}

impl FormMode {
    /// Returns the record id for update forms.
    pub fn record_id(&self) -> Option<&str> {
        match self {
            Self::Create => None,
            Self::Update(id) => Some(id),
        }
    }
}

/// An API-shaped body for a create or update request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Club(club::ClubPayload),
    Event(event::EventPayload),
    News(news::NewsPayload),
}

/// An existing record as returned by the REST API.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Club(club::ClubRecord),
    Event(event::EventRecord),
    News(news::NewsRecord),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Club(_) => EntityKind::Club,
            Self::Event(_) => EntityKind::Event,
            Self::News(_) => EntityKind::News,
        }
    }

    /// Server identifier of the record.
    pub fn id(&self) -> &str {
        match self {
            Self::Club(r) => &r.id,
            Self::Event(r) => &r.id,
            Self::News(r) => &r.id,
        }
    }

    /// Populates a field mapping for an update form.
    pub fn to_fields(&self) -> FieldMap {
        match self {
            Self::Club(r) => club::fields_from_record(r),
            Self::Event(r) => event::fields_from_record(r),
            Self::News(r) => news::fields_from_record(r),
        }
    }

    /// The stored rich-text HTML.
    pub fn html(&self) -> &str {
        match self {
            Self::Club(r) => &r.description,
            Self::Event(r) => &r.description,
            Self::News(r) => &r.body,
        }
    }
}
