//! Event schema, wire payload, and stored record.

use serde::{Deserialize, Serialize};

use super::field::{Choice, FieldMap, FieldSpec, lenient_text};
use super::payload::coerce_float;
use super::validation::{Rule, parse_date};

pub(crate) const TITLE: &str = "title";
pub(crate) const IMAGE: &str = "thumbnail";

/// Event sport categories. Event ids differ from club ids on the server.
pub static CATEGORIES: &[Choice] = &[
    Choice {
        label: "Football",
        value: "b4686c69-a4fb-4284-9a0c-8c8e271836f3",
    },
    Choice {
        label: "Basketball",
        value: "f4c3597b-2155-4c63-9a7a-5dea3434ccaa",
    },
    Choice {
        label: "Volleyball",
        value: "2fe56924-fe8a-4ccd-8792-432fe3885692",
    },
    Choice {
        label: "Badminton",
        value: "6da6376b-932a-4f5c-a7aa-c70dacd7b705",
    },
];

pub static FIELDS: &[FieldSpec] = &[
    FieldSpec::text(TITLE, "Title", &[Rule::Required]),
    FieldSpec::text("slug", "Slug", &[Rule::Required]),
    FieldSpec::choice("sport_category", "Sport Category", CATEGORIES, &[Rule::Required]),
    FieldSpec::text("location", "Location", &[]),
    FieldSpec::text("date", "Date (YYYY-MM-DD)", &[Rule::Required, Rule::Date]),
    FieldSpec::text("contact_info", "Contact Info", &[]),
    FieldSpec::text("about", "About", &[]),
    FieldSpec::text("ticket_price", "Ticket Price", &[Rule::Required, Rule::Number]),
    FieldSpec::text("ticket_reference", "Ticket Reference", &[]),
    FieldSpec::text("venue_map", "Venue Map", &[]),
    FieldSpec::text("event_type", "Event Type", &[Rule::Required]),
    FieldSpec::text(IMAGE, "Thumbnail", &[Rule::Required]),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPayload {
    pub sport_category: String,
    pub title: String,
    pub slug: String,
    pub thumbnail: String,
    pub location: String,
    /// ISO `YYYY-MM-DD`; `None` when the field does not hold a date.
    pub date: Option<String>,
    pub contact_info: String,
    pub about: String,
    pub ticket_price: Option<f64>,
    pub ticket_reference: String,
    pub venue_map: String,
    pub event_type: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EventRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub sport_category: String,
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub slug: String,
    #[serde(deserialize_with = "lenient_text")]
    pub thumbnail: String,
    #[serde(deserialize_with = "lenient_text")]
    pub location: String,
    /// Stored as `DD-MM-YYYY` by the server.
    #[serde(deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(deserialize_with = "lenient_text")]
    pub contact_info: String,
    #[serde(deserialize_with = "lenient_text")]
    pub about: String,
    #[serde(deserialize_with = "lenient_text")]
    pub ticket_price: String,
    #[serde(deserialize_with = "lenient_text")]
    pub ticket_reference: String,
    #[serde(deserialize_with = "lenient_text")]
    pub venue_map: String,
    #[serde(deserialize_with = "lenient_text")]
    pub event_type: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
}

pub(crate) fn payload(values: &FieldMap, description: String) -> EventPayload {
    let text = |name: &str| values.text(name).to_string();
    EventPayload {
        sport_category: text("sport_category"),
        title: text(TITLE),
        slug: text("slug"),
        thumbnail: text(IMAGE),
        location: text("location"),
        date: parse_date(values.text("date")).map(|d| d.format("%Y-%m-%d").to_string()),
        contact_info: text("contact_info"),
        about: text("about"),
        ticket_price: coerce_float(values.text("ticket_price")),
        ticket_reference: text("ticket_reference"),
        venue_map: text("venue_map"),
        event_type: text("event_type"),
        description,
    }
}

pub(crate) fn fields_from_record(record: &EventRecord) -> FieldMap {
    let mut values = FieldMap::empty(FIELDS);
    values.set(TITLE, record.title.clone());
    values.set("slug", record.slug.clone());
    values.set("sport_category", record.sport_category.clone());
    values.set("location", record.location.clone());
    // Normalize to the form's ISO layout; keep unparseable text for the validator.
    let date = parse_date(&record.date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| record.date.clone());
    values.set("date", date);
    values.set("contact_info", record.contact_info.clone());
    values.set("about", record.about.clone());
    values.set("ticket_price", record.ticket_price.clone());
    values.set("ticket_reference", record.ticket_reference.clone());
    values.set("venue_map", record.venue_map.clone());
    values.set("event_type", record.event_type.clone());
    values.set(IMAGE, record.thumbnail.clone());
    values
}
