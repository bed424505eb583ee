//! News schema, wire payload, and stored record.

use serde::{Deserialize, Serialize};

use super::field::{FieldMap, FieldSpec, lenient_text};
use super::validation::Rule;

pub(crate) const TITLE: &str = "title";
pub(crate) const IMAGE: &str = "thumbnail";

/// Every record edited here is a news item.
const CONTENT_TYPE: &str = "news";

pub static FIELDS: &[FieldSpec] = &[
    FieldSpec::text(TITLE, "Title", &[Rule::Required]),
    FieldSpec::text("slug", "Slug", &[Rule::Required]),
    FieldSpec::text(IMAGE, "Thumbnail", &[Rule::Required]),
    FieldSpec::flag("is_draft", "Is Draft", &[Rule::Flag]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsPayload {
    pub slug: String,
    pub title: String,
    pub content_type: &'static str,
    pub thumbnail: String,
    pub body: String,
    pub is_draft: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct NewsRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub slug: String,
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub thumbnail: String,
    #[serde(deserialize_with = "lenient_text")]
    pub body: String,
    pub is_draft: Option<bool>,
}

pub(crate) fn payload(values: &FieldMap, body: String) -> NewsPayload {
    NewsPayload {
        slug: values.text("slug").to_string(),
        title: values.text(TITLE).to_string(),
        content_type: CONTENT_TYPE,
        thumbnail: values.text(IMAGE).to_string(),
        body,
        is_draft: values.flag("is_draft"),
    }
}

pub(crate) fn fields_from_record(record: &NewsRecord) -> FieldMap {
    let mut values = FieldMap::empty(FIELDS);
    values.set(TITLE, record.title.clone());
    values.set("slug", record.slug.clone());
    values.set(IMAGE, record.thumbnail.clone());
    values.set("is_draft", record.is_draft.unwrap_or(false));
    values
}
