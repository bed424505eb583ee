mod club;
mod entity;
mod event;
mod field;
mod news;
mod payload;
mod slug;
mod validation;

pub use club::{CATEGORIES as CLUB_CATEGORIES, ClubPayload, ClubRecord, ContactInfo};
pub use entity::{EntityKind, FormMode, Payload, Record};
pub use event::{CATEGORIES as EVENT_CATEGORIES, EventPayload, EventRecord};
pub use field::{Choice, FieldKind, FieldMap, FieldSpec, FieldValue};
pub use news::{NewsPayload, NewsRecord};
pub use payload::{coerce_float, coerce_int};
pub use slug::{is_slug, slugify};
pub use validation::{
    FieldErrors, Rule, ValidationError, is_email, is_http_url, parse_date, parse_integer,
    parse_number, split_coordinates, validate, validate_field,
};
