//! Sport club schema, wire payload, and stored record.

use serde::{Deserialize, Serialize};

use super::field::{Choice, FieldMap, FieldSpec, lenient_text};
use super::payload::{coerce_float, coerce_int};
use super::validation::{Rule, split_coordinates};

pub(crate) const TITLE: &str = "sport_name";
pub(crate) const IMAGE: &str = "image";
pub(crate) const LOCATION: &str = "location";
pub(crate) const LATITUDE: &str = "latitude";
pub(crate) const LONGITUDE: &str = "longitude";

pub static CATEGORIES: &[Choice] = &[
    Choice {
        label: "Football",
        value: "1f476426-53cd-4831-b575-3ea9f69ed090",
    },
    Choice {
        label: "Basketball",
        value: "02b8ee87-374f-42d0-8a17-27867be2dba2",
    },
    Choice {
        label: "Volleyball",
        value: "7ce1a035-37bf-4296-85bf-0086c33261e8",
    },
    Choice {
        label: "Badminton",
        value: "aa5d0912-3ab6-46ca-a55d-d687436b2ad1",
    },
];

pub static FIELDS: &[FieldSpec] = &[
    FieldSpec::text(TITLE, "Sport Name", &[Rule::Required]),
    FieldSpec::text("slug", "Slug", &[Rule::Required]),
    FieldSpec::choice("sport_category", "Sport Category", CATEGORIES, &[Rule::Required]),
    FieldSpec::text(LOCATION, "Location", &[Rule::Required, Rule::Coordinates]),
    FieldSpec::hidden(LATITUDE, "Latitude", &[]),
    FieldSpec::hidden(LONGITUDE, "Longitude", &[]),
    FieldSpec::text("seat_number", "Seat Number", &[Rule::Required, Rule::Integer]),
    FieldSpec::text("skill_level", "Skill Level", &[Rule::Required]),
    FieldSpec::text("price", "Price", &[Rule::Required]),
    FieldSpec::text("reviews", "Reviews", &[]),
    FieldSpec::text("profile", "Profile", &[]),
    FieldSpec::text("cover", "Cover", &[]),
    FieldSpec::text("first_phone", "First Phone", &[]),
    FieldSpec::text("second_phone", "Second Phone", &[]),
    FieldSpec::text("email", "Email", &[Rule::Email]),
    FieldSpec::text("website", "Website", &[Rule::Url]),
    FieldSpec::text("facebook", "Facebook", &[Rule::Url]),
    FieldSpec::text("telegram", "Telegram", &[Rule::Url]),
    FieldSpec::text("instagram", "Instagram", &[Rule::Url]),
    FieldSpec::text("twitter", "Twitter", &[Rule::Url]),
    FieldSpec::text("istad_account", "ISTAD Account", &[]),
    FieldSpec::text(IMAGE, "Image", &[]),
];

/// Contact channels, nested under `contact_info` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    #[serde(deserialize_with = "lenient_text")]
    pub first_phone: String,
    #[serde(deserialize_with = "lenient_text")]
    pub second_phone: String,
    #[serde(deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(deserialize_with = "lenient_text")]
    pub website: String,
    #[serde(deserialize_with = "lenient_text")]
    pub facebook: String,
    #[serde(deserialize_with = "lenient_text")]
    pub telegram: String,
    #[serde(deserialize_with = "lenient_text")]
    pub instagram: String,
    #[serde(deserialize_with = "lenient_text")]
    pub twitter: String,
    #[serde(deserialize_with = "lenient_text")]
    pub istad_account: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClubPayload {
    pub sport_category: String,
    pub slug: String,
    pub sport_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub seat_number: Option<i64>,
    pub skill_level: String,
    pub description: String,
    pub image: String,
    pub reviews: String,
    pub profile: String,
    pub cover: String,
    pub price: String,
    pub contact_info: ContactInfo,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ClubRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub sport_category: String,
    #[serde(deserialize_with = "lenient_text")]
    pub slug: String,
    #[serde(deserialize_with = "lenient_text")]
    pub sport_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub latitude: String,
    #[serde(deserialize_with = "lenient_text")]
    pub longitude: String,
    #[serde(deserialize_with = "lenient_text")]
    pub seat_number: String,
    #[serde(deserialize_with = "lenient_text")]
    pub skill_level: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(deserialize_with = "lenient_text")]
    pub image: String,
    #[serde(deserialize_with = "lenient_text")]
    pub reviews: String,
    #[serde(deserialize_with = "lenient_text")]
    pub profile: String,
    #[serde(deserialize_with = "lenient_text")]
    pub cover: String,
    #[serde(deserialize_with = "lenient_text")]
    pub price: String,
    pub contact_info: Option<ContactInfo>,
}

/// Keeps the hidden coordinate fields in step with `location`.
pub(crate) fn derive_coordinates(values: &mut FieldMap) {
    let (lat, lon) = split_coordinates(values.text(LOCATION));
    let (lat, lon) = (lat.to_string(), lon.to_string());
    values.set(LATITUDE, lat);
    values.set(LONGITUDE, lon);
}

pub(crate) fn payload(values: &FieldMap, description: String) -> ClubPayload {
    let text = |name: &str| values.text(name).to_string();
    ClubPayload {
        sport_category: text("sport_category"),
        slug: text("slug"),
        sport_name: text(TITLE),
        latitude: coerce_float(values.text(LATITUDE)),
        longitude: coerce_float(values.text(LONGITUDE)),
        seat_number: coerce_int(values.text("seat_number")),
        skill_level: text("skill_level"),
        description,
        image: text(IMAGE),
        reviews: text("reviews"),
        profile: text("profile"),
        cover: text("cover"),
        price: text("price"),
        contact_info: ContactInfo {
            first_phone: text("first_phone"),
            second_phone: text("second_phone"),
            email: text("email"),
            website: text("website"),
            facebook: text("facebook"),
            telegram: text("telegram"),
            instagram: text("instagram"),
            twitter: text("twitter"),
            istad_account: text("istad_account"),
        },
    }
}

pub(crate) fn fields_from_record(record: &ClubRecord) -> FieldMap {
    let mut values = FieldMap::empty(FIELDS);
    values.set(TITLE, record.sport_name.clone());
    values.set("slug", record.slug.clone());
    values.set("sport_category", record.sport_category.clone());
    let location = if record.latitude.is_empty() && record.longitude.is_empty() {
        String::new()
    } else {
        format!("{},{}", record.latitude, record.longitude)
    };
    values.set(LOCATION, location);
    derive_coordinates(&mut values);
    values.set("seat_number", record.seat_number.clone());
    values.set("skill_level", record.skill_level.clone());
    values.set("price", record.price.clone());
    values.set("reviews", record.reviews.clone());
    values.set("profile", record.profile.clone());
    values.set("cover", record.cover.clone());
    values.set(IMAGE, record.image.clone());

    let contact = record.contact_info.clone().unwrap_or_default();
    values.set("first_phone", contact.first_phone);
    values.set("second_phone", contact.second_phone);
    values.set("email", contact.email);
    values.set("website", contact.website);
    values.set("facebook", contact.facebook);
    values.set("telegram", contact.telegram);
    values.set("instagram", contact.instagram);
    values.set("twitter", contact.twitter);
    values.set("istad_account", contact.istad_account);
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::validation::validate;

    fn filled() -> FieldMap {
        let mut values = FieldMap::empty(FIELDS);
        values.set(TITLE, "Phnom Penh Football");
        values.set("slug", "phnom-penh-football");
        values.set("sport_category", CATEGORIES[0].value);
        values.set(LOCATION, "11.55, 104.92");
        derive_coordinates(&mut values);
        values.set("seat_number", "20");
        values.set("skill_level", "Beginner");
        values.set("price", "5$");
        values.set("email", "club@example.com");
        values.set("website", "https://club.example");
        values.set(IMAGE, "abc123.png");
        values
    }

    #[test]
    fn filled_form_validates() {
        assert!(validate(FIELDS, &filled()).is_empty());
    }

    #[test]
    fn location_derives_coordinates() {
        let values = filled();
        assert_eq!(values.text(LATITUDE), "11.55");
        assert_eq!(values.text(LONGITUDE), "104.92");
    }

    #[test]
    fn location_without_comma_clears_longitude() {
        let mut values = filled();
        values.set(LOCATION, "11.55");
        derive_coordinates(&mut values);
        assert_eq!(values.text(LATITUDE), "11.55");
        assert_eq!(values.text(LONGITUDE), "");
    }

    #[test]
    fn payload_coerces_numbers_and_nests_contacts() {
        let payload = payload(&filled(), "<p>Hi</p>".into());
        assert_eq!(payload.seat_number, Some(20));
        assert_eq!(payload.latitude, Some(11.55));
        assert_eq!(payload.longitude, Some(104.92));
        assert_eq!(payload.price, "5$");
        assert_eq!(payload.contact_info.email, "club@example.com");
        assert_eq!(payload.contact_info.website, "https://club.example");
        assert_eq!(payload.description, "<p>Hi</p>");

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["seat_number"], 20);
        assert_eq!(json["contact_info"]["email"], "club@example.com");
        assert!(json.get("email").is_none());
    }

    #[test]
    fn unparseable_seat_number_is_sent_as_null() {
        let mut values = filled();
        values.set("seat_number", "abc");
        let payload = payload(&values, "<p>Hi</p>".into());
        assert_eq!(payload.seat_number, None);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["seat_number"].is_null());
    }

    #[test]
    fn record_round_trips_into_fields() {
        let record: ClubRecord = serde_json::from_str(
            r#"{
                "id": "c1",
                "sport_category": "02b8ee87-374f-42d0-8a17-27867be2dba2",
                "slug": "downtown-hoops",
                "sport_name": "Downtown Hoops",
                "latitude": 11.5,
                "longitude": "104.9",
                "seat_number": 12,
                "skill_level": "Open",
                "description": "<p>Courts</p>",
                "image": "hoops.png",
                "price": 3,
                "contact_info": {"email": "hoops@example.com", "telegram": null}
            }"#,
        )
        .unwrap();

        let values = fields_from_record(&record);
        assert_eq!(values.text(TITLE), "Downtown Hoops");
        assert_eq!(values.text(LOCATION), "11.5,104.9");
        assert_eq!(values.text(LATITUDE), "11.5");
        assert_eq!(values.text(LONGITUDE), "104.9");
        assert_eq!(values.text("seat_number"), "12");
        assert_eq!(values.text("price"), "3");
        assert_eq!(values.text("email"), "hoops@example.com");
        assert_eq!(values.text("telegram"), "");
    }

    #[test]
    fn record_without_coordinates_has_empty_location() {
        let record = ClubRecord::default();
        let values = fields_from_record(&record);
        assert_eq!(values.text(LOCATION), "");
    }
}
