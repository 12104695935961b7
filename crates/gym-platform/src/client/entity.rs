//! Client Entity
//!
//! A gym member. Subscription and attendance history are not embedded here:
//! children reference the client by id and are resolved through indexed
//! queries, so the document stays small and there is no cyclic ownership.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use bson::serde_helpers::chrono_datetime_as_bson_datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

/// Client entity - a registered gym member
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// TSID as Crockford Base32 string
    #[serde(rename = "_id")]
    pub id: String,

    pub full_name: String,

    /// Unique contact number, also the front-desk lookup key
    pub phone: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,

    /// Opaque token assigned by the fingerprint device. Never interpreted
    /// here; the device resolves fingerprints to this token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint_id: Option<String>,

    /// Raw template blob from the device, stored pass-through
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint_data: Option<String>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn new(full_name: impl Into<String>, phone: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: crate::shared::tsid::TsidGenerator::generate(),
            full_name: full_name.into(),
            phone: phone.into(),
            email: None,
            gender: None,
            birth_date: None,
            fingerprint_id: None,
            fingerprint_data: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    /// Store the device-issued fingerprint enrollment.
    pub fn enroll_fingerprint(&mut self, device_token: impl Into<String>, template: Option<String>) {
        self.fingerprint_id = Some(device_token.into());
        self.fingerprint_data = template;
        self.updated_at = Utc::now();
    }

    pub fn is_enrolled(&self) -> bool {
        self.fingerprint_id.is_some()
    }
}

impl crate::usecase::unit_of_work::HasId for Client {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "clients"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_optionals() {
        let client = Client::new("Aya Ziyad", "0601010101")
            .with_email("aya@example.com")
            .with_gender(Gender::Female)
            .with_birth_date(NaiveDate::from_ymd_opt(2005, 5, 15).unwrap());

        assert_eq!(client.full_name, "Aya Ziyad");
        assert_eq!(client.email.as_deref(), Some("aya@example.com"));
        assert!(!client.is_enrolled());
    }

    #[test]
    fn fingerprint_enrollment() {
        let mut client = Client::new("Aya Ziyad", "0601010101");
        client.enroll_fingerprint("FP-0042", Some("template-bytes".to_string()));

        assert!(client.is_enrolled());
        assert_eq!(client.fingerprint_id.as_deref(), Some("FP-0042"));
    }

    #[test]
    fn gender_serializes_screaming() {
        let json = serde_json::to_string(&Gender::Female).unwrap();
        assert_eq!(json, "\"FEMALE\"");
    }
}
