//! Contact form submissions.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// One contact form submission, written once to the record store under its
/// id and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub id: String,
    pub timestamp: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ContactRecord {
    pub fn new(name: String, email: String, phone: Option<String>, message: String) -> Self {
        Self {
            id: submission_id(),
            timestamp: Utc::now().to_rfc3339(),
            name,
            email,
            phone,
            message,
            image_url: None,
        }
    }
}

/// Submission identifier: `<unix-millis>-<6 random base36 chars>`.
///
/// Collisions would need two submissions in the same millisecond drawing the
/// same suffix; that probability is accepted rather than mitigated.
pub fn submission_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String =
        (0..6).map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char).collect();
    format!("{millis}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::{submission_id, ContactRecord};

    #[test]
    fn submission_id_has_millis_and_base36_suffix() {
        let id = submission_id();
        let (millis, suffix) = id.split_once('-').expect("id should contain a dash");

        assert!(millis.parse::<i64>().expect("millis prefix") > 0);
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn consecutive_ids_differ() {
        assert_ne!(submission_id(), submission_id());
    }

    #[test]
    fn optional_fields_are_omitted_from_the_stored_record() {
        let record = ContactRecord::new(
            "Jordan".to_string(),
            "jordan@example.com".to_string(),
            None,
            "Quote for two bedrooms".to_string(),
        );

        let value = serde_json::to_value(&record).expect("serialize");
        assert!(value.get("phone").is_none());
        assert!(value.get("imageUrl").is_none());
        assert_eq!(value["name"], "Jordan");
    }
}
