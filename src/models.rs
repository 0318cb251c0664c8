// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response shapes of the gateway routes, plus the view of a
//! donation record as returned by the backend.
//!
//! ## Model Categories
//!
//! - **Donations**: backend records and the listing filter
//! - **Notifications**: donor notification request, response and email template

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

// =============================================================================
// Donation Models
// =============================================================================

/// A donation as listed by the backend.
///
/// Only the three filterable fields are typed; every other field the backend
/// sends (identifier, description, image, owner...) is carried through
/// untouched so the caller sees the full record. A record missing one of the
/// filterable fields is still listed; it just never matches a filter on it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Donation {
    /// Donation category (e.g. `ropa`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// City where the donation is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Condition of the donated item (e.g. `usado`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Remaining backend-defined fields.
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

/// Exact-match filters for the donation listing.
///
/// An absent or empty parameter places no constraint on its field.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DonationFilter {
    /// Keep only donations of this category.
    pub category: Option<String>,
    /// Keep only donations located in this city.
    pub city: Option<String>,
    /// Keep only donations in this condition.
    pub condition: Option<String>,
}

impl DonationFilter {
    /// Whether every supplied filter equals the corresponding field.
    /// Comparison is case-sensitive with no normalization.
    pub fn matches(&self, donation: &Donation) -> bool {
        field_matches(self.category.as_deref(), donation.category.as_deref())
            && field_matches(self.city.as_deref(), donation.city.as_deref())
            && field_matches(self.condition.as_deref(), donation.condition.as_deref())
    }

    /// Keep the matching donations, preserving their order.
    pub fn apply(&self, mut donations: Vec<Donation>) -> Vec<Donation> {
        donations.retain(|donation| self.matches(donation));
        donations
    }
}

fn field_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted {
        Some(wanted) if !wanted.is_empty() => actual == Some(wanted),
        _ => true,
    }
}

// =============================================================================
// Notification Models
// =============================================================================

/// Request to notify a donor that someone is interested in a donation.
///
/// Fields are optional at the wire level so that a missing value is reported
/// with the gateway's own message instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NotificationRequest {
    /// Donor email address.
    #[schema(example = "prueba1@example.com")]
    #[serde(default)]
    pub email: Option<String>,
    /// Donation identifier on the backend, as a string or a number.
    #[schema(value_type = Option<String>, example = "6844c9dd3894943e5eeec9b1")]
    #[serde(default)]
    pub id: Option<Value>,
    /// Description of the donated item, quoted in the email body.
    #[schema(example = "Conjunto de chaquetas")]
    #[serde(default)]
    pub description: Option<String>,
}

impl NotificationRequest {
    /// The donation identifier as it goes into the backend URL.
    ///
    /// Non-blank strings and non-zero numbers are accepted; null, blank,
    /// zero and any other JSON shape count as missing.
    pub fn donation_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(id) if !id.trim().is_empty() => Some(id.clone()),
            Value::Number(id) if id.as_f64() != Some(0.0) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Confirmation returned once the donor was notified and the donation
/// marked unavailable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NotificationResponse {
    pub mensaje: String,
}

impl NotificationResponse {
    pub fn sent() -> Self {
        Self {
            mensaje: "La notificacion fue enviada correctamente".to_string(),
        }
    }
}

pub const NOTIFICATION_SUBJECT: &str = "¡Alguien está interesado en tu donación!";

const NOTIFICATION_GREETING: &str = "Hola, ¡alguien se ha interesado en una de tus donaciones! \
En los próximos días, la persona interesada se pondrá en contacto contigo para coordinar la \
entrega. ¡Gracias por tu generosidad!";

/// A fully composed donor notification, ready for the mail relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl NotificationEmail {
    /// Compose the fixed-template notification for `recipient`.
    pub fn for_donation(recipient: &str, description: &str) -> Self {
        Self {
            recipient: recipient.to_string(),
            subject: NOTIFICATION_SUBJECT.to_string(),
            body: format!("{NOTIFICATION_GREETING}\n\nDescripcion del producto: {description}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn donation(category: &str, city: &str, condition: &str) -> Donation {
        serde_json::from_value(json!({
            "category": category,
            "city": city,
            "condition": condition,
        }))
        .unwrap()
    }

    #[test]
    fn filter_by_city_keeps_only_exact_matches() {
        let donations = vec![
            donation("ropa", "Bogota", "usado"),
            donation("ropa", "Cali", "usado"),
        ];
        let filter = DonationFilter {
            city: Some("Bogota".into()),
            ..Default::default()
        };

        let filtered = filter.apply(donations.clone());
        assert_eq!(filtered, vec![donations[0].clone()]);
    }

    #[test]
    fn filter_is_case_sensitive_and_exact() {
        let d = donation("ropa", "Bogota", "usado");
        let lower = DonationFilter {
            city: Some("bogota".into()),
            ..Default::default()
        };
        let partial = DonationFilter {
            city: Some("Bogo".into()),
            ..Default::default()
        };
        assert!(!lower.matches(&d));
        assert!(!partial.matches(&d));
    }

    #[test]
    fn empty_filter_keeps_everything_in_order() {
        let donations = vec![
            donation("muebles", "Cali", "nuevo"),
            donation("ropa", "Bogota", "usado"),
            donation("libros", "Medellin", "usado"),
        ];
        assert_eq!(DonationFilter::default().apply(donations.clone()), donations);

        let blank = DonationFilter {
            category: Some(String::new()),
            city: None,
            condition: Some(String::new()),
        };
        assert_eq!(blank.apply(donations.clone()), donations);
    }

    #[test]
    fn all_supplied_filters_must_match() {
        let donations = vec![
            donation("ropa", "Bogota", "usado"),
            donation("ropa", "Bogota", "nuevo"),
            donation("libros", "Bogota", "usado"),
            donation("ropa", "Cali", "usado"),
            donation("ropa", "Bogota", "usado"),
        ];
        let filter = DonationFilter {
            category: Some("ropa".into()),
            city: Some("Bogota".into()),
            condition: Some("usado".into()),
        };

        let filtered = filter.apply(donations.clone());
        assert_eq!(filtered, vec![donations[0].clone(), donations[4].clone()]);
    }

    #[test]
    fn donation_keeps_backend_fields() {
        let raw = json!({
            "_id": "6844c9dd3894943e5eeec9b1",
            "category": "ropa",
            "city": "Bogota",
            "condition": "usado",
            "available": true,
        });
        let parsed: Donation = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.extra["_id"], "6844c9dd3894943e5eeec9b1");
        assert_eq!(serde_json::to_value(&parsed).unwrap(), raw);
    }

    #[test]
    fn records_with_missing_fields_are_listed_but_never_match() {
        let donations: Vec<Donation> = serde_json::from_value(json!([
            {"category": "ropa", "city": "Bogota", "condition": "usado"},
            {"city": "Cali", "condition": null},
            {"city": "Cali"},
        ]))
        .unwrap();

        assert_eq!(DonationFilter::default().apply(donations.clone()), donations);

        let by_city = DonationFilter {
            city: Some("Bogota".into()),
            ..Default::default()
        };
        assert_eq!(by_city.apply(donations.clone()), vec![donations[0].clone()]);

        let by_condition = DonationFilter {
            condition: Some("usado".into()),
            ..Default::default()
        };
        assert_eq!(by_condition.apply(donations.clone()), vec![donations[0].clone()]);
    }

    #[test]
    fn non_object_records_are_rejected() {
        assert!(serde_json::from_value::<Vec<Donation>>(json!(["ropa", 3])).is_err());
        assert!(serde_json::from_value::<Vec<Donation>>(json!({"city": "Cali"})).is_err());
    }

    #[test]
    fn donation_id_accepts_strings_and_numbers() {
        let id_of = |id: Value| -> Option<String> {
            serde_json::from_value::<NotificationRequest>(json!({ "id": id }))
                .unwrap()
                .donation_id()
        };

        assert_eq!(
            id_of(json!("6844c9dd3894943e5eeec9b1")).as_deref(),
            Some("6844c9dd3894943e5eeec9b1")
        );
        assert_eq!(id_of(json!(1)).as_deref(), Some("1"));
        assert_eq!(id_of(json!(42.5)).as_deref(), Some("42.5"));

        for missing in [
            json!(null),
            json!(""),
            json!("  "),
            json!(0),
            json!(false),
            json!([1]),
        ] {
            assert_eq!(id_of(missing.clone()), None, "{missing} should not be an id");
        }
        assert_eq!(NotificationRequest::default().donation_id(), None);
    }

    #[test]
    fn notification_email_embeds_description() {
        let email = NotificationEmail::for_donation("a@b.com", "Conjunto de chaquetas");
        assert_eq!(email.recipient, "a@b.com");
        assert_eq!(email.subject, NOTIFICATION_SUBJECT);
        assert!(email
            .body
            .ends_with("Descripcion del producto: Conjunto de chaquetas"));
        assert!(email.body.starts_with("Hola, ¡alguien se ha interesado"));
    }
}
