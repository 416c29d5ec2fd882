//! Tests for the webhook event envelope.

use super::{WebhookError, WebhookEvent, WebhookEventType};
use serde::Deserialize;
use serde_json::json;

mod event_type {
    use super::*;

    #[test]
    fn known_names_map_to_variants() {
        assert_eq!(
            WebhookEventType::from("invoice.paid"),
            WebhookEventType::InvoicePaid
        );
        assert_eq!(
            WebhookEventType::from("signature.completed".to_string()),
            WebhookEventType::SignatureCompleted
        );
    }

    #[test]
    fn unknown_names_are_preserved() {
        let event = WebhookEventType::from("company.verified");

        assert_eq!(event, WebhookEventType::Other("company.verified".to_string()));
        assert_eq!(event.as_str(), "company.verified");
    }

    #[test]
    fn serializes_as_plain_string() {
        let value = serde_json::to_value(WebhookEventType::InvoiceCancelled).unwrap();
        assert_eq!(value, json!("invoice.cancelled"));
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(WebhookEventType::SignatureExpired.to_string(), "signature.expired");
    }
}

mod envelope {
    use super::*;

    #[test]
    fn parses_wire_envelope() {
        let raw = r#"{"event":"invoice.sent","timestamp":"2024-01-02T03:04:05.000Z","data":{"id":"inv_1"}}"#;
        let event = WebhookEvent::from_json(raw).unwrap();

        assert_eq!(event.event, WebhookEventType::InvoiceSent);
        assert_eq!(event.timestamp, "2024-01-02T03:04:05.000Z");
        assert_eq!(event.data["id"], "inv_1");
    }

    #[test]
    fn round_trips_through_json() {
        let envelopes = [
            WebhookEvent {
                event: WebhookEventType::InvoicePaid,
                timestamp: "2024-05-06T07:08:09.123Z".to_string(),
                data: json!({"id": "inv_9", "amount": 121.0, "lines": [1, 2]}),
            },
            WebhookEvent {
                event: WebhookEventType::Other("company.updated".to_string()),
                timestamp: "2024-05-06T07:08:09Z".to_string(),
                data: json!(null),
            },
        ];

        for envelope in envelopes {
            let raw = serde_json::to_string(&envelope).unwrap();
            assert_eq!(WebhookEvent::from_json(&raw).unwrap(), envelope);
        }
    }

    #[test]
    fn typed_data_decodes() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Paid {
            id: String,
        }

        let raw = r#"{"event":"invoice.paid","timestamp":"t","data":{"id":"inv_2"}}"#;
        let event = WebhookEvent::<Paid>::from_json_as(raw).unwrap();

        assert_eq!(event.data, Paid { id: "inv_2".to_string() });
    }

    #[test]
    fn malformed_json_is_payload_error() {
        let err = WebhookEvent::from_json("{not json").unwrap_err();
        assert!(matches!(err, WebhookError::Payload(_)));
    }

    #[test]
    fn missing_field_is_payload_error() {
        let err = WebhookEvent::from_json(r#"{"event":"invoice.paid","data":{}}"#).unwrap_err();
        assert!(matches!(err, WebhookError::Payload(_)));
    }
}
