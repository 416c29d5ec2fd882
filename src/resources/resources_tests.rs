//! Tests for the resource wrappers.

use super::*;
use crate::client::ClientConfig;
use crate::error::ErrorKind;
use crate::time::InstantSleeper;
use crate::transport::mock::{MockClient, response, response_with};
use serde_json::json;

fn client(mock: &MockClient) -> ApiClient<MockClient, InstantSleeper> {
    ApiClient::with_http_client(
        ClientConfig::new("sk_test").with_base_url("https://api.example.com/v1/"),
        mock.clone(),
    )
    .unwrap()
    .with_sleeper(InstantSleeper)
}

fn invoice_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "status": status,
        "number": "2024-0001",
        "currency": "EUR",
        "total": 121.0,
        "lines": [{"description": "Consulting", "quantity": 1.0, "unit_price": 100.0, "tax_rate": 21.0}],
        "created_at": "2024-01-01T10:00:00Z",
        "peppol_id": "0088:123"
    })
}

mod list_options {
    use super::*;

    #[test]
    fn empty_options_produce_no_query() {
        assert!(ListOptions::new().to_query().is_empty());
    }

    #[test]
    fn all_options_become_query_pairs() {
        let query = ListOptions::new()
            .with_page(2)
            .with_per_page(50)
            .with_sort("-created_at")
            .with_filter("status", "paid")
            .to_query();

        assert_eq!(
            query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("per_page".to_string(), "50".to_string()),
                ("sort".to_string(), "-created_at".to_string()),
                ("filter[status]".to_string(), "paid".to_string()),
            ]
        );
    }
}

mod page {
    use super::*;

    #[test]
    fn missing_meta_defaults_to_single_page() {
        let page: Page<Company> = serde_json::from_value(json!({"data": []})).unwrap();

        assert_eq!(page.meta, PageMeta::default());
        assert!(!page.has_next_page());
    }

    #[test]
    fn next_page_options_advance_page() {
        let page: Page<Company> = serde_json::from_value(json!({
            "data": [],
            "meta": {"current_page": 1, "per_page": 10, "total": 25, "last_page": 3}
        }))
        .unwrap();
        let current = ListOptions::new().with_per_page(10);

        let next = page.next_page_options(&current).unwrap();

        assert!(page.has_next_page());
        assert_eq!(next.page, Some(2));
        assert_eq!(next.per_page, Some(10));
    }

    #[test]
    fn last_page_has_no_next() {
        let page: Page<Company> = serde_json::from_value(json!({
            "data": [],
            "meta": {"current_page": 3, "per_page": 10, "total": 25, "last_page": 3}
        }))
        .unwrap();

        assert!(page.next_page_options(&ListOptions::new()).is_none());
    }
}

mod invoices {
    use super::*;

    #[tokio::test]
    async fn list_sends_options_and_decodes_page() {
        let mock = MockClient::json(
            200,
            &json!({
                "data": [invoice_json("inv_1", "paid")],
                "meta": {"current_page": 1, "per_page": 1, "total": 2, "last_page": 2}
            }),
        );

        let page = client(&mock)
            .invoices()
            .list(&ListOptions::new().with_per_page(1))
            .await
            .unwrap();

        assert_eq!(mock.last_request().url.as_str(), "https://api.example.com/v1/invoices?per_page=1");
        assert_eq!(page.data[0].status, InvoiceStatus::Paid);
        assert!(page.has_next_page());
    }

    #[tokio::test]
    async fn get_unwraps_envelope_and_keeps_unknown_fields() {
        let mock = MockClient::json(200, &json!({"data": invoice_json("inv_1", "sent")}));

        let invoice = client(&mock).invoices().get("inv_1").await.unwrap();

        assert_eq!(invoice.id, "inv_1");
        assert_eq!(invoice.status, InvoiceStatus::Sent);
        assert_eq!(invoice.lines[0].tax_rate, Some(21.0));
        assert_eq!(invoice.extra["peppol_id"], "0088:123");
    }

    #[tokio::test]
    async fn unknown_status_does_not_fail_decoding() {
        let mock = MockClient::json(200, &json!({"data": invoice_json("inv_1", "archived")}));

        let invoice = client(&mock).invoices().get("inv_1").await.unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Unknown);
    }

    #[tokio::test]
    async fn create_posts_body_with_idempotency_key() {
        let mock = MockClient::json(201, &json!({"data": invoice_json("inv_2", "draft")}));
        let new = NewInvoice {
            customer: Party {
                name: "ACME BV".to_string(),
                tax_id: Some("NL123456789B01".to_string()),
                ..Party::default()
            },
            lines: vec![InvoiceLine {
                description: "Consulting".to_string(),
                quantity: 1.0,
                unit_price: 100.0,
                ..InvoiceLine::default()
            }],
            currency: "EUR".to_string(),
            ..NewInvoice::default()
        };

        let invoice = client(&mock).invoices().create(&new).await.unwrap();

        let req = mock.last_request();
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(invoice.id, "inv_2");
        assert_eq!(req.method, http::Method::POST);
        assert_eq!(body["customer"]["tax_id"], "NL123456789B01");
        assert!(body.get("due_date").is_none());
        assert!(uuid::Uuid::parse_str(req.headers["idempotency-key"].to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn create_surfaces_field_errors() {
        let mock = MockClient::json(
            422,
            &json!({"message": "Invalid invoice", "errors": {"currency": ["is required"]}}),
        );

        let err = client(&mock).invoices().create(&NewInvoice::default()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.field_errors()["currency"], vec!["is required"]);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn send_and_cancel_post_to_action_paths() {
        let mock = MockClient::new(vec![
            Ok(response(200, &json!({"data": invoice_json("inv_1", "sent")}))),
            Ok(response(200, &json!({"data": invoice_json("inv_1", "cancelled")}))),
        ]);
        let client = client(&mock);

        let sent = client.invoices().send("inv_1").await.unwrap();
        let cancelled = client.invoices().cancel("inv_1").await.unwrap();

        let paths: Vec<String> = mock
            .captured_requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url.path()))
            .collect();
        assert_eq!(paths, ["POST /v1/invoices/inv_1/send", "POST /v1/invoices/inv_1/cancel"]);
        assert_eq!(sent.status, InvoiceStatus::Sent);
        assert_eq!(cancelled.status, InvoiceStatus::Cancelled);
    }

    #[tokio::test]
    async fn download_pdf_returns_bytes() {
        let mock = MockClient::new(vec![Ok(response_with(
            200,
            &[("content-type", "application/pdf")],
            b"%PDF-1.7 ...",
        ))]);

        let pdf = client(&mock).invoices().download_pdf("inv_1").await.unwrap();

        assert!(pdf.starts_with(b"%PDF"));
        assert_eq!(mock.last_request().url.path(), "/v1/invoices/inv_1/pdf");
    }
}

mod signatures {
    use super::*;

    fn signature_json(status: &str) -> serde_json::Value {
        json!({
            "id": "sig_1",
            "status": status,
            "document_name": "contract.pdf",
            "signers": [{"name": "Ada", "email": "ada@example.com"}]
        })
    }

    #[tokio::test]
    async fn create_posts_signers() {
        let mock = MockClient::json(201, &json!({"data": signature_json("pending")}));
        let new = NewSignatureRequest {
            document_name: "contract.pdf".to_string(),
            document_url: Some("https://files.example.com/contract.pdf".to_string()),
            signers: vec![NewSigner {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                ..NewSigner::default()
            }],
            ..NewSignatureRequest::default()
        };

        let created = client(&mock).signatures().create(&new).await.unwrap();

        let req = mock.last_request();
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(created.status, SignatureStatus::Pending);
        assert_eq!(created.signers[0].email, "ada@example.com");
        assert_eq!(body["signers"][0]["name"], "Ada");
        assert!(body.get("document").is_none());
        assert!(req.headers.contains_key("idempotency-key"));
    }

    #[tokio::test]
    async fn insufficient_balance_is_not_retried() {
        let mock = MockClient::json(402, &json!({"message": "Not enough credits"}));

        let err = client(&mock)
            .signatures()
            .create(&NewSignatureRequest::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn list_get_cancel_and_download_hit_expected_paths() {
        let mock = MockClient::new(vec![
            Ok(response(200, &json!({"data": [signature_json("completed")]}))),
            Ok(response(200, &json!({"data": signature_json("completed")}))),
            Ok(response(200, &json!({"data": signature_json("cancelled")}))),
            Ok(response_with(200, &[], b"%PDF-signed")),
        ]);
        let client = client(&mock);

        let page = client.signatures().list(&ListOptions::new()).await.unwrap();
        let one = client.signatures().get("sig_1").await.unwrap();
        let cancelled = client.signatures().cancel("sig_1").await.unwrap();
        let signed = client.signatures().download_signed("sig_1").await.unwrap();

        let paths: Vec<String> = mock
            .captured_requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url.path()))
            .collect();
        assert_eq!(
            paths,
            [
                "GET /v1/signatures",
                "GET /v1/signatures/sig_1",
                "POST /v1/signatures/sig_1/cancel",
                "GET /v1/signatures/sig_1/download",
            ]
        );
        assert_eq!(page.data.len(), 1);
        assert_eq!(one.status, SignatureStatus::Completed);
        assert_eq!(cancelled.status, SignatureStatus::Cancelled);
        assert_eq!(signed, b"%PDF-signed");
    }
}

mod companies {
    use super::*;

    #[tokio::test]
    async fn list_and_get_decode_companies() {
        let company = json!({"id": "cmp_1", "name": "ACME BV", "country": "NL"});
        let mock = MockClient::new(vec![
            Ok(response(200, &json!({"data": [company.clone()]}))),
            Ok(response(200, &json!({"data": company}))),
        ]);
        let client = client(&mock);

        let page = client.companies().list(&ListOptions::new()).await.unwrap();
        let one = client.companies().get("cmp_1").await.unwrap();

        assert_eq!(page.data[0].name, "ACME BV");
        assert_eq!(one.country.as_deref(), Some("NL"));
        assert_eq!(mock.last_request().url.path(), "/v1/companies/cmp_1");
    }

    #[tokio::test]
    async fn missing_company_is_not_found() {
        let mock = MockClient::json(404, &json!({"error": "Company not found"}));

        let err = client(&mock).companies().get("cmp_x").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "Company not found");
    }
}
