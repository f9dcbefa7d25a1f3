use aws_config::{BehaviorVersion, Region};
use aws_sdk_sesv2::config::Credentials;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zonescan_client::mail::SesMailer;
use zonescan_core::{MailMessage, MailTransport, ScanError};

fn message() -> MailMessage {
    MailMessage {
        subject: "Stale DNS records".to_string(),
        body: "Stale DNS records\n\n Those found in example.com\nstaging.example.com ... 1.2.3.4"
            .to_string(),
        char_set: "UTF-8".to_string(),
        sender: "noreply@example.com".to_string(),
    }
}

async fn mailer(server: &MockServer, session_token: Option<&str>) -> SesMailer {
    let credentials = Credentials::new(
        "AKIDEXAMPLE",
        "secret",
        session_token.map(String::from),
        None,
        "test",
    );
    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new("eu-west-1"))
        .credentials_provider(credentials)
        .endpoint_url(server.uri())
        .load()
        .await;
    SesMailer::new(&config)
}

#[tokio::test]
async fn send_is_signed_and_addressed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/email/outbound-emails"))
        .and(header_exists("x-amz-date"))
        .and(header_exists("authorization"))
        .and(body_partial_json(json!({
            "FromEmailAddress": "noreply@example.com",
            "Destination": { "ToAddresses": ["ops@example.com"] },
            "Content": { "Simple": { "Subject": { "Data": "Stale DNS records", "Charset": "UTF-8" } } },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "MessageId": "m-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let mailer = mailer(&server, None).await;
    assert_eq!(mailer.region(), Some("eu-west-1"));
    mailer.send(&message(), "ops@example.com").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0].headers.get("authorization").unwrap().to_str().unwrap();
    assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
    assert!(auth.contains("/eu-west-1/ses/aws4_request"));
}

#[tokio::test]
async fn session_token_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-amz-security-token", "session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "MessageId": "m-2" })))
        .expect(1)
        .mount(&server)
        .await;

    mailer(&server, Some("session"))
        .await
        .send(&message(), "ops@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn rejection_carries_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400)
                .insert_header("x-amzn-errortype", "MessageRejected")
                .set_body_json(json!({ "message": "Email address is not verified." })),
        )
        .mount(&server)
        .await;

    let err = mailer(&server, None)
        .await
        .send(&message(), "ops@example.com")
        .await
        .unwrap_err();

    match err {
        ScanError::Api { code, message } => {
            assert_eq!(code, 400);
            assert_eq!(message, "send email failed: Email address is not verified.");
        }
        other => panic!("unexpected error: {other}"),
    }
}
