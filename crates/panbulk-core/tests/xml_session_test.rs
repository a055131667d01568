#![allow(clippy::unwrap_used)]
// End-to-end workflow tests through `XmlApiConnector` against wiremock.

use std::collections::HashMap;
use std::time::Duration;

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use panbulk_core::{CoreError, ProvisionConfig, RandomSelector, XmlApiConnector, provision};

// ── Helpers ─────────────────────────────────────────────────────────

const OK: &str = r#"<response status="success" code="20"><msg>command succeeded</msg></response>"#;

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_owned(), "application/xml")
}

fn config_for(server: &MockServer) -> ProvisionConfig {
    ProvisionConfig {
        host: server.uri(),
        password: "secret".to_string().into(),
        timeout: Duration::from_secs(5),
        ..ProvisionConfig::default()
    }
}

async fn mount_keygen(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_string_contains("type=keygen"))
        .respond_with(xml(
            r#"<response status="success"><result><key>KEY123</key></result></response>"#,
        ))
        .mount(server)
        .await;
}

/// A firewall with two vsys, one unrelated interface, and permissive writes.
async fn mount_device(server: &MockServer) {
    mount_keygen(server).await;

    Mock::given(method("POST"))
        .and(body_string_contains("type=op"))
        .respond_with(xml(
            r#"<response status="success"><result><system>
                 <hostname>fw-lab</hostname><model>PA-VM</model>
                 <serial>007</serial><sw-version>10.2.4</sw-version>
               </system></result></response>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("%2Fvsys%2Fentry%2F%40name"))
        .respond_with(xml(
            r#"<response status="success"><result total-count="2" count="2">
                 <entry name="vsys1"/><entry name="vsys2"/>
               </result></response>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("%2Fethernet%2Fentry%2F%40name"))
        .respond_with(xml(
            r#"<response status="success"><result total-count="1" count="1">
                 <entry name="ethernet1/1"/>
               </result></response>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("action=multi-config"))
        .respond_with(xml(OK))
        .mount(server)
        .await;
}

async fn forms(server: &MockServer) -> Vec<HashMap<String, String>> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| url::form_urlencoded::parse(&r.body).into_owned().collect())
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn provisioning_sends_one_request_per_step() {
    let server = MockServer::start().await;
    mount_device(&server).await;

    let report = provision(
        &config_for(&server),
        &XmlApiConnector,
        &RandomSelector::seeded(1),
    )
    .await
    .unwrap();

    let forms = forms(&server).await;
    assert_eq!(forms.len(), 8, "keygen, info, 2 listings, 4 writes");
    assert_eq!(forms[0]["type"], "keygen");

    let writes: Vec<&String> = forms
        .iter()
        .filter(|f| f.get("action").map(String::as_str) == Some("multi-config"))
        .map(|f| &f["element"])
        .collect();
    assert_eq!(writes.len(), 4);

    // Base interface and its vsys import travel together.
    assert!(writes[0].contains(r#"<entry name="ethernet1/5"><layer3/></entry>"#));
    assert!(writes[0].contains("<member>ethernet1/5</member>"));

    // Every subinterface is in the single batch request.
    let batch = writes[1];
    for i in 1..=6 {
        assert!(
            batch.contains(&format!(r#"<entry name="ethernet1/5.{i}"><tag>{i}</tag>"#)),
            "missing subinterface {i}: {batch}"
        );
    }
    assert!(batch.contains(r#"<ip><entry name="4.4.4.4/24"/></ip>"#));
    assert!(batch.contains(&format!("entry[@name=&apos;{}&apos;]/import", report.vsys)));

    assert!(writes[2].contains("virtual-router"));
    assert!(writes[3].contains("zone"));
    assert!(writes[3].contains("<member>ethernet1/5.6</member>"));

    assert!(["vsys1", "vsys2"].contains(&report.vsys.name()));
    assert_eq!(report.system.sw_version.as_deref(), Some("10.2.4"));

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("X-PAN-KEY").is_none());
    for request in &requests[1..] {
        assert_eq!(request.headers.get("X-PAN-KEY").unwrap(), "KEY123");
    }
}

#[tokio::test]
async fn rejected_login_creates_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(xml(
            r#"<response status="error" code="403"><result><msg>Invalid Credential</msg></result></response>"#,
        ))
        .mount(&server)
        .await;

    let err = provision(
        &config_for(&server),
        &XmlApiConnector,
        &RandomSelector::new(),
    )
    .await
    .unwrap_err();

    match err {
        CoreError::Operation {
            ref operation,
            ref source,
            ..
        } => {
            assert_eq!(operation, "login");
            assert!(
                matches!(**source, CoreError::AuthenticationFailed { .. }),
                "got: {source:?}"
            );
        }
        ref other => panic!("expected Operation, got {other:?}"),
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_device_is_connection_failure() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    drop(server);

    let err = provision(&config, &XmlApiConnector, &RandomSelector::new())
        .await
        .unwrap_err();

    match err {
        CoreError::Operation {
            ref operation,
            ref source,
            ..
        } => {
            assert_eq!(operation, "login");
            assert!(
                matches!(**source, CoreError::ConnectionFailed { .. }),
                "got: {source:?}"
            );
        }
        ref other => panic!("expected Operation, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_device_reports_configured_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(xml(OK).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = ProvisionConfig {
        timeout: Duration::from_secs(1),
        ..config_for(&server)
    };
    let err = provision(&config, &XmlApiConnector, &RandomSelector::new())
        .await
        .unwrap_err();

    match err {
        CoreError::Operation { ref source, .. } => assert!(
            matches!(
                **source,
                CoreError::Timeout {
                    timeout_secs: Some(1)
                }
            ),
            "got: {source:?}"
        ),
        ref other => panic!("expected Operation, got {other:?}"),
    }
    assert!(err.to_string().contains("timed out after 1s"), "{err}");
}

#[tokio::test]
async fn failed_batch_request_names_operation_and_target() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("layer3%2Funits"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_device(&server).await;

    let err = provision(
        &config_for(&server),
        &XmlApiConnector,
        &RandomSelector::new(),
    )
    .await
    .unwrap_err();

    match err {
        CoreError::Operation {
            ref operation,
            ref target,
            ref source,
        } => {
            assert_eq!(operation, "create subinterfaces");
            assert_eq!(target, "ethernet1/5.1..ethernet1/5.6");
            assert!(source.to_string().contains("500"), "got: {source}");
        }
        ref other => panic!("expected Operation, got {other:?}"),
    }
    assert!(err.to_string().contains("create subinterfaces failed for ethernet1/5.1"));
}

#[tokio::test]
async fn device_rejection_of_batch_names_operation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("layer3%2Funits"))
        .respond_with(xml(
            r#"<response status="error" code="12">
                 <response id="1" status="error" code="12"><msg><line>tag 1 is already in use</line></msg></response>
               </response>"#,
        ))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_device(&server).await;

    let err = provision(
        &config_for(&server),
        &XmlApiConnector,
        &RandomSelector::new(),
    )
    .await
    .unwrap_err();

    match err {
        CoreError::Rejected {
            ref operation,
            ref target,
            ref message,
            ..
        } => {
            assert_eq!(operation, "create subinterfaces");
            assert_eq!(target, "ethernet1/5.1..ethernet1/5.6");
            assert!(message.contains("already in use"), "got: {message}");
        }
        ref other => panic!("expected Rejected, got {other:?}"),
    }

    // keygen, info, 2 listings, base interface, batch
    assert_eq!(server.received_requests().await.unwrap().len(), 6);
}

#[tokio::test]
async fn existing_interface_stops_before_writes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("%2Fethernet%2Fentry%2F%40name"))
        .respond_with(xml(
            r#"<response status="success"><result><entry name="ethernet1/5"/></result></response>"#,
        ))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_device(&server).await;

    let err = provision(
        &config_for(&server),
        &XmlApiConnector,
        &RandomSelector::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CoreError::InterfaceExists { .. }));
    let writes = forms(&server)
        .await
        .into_iter()
        .filter(|f| f.get("action").map(String::as_str) == Some("multi-config"))
        .count();
    assert_eq!(writes, 0);
}
