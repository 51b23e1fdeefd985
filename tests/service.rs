//! Facade behavior against a scripted transport: error conversion policies,
//! trigger wiring, descriptor caching, and wire encoding of parameters.

mod common;

use common::{MockTransport, RecordingSink, failed_response, json_response};
use fleetsync::{
    ApiError, ErrorKind, Method, PathType, SyncService,
    api::types::{
        ApiListFlowsArgs, ApiSearchClientsArgs, ClientApprovalRequest, GetFileTextOptions,
    },
};
use futures::StreamExt;
use serde_json::json;
use std::time::Duration;

fn service(transport: std::sync::Arc<MockTransport>) -> SyncService {
    SyncService::new(transport, RecordingSink::new())
}

// ---------------------------------------------------------------------------
// Not-found tolerance
// ---------------------------------------------------------------------------

#[tokio::test]
async fn file_text_substitutes_none_on_404() {
    common::init_logging();
    let transport =
        MockTransport::new(|_request| Err(failed_response(404, r#"{"message": "no entry"}"#)));
    let sink = RecordingSink::new();
    let service = SyncService::new(transport, sink.clone());

    let text = service
        .get_file_text("C.1", PathType::Os, "/nonexistent", &GetFileTextOptions::default())
        .await
        .unwrap();

    assert!(text.is_none());
    // Expected absence is not an error; nothing reaches the sink.
    assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn file_text_propagates_other_failures() {
    let transport = MockTransport::new(|_request| Err(failed_response(500, "boom")));
    let service = service(transport);

    let err = service
        .get_file_text("C.1", PathType::Os, "/file", &GetFileTextOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Generic);
}

// ---------------------------------------------------------------------------
// Access gating
// ---------------------------------------------------------------------------

#[tokio::test]
async fn flow_listing_403_is_a_typed_access_denial() {
    let transport = MockTransport::new(|_request| {
        Err(failed_response(403, r#"{"message": "No approval found."}"#))
    });
    let service = service(transport);

    let err = service
        .list_flows_for_client(&ApiListFlowsArgs {
            client_id: "C.1".to_owned(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    match err {
        ApiError::AccessDenied { message, .. } => assert_eq!(message, "No approval found."),
        other => panic!("expected AccessDenied, got {other:?}"),
    }
}

#[tokio::test]
async fn flow_listing_500_stays_generic() {
    let transport = MockTransport::new(|_request| Err(failed_response(500, "boom")));
    let service = service(transport);

    let err = service
        .list_flows_for_client(&ApiListFlowsArgs {
            client_id: "C.1".to_owned(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Generic);
}

#[tokio::test]
async fn denied_access_check_yields_false() {
    let transport = MockTransport::new(|_request| Err(failed_response(403, "{}")));
    let sink = RecordingSink::new();
    let service = SyncService::new(transport, sink.clone());

    assert!(!service.verify_client_access("C.1").await.unwrap());
    assert!(!service.verify_hunt_access("H.1").await.unwrap());
    // The conversion happens before any stream or sink sees a failure.
    assert!(sink.messages().is_empty());
}

// ---------------------------------------------------------------------------
// Trigger wiring
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn approval_request_refreshes_active_subscription() {
    let transport = MockTransport::new(|request| match request.method {
        Method::Get => Ok(json_response(json!({"items": []}))),
        Method::Post => Ok(json_response(json!({"id": "approval-1"}))),
        other => panic!("unexpected request method: {other:?}"),
    });
    let service = service(transport.clone());

    let mut approvals = service.subscribe_to_list_client_approvals("C.1");
    approvals.next().await.unwrap().unwrap();
    assert_eq!(transport.count_requests("/users/me/approvals/client/C.1"), 1);

    service
        .request_client_approval(&ClientApprovalRequest {
            client_id: "C.1".to_owned(),
            reason: "t/123".to_owned(),
            approvers: vec!["admin".to_owned()],
            ..Default::default()
        })
        .await
        .unwrap();

    // The mutation pulses the trigger: the next evaluation happens without
    // waiting out the polling interval.
    let refreshed = tokio::time::timeout(Duration::from_secs(3), approvals.next()).await;
    assert!(refreshed.is_ok());
    assert_eq!(transport.count_requests("/users/me/approvals/client/C.1"), 3);
}

#[tokio::test(start_paused = true)]
async fn flow_subscriptions_poll_at_the_fixed_interval() {
    let transport = MockTransport::new(|_request| Ok(json_response(json!({"items": []}))));
    let service = service(transport.clone());

    let mut flows = service.subscribe_to_flows_for_client(&ApiListFlowsArgs {
        client_id: "C.1".to_owned(),
        count: Some(100),
        ..Default::default()
    });

    flows.next().await.unwrap().unwrap();
    flows.next().await.unwrap().unwrap();
    assert_eq!(transport.count_requests("/clients/C.1/flows"), 2);
}

// ---------------------------------------------------------------------------
// Descriptor caching
// ---------------------------------------------------------------------------

#[tokio::test]
async fn flow_descriptors_are_fetched_at_most_once() {
    let transport = MockTransport::new(|request| {
        match (request.method, request.path.as_str()) {
            (Method::Get, "/flows/descriptors") => Ok(json_response(json!({
                "items": [{
                    "name": "ListProcesses",
                    "defaultArgs": {"@type": "example.com/ListProcessesArgs"},
                }]
            }))),
            (Method::Post, "/clients/C.1/flows") => Ok(json_response(json!({
                "flowId": "F.1", "name": "ListProcesses",
            }))),
            other => panic!("unexpected request: {other:?}"),
        }
    });
    let service = service(transport.clone());

    let first = service
        .start_flow("C.1", "ListProcesses", json!({"fetchBinaries": true}))
        .await
        .unwrap();
    assert_eq!(first.flow_id.as_deref(), Some("F.1"));
    service
        .start_flow("C.1", "ListProcesses", json!({}))
        .await
        .unwrap();

    assert_eq!(transport.count_requests("/flows/descriptors"), 1);
    assert_eq!(transport.count_requests("/clients/C.1/flows"), 2);

    // Flow arguments are tagged with the descriptor's payload type.
    let start = &transport.requests()[1];
    let args = &start.body.as_ref().unwrap()["flow"]["args"];
    assert_eq!(args["@type"], "example.com/ListProcessesArgs");
    assert_eq!(args["fetchBinaries"], true);
}

#[tokio::test]
async fn starting_an_unknown_flow_fails_loudly() {
    let transport = MockTransport::new(|_request| Ok(json_response(json!({"items": []}))));
    let service = service(transport);

    let err = service
        .start_flow("C.1", "NoSuchFlow", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Contract(_)));
}

// ---------------------------------------------------------------------------
// Wire encoding
// ---------------------------------------------------------------------------

#[tokio::test]
async fn query_parameters_omit_absent_values() {
    let transport = MockTransport::new(|_request| Ok(json_response(json!({"items": []}))));
    let service = service(transport.clone());

    service
        .search_clients(&ApiSearchClientsArgs {
            query: "host".to_owned(),
            offset: None,
            count: Some(50),
        })
        .await
        .unwrap();

    let request = &transport.requests()[0];
    let pairs = request.params.to_pairs();
    assert_eq!(
        pairs,
        vec![
            ("query".to_owned(), "host".to_owned()),
            ("count".to_owned(), "50".to_owned()),
        ]
    );
}

#[tokio::test]
async fn big_integer_parameters_keep_full_precision() {
    let transport = MockTransport::new(|_request| Ok(json_response(json!({"items": []}))));
    let service = service(transport.clone());

    service
        .list_flows_for_client(&ApiListFlowsArgs {
            client_id: "C.1".to_owned(),
            min_started_at: Some(9007199254740993),
            ..Default::default()
        })
        .await
        .unwrap();

    let request = &transport.requests()[0];
    let value = request.params.get("min_started_at").unwrap().encode();
    assert_eq!(value, "9007199254740993");
}

#[tokio::test]
async fn vfs_paths_are_mounted_and_segment_encoded() {
    let transport = MockTransport::new(|_request| Ok(json_response(json!({"file": {}}))));
    let service = service(transport.clone());

    service
        .get_file_details("C.1", PathType::Os, "C:/Program Files/app", None)
        .await
        .unwrap();

    let request = &transport.requests()[0];
    assert_eq!(
        request.path,
        "/clients/C.1/vfs-details/fs/os/C%3A/Program%20Files/app"
    );
}

// ---------------------------------------------------------------------------
// Notification sink
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failures_reach_the_sink_and_the_caller() {
    let transport = MockTransport::new(|_request| {
        Err(fleetsync::FailedResponse {
            url: "https://server/api/v2/clients/C.1".to_owned(),
            status: Some(500),
            status_text: "Internal Server Error".to_owned(),
            content_type: Some("application/json".to_owned()),
            body: r#"{"message": "database unavailable"}"#.to_owned(),
        })
    });
    let sink = RecordingSink::new();
    let service = SyncService::new(transport, sink.clone());

    let result = service.fetch_client("C.1").await;
    assert!(result.is_err());
    assert_eq!(
        sink.messages(),
        vec!["database unavailable (from https://server/api/v2/clients/C.1)".to_owned()]
    );
}
