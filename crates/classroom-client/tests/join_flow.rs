//! Join flow integration tests.
//!
//! Covers the path from the join window through the join endpoint to a
//! running session, with the endpoint served by wiremock.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;

use classroom_client::actors::{ClassroomSessionActor, SessionContext, SessionSettings};
use classroom_client::bootstrap::{JoinClient, JoinOutcome};
use classroom_client::config::Config;
use classroom_client::errors::ClassroomError;
use classroom_client::join_window::{JoinPhase, SessionWindow};
use classroom_test_utils::{grant_json, too_early_json, ManualClock, MockTransport, TestLesson};
use common::secret::ExposeSecret;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> JoinClient {
    let vars = HashMap::from([
        ("CLASSROOM_API_BASE_URL".to_string(), server.uri()),
        ("CLASSROOM_API_TOKEN".to_string(), "learner-api-token".to_string()),
    ]);
    JoinClient::new(&Config::from_vars(&vars).unwrap()).unwrap()
}

fn join_path(lesson: &TestLesson) -> String {
    format!("/live/lessons/{}/join/", lesson.id)
}

#[tokio::test]
async fn test_too_early_locally_then_joinable_grant_starts_session() {
    let lesson = TestLesson::random();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(join_path(&lesson)))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant_json(&lesson, false)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let utc = chrono::FixedOffset::east_opt(0).unwrap();
    let window = SessionWindow::from_schedule("2026-10-19", "10:00", "11:00", utc).unwrap();
    assert_eq!(window.start(), lesson.start);

    // 09:49: nothing is requested, the learner sees when the class opens
    let outcome = client
        .join_within_window(lesson.id, &window, lesson.at(-11))
        .await
        .unwrap();
    let JoinOutcome::Wait(wait) = outcome else {
        panic!("expected to wait");
    };
    assert_eq!(wait.open_at, Some(lesson.at(-10)));
    assert!(wait.message.contains("09:50"));

    // 09:51: joinable, grant received
    assert_eq!(
        client.policy().classify(lesson.at(-9), window.start(), window.end()),
        JoinPhase::Joinable
    );
    let outcome = client
        .join_within_window(lesson.id, &window, lesson.at(-9))
        .await
        .unwrap();
    let JoinOutcome::Granted(grant) = outcome else {
        panic!("expected a grant");
    };
    assert_eq!(grant.host_identity, lesson.host);
    assert_eq!(grant.effective_end, lesson.end);
    assert!(grant.token.expose_secret().starts_with("rtc-token-"));

    let transport = MockTransport::new();
    let clock = ManualClock::at(lesson.at(-9));
    let (handle, _notifications, _task) = ClassroomSessionActor::spawn(
        SessionContext::from_grant(lesson.id, &grant, Some(window.start())),
        transport.clone_arc(),
        clock.clone_arc(),
        SessionSettings::default(),
        CancellationToken::new(),
    )
    .unwrap();

    let view = handle.view();
    assert_eq!(view.phase, JoinPhase::Joinable);
    assert!(view.waiting_for_host);
    assert!(!view.microphone_enabled && !view.camera_enabled);

    let resources = handle.resources();
    assert_eq!(resources.len(), 2);
    assert_eq!(resources.first().unwrap().title, "Slides");
}

#[tokio::test]
async fn test_server_too_early_is_a_wait_not_an_error() {
    let lesson = TestLesson::random();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(join_path(&lesson)))
        .respond_with(ResponseTemplate::new(403).set_body_json(too_early_json(&lesson)))
        .mount(&server)
        .await;

    let outcome = client_for(&server).join(lesson.id).await.unwrap();

    let JoinOutcome::Wait(wait) = outcome else {
        panic!("expected to wait");
    };
    assert_eq!(wait.open_at, Some(lesson.at(-10)));
    assert_eq!(
        wait.message,
        "You can join 10 minutes before the class starts"
    );
}

#[tokio::test]
async fn test_joining_after_the_end_never_reaches_the_server() {
    let lesson = TestLesson::random();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant_json(&lesson, false)))
        .expect(0)
        .mount(&server)
        .await;

    let window = SessionWindow::new(lesson.start, lesson.end).unwrap();
    let result = client_for(&server)
        .join_within_window(lesson.id, &window, lesson.at(76))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, ClassroomError::LessonEnded));
    assert_eq!(err.user_message(), "This class has already ended");
}

#[tokio::test]
async fn test_host_grant_skips_waiting_room() {
    let lesson = TestLesson::random();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(join_path(&lesson)))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant_json(&lesson, true)))
        .mount(&server)
        .await;

    let JoinOutcome::Granted(grant) = client_for(&server).join(lesson.id).await.unwrap() else {
        panic!("expected a grant");
    };
    assert!(grant.is_host);

    let context: SessionContext = SessionContext::from_grant(lesson.id, &grant, None);
    let (handle, _notifications, _task) = ClassroomSessionActor::spawn(
        context,
        MockTransport::new().clone_arc(),
        ManualClock::at(lesson.at(0)).clone_arc(),
        SessionSettings::default(),
        CancellationToken::new(),
    )
    .unwrap();

    let view = handle.view();
    assert!(!view.waiting_for_host);
    assert!(view.microphone_enabled && view.camera_enabled);
    assert_eq!(view.phase, JoinPhase::Live);
}

#[tokio::test]
async fn test_join_outcomes_are_counted() {
    let lesson = TestLesson::random();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(join_path(&lesson)))
        .respond_with(ResponseTemplate::new(403).set_body_json(too_early_json(&lesson)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/live/lessons/0/join/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let _guard = metrics::set_default_local_recorder(&recorder);

    let client = client_for(&server);
    client.join(lesson.id).await.unwrap();
    assert!(client.join(common::types::LessonId(0)).await.is_err());

    let counts: HashMap<String, u64> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter(|(key, _, _, _)| key.key().name() == "classroom_join_requests_total")
        .filter_map(|(key, _, _, value)| {
            let outcome = key
                .key()
                .labels()
                .find(|l| l.key() == "outcome")?
                .value()
                .to_string();
            match value {
                DebugValue::Counter(count) => Some((outcome, count)),
                _ => None,
            }
        })
        .collect();

    assert_eq!(counts.get("too_early"), Some(&1));
    assert_eq!(counts.get("error"), Some(&1));
    assert_eq!(counts.get("granted"), None);
}
