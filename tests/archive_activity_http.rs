mod common;

use activity_backend::{ActivityStatus, ObjectId};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{TestApp, TestRequest, archive_path};

// ---------------------------------------------------------------------------
// PATCH /activity/{id}/archive failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn returns_400_when_activity_id_is_invalid() {
    let app = TestApp::new();

    let (status, body) = app
        .send(TestRequest::patch(archive_path("IdNonValido")).auth(app.bearer()))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "ValidationError: \"id\" with value \"IdNonValido\" fails to match the required pattern: /^[a-fA-F0-9]{24}$/"
    );
}

#[tokio::test]
async fn returns_400_for_every_malformed_id_shape() {
    let app = TestApp::new();

    for raw in [
        "123",
        "0000000000000000000000001",
        "65a1f0c2b3d4e5f60718293z",
        "65a1f0c2b3d4e5f6071829",
    ] {
        let (status, body) = app
            .send(
                TestRequest::patch(archive_path(raw))
                    .auth(app.bearer())
                    .json_content(),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{raw}");
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("ValidationError: \"id\""), "{message}");
        assert!(message.contains(raw));
        assert!(message.ends_with("/^[a-fA-F0-9]{24}$/"));
    }
}

#[tokio::test]
async fn returns_400_when_content_type_is_missing_or_wrong() {
    let app = TestApp::new();
    let activity = app.add_activity(ActivityStatus::Completed).await;

    let (status, body) = app
        .send(TestRequest::patch(archive_path(activity.id)).auth(app.bearer()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "ValidationError: \"content-type\" is required");

    let (status, body) = app
        .send(
            TestRequest::patch(archive_path(activity.id))
                .auth(app.bearer())
                .header("content-type", "text/plain"),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "ValidationError: \"content-type\" must be [application/json]"
    );

    let stored = app.from_db(&activity.id).await.unwrap();
    assert_eq!(stored.status, ActivityStatus::Completed);
}

#[tokio::test]
async fn returns_404_when_activity_does_not_exist() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            TestRequest::patch(archive_path(ObjectId::new()))
                .auth(app.bearer())
                .json_content(),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Activity not found");
    assert_eq!(body["code"], 200100);
}

#[tokio::test]
async fn returns_404_when_activity_belongs_to_another_user() {
    let app = TestApp::new();
    let foreign = app
        .add_activity_for(&ObjectId::new().to_hex(), ActivityStatus::Completed)
        .await;

    let (status, body) = app
        .send(
            TestRequest::patch(archive_path(foreign.id))
                .auth(app.bearer())
                .json_content(),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 200100);
    let stored = app.from_db(&foreign.id).await.unwrap();
    assert_eq!(stored.status, ActivityStatus::Completed);
}

#[tokio::test]
async fn returns_401_when_no_token_is_provided() {
    let app = TestApp::new();

    let (status, body) = app
        .send(TestRequest::patch(archive_path(ObjectId::new())).json_content())
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication error. Token required.");
}

#[tokio::test]
async fn returns_401_without_token_even_for_malformed_ids() {
    let app = TestApp::new();

    let (status, body) = app
        .send(TestRequest::patch(archive_path("IdNonValido")))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication error. Token required.");
}

#[tokio::test]
async fn returns_401_when_invalid_token_is_provided() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            TestRequest::patch(archive_path(ObjectId::new()))
                .auth("Bearer invalid Token")
                .json_content(),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "Authentication error. Invalid token.Invalid JWT"
    );
}

#[tokio::test]
async fn returns_401_for_expired_token() {
    let app = TestApp::new();
    let activity = app.add_activity(ActivityStatus::Completed).await;
    let issued = Utc::now() - Duration::hours(3);
    let expired = app
        .tokens
        .issue_with_expiry(&app.user_id, issued, issued + Duration::hours(1))
        .unwrap();

    let (status, body) = app
        .send(
            TestRequest::patch(archive_path(activity.id))
                .auth(format!("Bearer {expired}"))
                .json_content(),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "Authentication error. Invalid token.Invalid JWT"
    );
    let stored = app.from_db(&activity.id).await.unwrap();
    assert_eq!(stored.status, ActivityStatus::Completed);
}

#[tokio::test]
async fn returns_403_when_activity_is_not_completed() {
    let app = TestApp::new();
    let activity = app.add_activity(ActivityStatus::Open).await;

    let (status, body) = app
        .send(
            TestRequest::patch(archive_path(activity.id))
                .auth(app.bearer())
                .json_content(),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Can not archive a not completed activity");
    let stored = app.from_db(&activity.id).await.unwrap();
    assert_eq!(stored.status, ActivityStatus::Open);
}

#[tokio::test]
async fn returns_403_when_activity_is_deleted() {
    let app = TestApp::new();
    let activity = app.add_activity(ActivityStatus::Deleted).await;

    let (status, body) = app
        .send(
            TestRequest::patch(archive_path(activity.id))
                .auth(app.bearer())
                .json_content(),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Can not archive a deleted activity");
    let stored = app.from_db(&activity.id).await.unwrap();
    assert_eq!(stored.status, ActivityStatus::Deleted);
}

// ---------------------------------------------------------------------------
// PATCH /activity/{id}/archive success
// ---------------------------------------------------------------------------

#[tokio::test]
async fn returns_200_and_updates_status_to_archived() {
    let app = TestApp::new();
    let activity = app.add_activity(ActivityStatus::Completed).await;

    let (status, body) = app
        .send(
            TestRequest::patch(archive_path(activity.id))
                .auth(app.bearer())
                .json_content(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], activity.id.to_hex());
    assert_eq!(body["name"], activity.name.as_str());
    assert_eq!(body["description"], activity.description.as_str());
    assert_eq!(body["status"], "archived");

    let stored = app.from_db(&activity.id).await.expect("activity stays stored");
    assert_eq!(stored.status, ActivityStatus::Archived);
    assert_eq!(stored.name, activity.name);
    assert_eq!(stored.description, activity.description);
}

#[tokio::test]
async fn returns_200_if_activity_is_already_archived() {
    let app = TestApp::new();
    let activity = app.add_activity(ActivityStatus::Archived).await;

    for _ in 0..2 {
        let (status, body) = app
            .send(
                TestRequest::patch(archive_path(activity.id))
                    .auth(app.bearer())
                    .json_content(),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["_id"], activity.id.to_hex());
        assert_eq!(body["name"], activity.name.as_str());
        assert_eq!(body["description"], activity.description.as_str());
        assert_eq!(body["status"], "archived");
    }

    let stored = app.from_db(&activity.id).await.unwrap();
    assert_eq!(stored.status, ActivityStatus::Archived);
    assert_eq!(stored.updated_at, activity.updated_at);
}

#[tokio::test]
async fn accepts_uppercase_hex_ids_and_content_type() {
    let app = TestApp::new();
    let activity = app.add_activity(ActivityStatus::Completed).await;

    let (status, body) = app
        .send(
            TestRequest::patch(archive_path(activity.id.to_hex().to_uppercase()))
                .auth(app.bearer())
                .header("content-type", "APPLICATION/JSON"),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], activity.id.to_hex());
    assert_eq!(body["status"], "archived");
}
