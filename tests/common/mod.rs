#![allow(dead_code)]

use std::sync::Arc;

use activity_backend::{
    Activity, ActivityStatus, AppState, InMemoryActivityRepository, NewActivity, ObjectId,
    TokenService, build_router, storage::ActivityRepository,
};
use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "functional-test-secret";

/// Router plus direct handles on the store and token issuer.
pub struct TestApp {
    pub router: axum::Router,
    pub repo: Arc<dyn ActivityRepository>,
    pub tokens: TokenService,
    pub user_id: String,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_repository(Arc::new(InMemoryActivityRepository::new()))
    }

    pub fn with_repository(repo: Arc<dyn ActivityRepository>) -> Self {
        let tokens = TokenService::new(SECRET, Duration::hours(1)).expect("token service");
        let user_id = ObjectId::new().to_hex();
        let token = tokens.issue(&user_id).expect("token should be issued");
        let router = build_router(AppState::new(repo.clone(), tokens.clone()));
        Self {
            router,
            repo,
            tokens,
            user_id,
            token,
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Stores an activity for the default user in the given status.
    pub async fn add_activity(&self, status: ActivityStatus) -> Activity {
        self.add_activity_for(&self.user_id.clone(), status).await
    }

    pub async fn add_activity_for(&self, owner: &str, status: ActivityStatus) -> Activity {
        let mut activity = Activity::new(
            owner,
            NewActivity {
                name: "Prepare slides".to_string(),
                description: "Slides for the Monday review".to_string(),
            },
        );
        activity.status = status;
        self.repo
            .insert(activity)
            .await
            .expect("fixture activity should insert")
    }

    pub async fn from_db(&self, id: &ObjectId) -> Option<Activity> {
        self.repo.find_by_id(id).await.expect("store lookup")
    }

    pub async fn send(&self, request: TestRequest) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request.build())
            .await
            .expect("response expected");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body should be readable");

        if body.is_empty() {
            return (status, Value::Null);
        }

        let json = serde_json::from_slice::<Value>(&body).expect("body should be valid JSON");
        (status, json)
    }
}

pub fn archive_path(id: impl std::fmt::Display) -> String {
    format!("/activity/{id}/archive")
}

pub struct TestRequest {
    method: Method,
    uri: String,
    headers: Vec<(&'static str, String)>,
    body: Body,
}

impl TestRequest {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: Vec::new(),
            body: Body::empty(),
        }
    }

    pub fn patch(uri: impl Into<String>) -> Self {
        Self::new(Method::PATCH, uri)
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn json_content(self) -> Self {
        self.header("content-type", "application/json")
    }

    pub fn auth(self, bearer: impl Into<String>) -> Self {
        self.header("authorization", bearer)
    }

    pub fn body(mut self, payload: Value) -> Self {
        self.body = Body::from(payload.to_string());
        self
    }

    fn build(self) -> Request<Body> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }
        builder.body(self.body).expect("request should build")
    }
}
