//! Router tests for the auth crate against an in-memory user store.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use kernel::id::UserId;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::config::AuthConfig;
use crate::application::session_token::SessionTokens;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};
use crate::presentation::router::auth_router_generic;

#[derive(Clone, Default)]
struct MemUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl UserRepository for MemUserRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        let created = User {
            id: UserId::new(users.len() as i32 + 1),
            name: user.name.as_str().to_string(),
            email: user.email.clone(),
            password: user.password.clone(),
            role: user.role.clone(),
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}

fn test_config() -> AuthConfig {
    AuthConfig::new(vec![7u8; 32])
}

fn test_app() -> Router {
    auth_router_generic(MemUserRepository::default(), test_config())
}

async fn request_json(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        req = req.header("authorization", format!("Bearer {token}"));
    }

    let body = body.map_or_else(Body::empty, |body| {
        Body::from(serde_json::to_string(&body).unwrap())
    });

    let response = app.oneshot(req.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

fn registration() -> Value {
    json!({
        "name": "Siti Rahma",
        "email": "Siti@Example.com",
        "password": "Herd!Check2024",
        "role": "farmer"
    })
}

#[tokio::test]
async fn test_register_login_and_profile() {
    let app = test_app();

    let (status, body) = request_json(app.clone(), "POST", "/register", None, Some(registration())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["email"], "siti@example.com");
    assert_eq!(body["user"]["role"], "farmer");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["token"].as_str().is_some());
    let user_id = body["user"]["id"].as_i64().unwrap();

    let (status, body) = request_json(
        app.clone(),
        "POST",
        "/login",
        None,
        Some(json!({"email": "siti@example.com", "password": "Herd!Check2024"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = request_json(
        app.clone(),
        "GET",
        &format!("/profile/{user_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Siti Rahma");
}

#[tokio::test]
async fn test_register_requires_all_fields() {
    let (status, body) = request_json(
        test_app(),
        "POST",
        "/register",
        None,
        Some(json!({"email": "a@example.com", "password": "Herd!Check2024"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = test_app();
    let (status, _) = request_json(app.clone(), "POST", "/register", None, Some(registration())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request_json(app, "POST", "/register", None, Some(registration())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn test_login_failures() {
    let app = test_app();
    request_json(app.clone(), "POST", "/register", None, Some(registration())).await;

    let (status, body) = request_json(
        app.clone(),
        "POST",
        "/login",
        None,
        Some(json!({"email": "siti@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email and password are required");

    let (status, body) = request_json(
        app.clone(),
        "POST",
        "/login",
        None,
        Some(json!({"email": "siti@example.com", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, _) = request_json(
        app,
        "POST",
        "/login",
        None,
        Some(json!({"email": "nobody@example.com", "password": "Herd!Check2024"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_body_gets_json_error() {
    let (status, body) = request_json(
        test_app(),
        "POST",
        "/login",
        None,
        Some(json!({"email": "siti@example.com", "password": 12345678})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("password"));
    assert_eq!(body["title"], "Bad Request");
}

#[tokio::test]
async fn test_profile_requires_token() {
    let (status, body) = request_json(test_app(), "GET", "/profile/1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token provided");

    let (status, body) =
        request_json(test_app(), "GET", "/profile/1", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid JWT");
}

#[tokio::test]
async fn test_profile_of_another_user_is_forbidden() {
    let app = test_app();
    let (_, body) = request_json(app.clone(), "POST", "/register", None, Some(registration())).await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, _) = request_json(app, "GET", "/profile/99", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_profile_of_deleted_user_is_not_found() {
    let tokens = SessionTokens::new(&test_config());
    let issued = tokens.issue(UserId::new(5), "ghost@example.com").unwrap();

    let (status, _) = request_json(test_app(), "GET", "/profile/5", Some(&issued.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
