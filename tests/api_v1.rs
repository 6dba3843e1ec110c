use quillpost::api;
use quillpost::server::Server;
use quillpost::settings::*;
use serde_json::{Value, json};
use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;

fn settings() -> Settings {
    Settings {
        auth: Auth {
            secret: Secret("integration-test-secret".to_string()),
            algorithm: "HS256".to_string(),
            issuer: "quillpost.auth".to_string(),
            audience: "quillpost-client".to_string(),
            access_ttl_minutes: 30,
            refresh_ttl_days: 7,
        },
        // cheap enough for tests
        password: Password {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        },
        storage: Storage {
            backend: "memory".to_string(),
            mysql_dsn: None,
            max_connections: 1,
        },
        revocation: Revocation {
            backend: "storage".to_string(),
            redis_dsn: None,
            key_prefix: "revoked".to_string(),
            purge_interval_secs: 3600,
        },
        http: Http {
            address: "127.0.0.1:0".to_string(),
            cert_path: None,
            key_path: None,
        },
        log: Log {
            filter: "info".to_string(),
        },
    }
}

struct TestApp {
    server: Arc<Server>,
}

impl TestApp {
    async fn new() -> Self {
        TestApp {
            server: Arc::new(Server::try_new(&settings()).await.unwrap()),
        }
    }

    async fn call(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let authorization = token.map(|token| format!("Bearer {token}"));
        self.call_with_authorization(method, path, authorization.as_deref(), body)
            .await
    }

    async fn call_with_authorization(
        &self,
        method: &str,
        path: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let filter = warp::path("api")
            .and(warp::path("v1"))
            .and(api::v1::routes(self.server.clone()))
            .recover(api::v1::recover_error);

        let mut request = warp::test::request().method(method).path(path);
        if let Some(authorization) = authorization {
            request = request.header("authorization", authorization);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.reply(&filter).await;
        let json = serde_json::from_slice(response.body()).unwrap_or(Value::Null);
        (response.status(), json)
    }

    /// Signs a fresh account up and returns (access, refresh).
    async fn signup(&self, email: &str) -> (String, String) {
        let (status, body) = self
            .call(
                "POST",
                "/api/v1/auth/signup",
                None,
                Some(json!({ "email": email, "password": "password123" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        tokens(&body)
    }
}

fn tokens(body: &Value) -> (String, String) {
    (
        body["data"]["access_token"].as_str().unwrap().to_string(),
        body["data"]["refresh_token"].as_str().unwrap().to_string(),
    )
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn health_check() {
    let app = TestApp::new().await;

    let (status, body) = app.call("GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
}

#[tokio::test]
async fn signup_and_signin() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/auth/signup",
            None,
            Some(json!({ "email": "Test@Example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["token_type"], "bearer");
    assert_ne!(body["data"]["access_token"], body["data"]["refresh_token"]);

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/auth/signup",
            None,
            Some(json!({ "email": "test@example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "EmailTaken");

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/auth/signup",
            None,
            Some(json!({ "email": "invalid-email", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "InvalidInput");

    let (status, _) = app
        .call(
            "POST",
            "/api/v1/auth/signup",
            None,
            Some(json!({ "email": "short@example.com", "password": "123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/auth/signin",
            None,
            Some(json!({ "email": "test@example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (access, _) = tokens(&body);
    let (status, body) = app.call("GET", "/api/v1/profile", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "test@example.com");

    for (email, password) in [
        ("test@example.com", "wrongpassword"),
        ("nobody@example.com", "password123"),
    ] {
        let (status, body) = app
            .call(
                "POST",
                "/api/v1/auth/signin",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "InvalidCredentials");
    }
}

#[tokio::test]
async fn malformed_body_is_unprocessable() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/auth/signup",
            None,
            Some(json!({ "email": "test@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn protected_routes_require_an_access_token() {
    let app = TestApp::new().await;
    let (_, refresh) = app.signup("test@example.com").await;

    let (status, body) = app.call("GET", "/api/v1/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "MissingToken");

    let (status, body) = app
        .call("GET", "/api/v1/profile", Some("invalid_token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "InvalidToken");

    let (status, body) = app.call("GET", "/api/v1/profile", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "WrongTokenType");
}

#[tokio::test]
async fn bearer_scheme_matches_in_any_case() {
    let app = TestApp::new().await;
    let (access, refresh) = app.signup("test@example.com").await;

    let (status, body) = app
        .call_with_authorization(
            "GET",
            "/api/v1/profile",
            Some(&format!("bearer {access}")),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "test@example.com");

    let (status, _) = app
        .call_with_authorization(
            "POST",
            "/api/v1/auth/refresh",
            Some(&format!("BEARER {refresh}")),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call_with_authorization(
            "GET",
            "/api/v1/profile",
            Some(&format!("Basic {access}")),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "MissingToken");
}

#[tokio::test]
async fn refresh_rotates_and_spends_the_token() {
    let app = TestApp::new().await;
    let (access, refresh) = app.signup("test@example.com").await;

    let (status, body) = app
        .call("POST", "/api/v1/auth/refresh", Some(&refresh), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (new_access, new_refresh) = tokens(&body);
    assert_ne!(new_refresh, refresh);

    let (status, body) = app
        .call("POST", "/api/v1/auth/refresh", Some(&refresh), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "TokenRevoked");

    let (status, body) = app
        .call("POST", "/api/v1/auth/refresh", Some(&new_access), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "WrongTokenType");

    let (status, _) = app.call("POST", "/api/v1/auth/refresh", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // rotation leaves earlier access tokens alone
    let (status, _) = app.call("GET", "/api/v1/profile", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .call("POST", "/api/v1/auth/refresh", Some(&new_refresh), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn logout_revokes_only_the_access_token() {
    let app = TestApp::new().await;
    let (access, refresh) = app.signup("test@example.com").await;

    let (status, body) = app
        .call("POST", "/api/v1/auth/logout", Some(&access), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Successfully logged out");

    let (status, body) = app.call("GET", "/api/v1/profile", Some(&access), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "TokenRevoked");

    let (status, _) = app
        .call("POST", "/api/v1/auth/logout", Some(&access), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call("POST", "/api/v1/auth/refresh", Some(&refresh), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn profile_update() {
    let app = TestApp::new().await;
    let (access, _) = app.signup("test@example.com").await;

    let (status, body) = app
        .call(
            "PUT",
            "/api/v1/profile",
            Some(&access),
            Some(json!({ "first_name": "Updated", "last_name": "Name", "country": "USA" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["first_name"], "Updated");
    assert_eq!(body["data"]["country"], "USA");
    assert_eq!(body["data"]["mobile"], Value::Null);

    let (status, _) = app
        .call(
            "PUT",
            "/api/v1/profile",
            Some(&access),
            Some(json!({ "mobile": "12345678901" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = app.call("GET", "/api/v1/profile", Some(&access), None).await;
    assert_eq!(body["data"]["first_name"], "Updated");
    assert_eq!(body["data"]["last_name"], "Name");
    assert_eq!(body["data"]["is_active"], true);

    let (status, body) = app
        .call(
            "PUT",
            "/api/v1/profile",
            Some(&access),
            Some(json!({ "country": null })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["country"], Value::Null);
    assert_eq!(body["data"]["first_name"], "Updated");
}

#[tokio::test]
async fn blog_lifecycle() {
    let app = TestApp::new().await;
    let (author, _) = app.signup("author@example.com").await;
    let (other, _) = app.signup("other@example.com").await;

    let (status, _) = app
        .call(
            "POST",
            "/api/v1/blogs",
            None,
            Some(json!({ "title": "T", "content": "C", "category": "Technology" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/blogs",
            Some(&author),
            Some(json!({
                "title": "Test Blog Post",
                "content": "This is a test blog post content.",
                "category": "Technology"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .call(
            "POST",
            "/api/v1/blogs",
            Some(&author),
            Some(json!({ "title": "Missing fields" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app.call("GET", &format!("/api/v1/blogs/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Test Blog Post");

    let (status, body) = app.call("GET", "/api/v1/blogs?limit=5", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app.call("GET", "/api/v1/blogs?limit=0", None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app
        .call("GET", "/api/v1/blogs/search?q=test%20blog", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .call("GET", "/api/v1/blogs/category/Technology", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .call(
            "PUT",
            &format!("/api/v1/blogs/{id}"),
            Some(&other),
            Some(json!({ "title": "Hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "Forbidden");

    let (status, body) = app
        .call(
            "PUT",
            &format!("/api/v1/blogs/{id}"),
            Some(&author),
            Some(json!({ "title": "Updated Title" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Updated Title");
    assert_eq!(body["data"]["category"], "Technology");

    let (status, _) = app
        .call("DELETE", &format!("/api/v1/blogs/{id}"), Some(&other), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call("DELETE", &format!("/api/v1/blogs/{id}"), Some(&author), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.call("GET", &format!("/api/v1/blogs/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NotFound");
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app.call("GET", "/api/v1/nothing-here", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.call("GET", "/api/v1/blogs/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
