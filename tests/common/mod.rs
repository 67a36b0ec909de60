#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::path::PathBuf;
use tower::ServiceExt;

use storecrate::config::{AppConfig, DatabaseConfig};
use storecrate::{AppState, build_app, database};

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub upload_dir: PathBuf,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.body["errors"]
            .as_array()
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    config.upload.directory = std::env::temp_dir()
        .join(format!(
            "storecrate-test-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ))
        .to_string_lossy()
        .into_owned();
    config
}

pub async fn setup_app() -> TestApp {
    setup_app_with(test_config()).await
}

pub async fn setup_app_with(config: AppConfig) -> TestApp {
    let db = database::connect(&config.database)
        .await
        .expect("in-memory database");
    let state = AppState::from_config(db.clone(), &config).expect("bundled catalogs");
    TestApp {
        router: build_app(state, &config),
        db,
        upload_dir: PathBuf::from(&config.upload.directory),
    }
}

impl TestApp {
    /// Sends a request with `Accept-Language: en` unless `headers` sets one.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if !headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("accept-language"))
        {
            builder = builder.header(header::ACCEPT_LANGUAGE, "en");
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.raw(request).await
    }

    pub async fn raw(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, &[]).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body), &[]).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body), &[]).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, &[]).await
    }

    pub async fn create_category(&self, name: &str, description: &str) -> i64 {
        let response = self
            .post(
                "/category",
                json!({ "name": name, "description": description, "activeState": true }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.data()["id"].as_i64().unwrap()
    }

    pub async fn create_product(&self, category_id: i64, overrides: Value) -> i64 {
        let mut body = product_body();
        if let (Some(target), Some(extra)) = (body.as_object_mut(), overrides.as_object()) {
            for (key, value) in extra {
                target.insert(key.clone(), value.clone());
            }
        }
        let response = self.post(&format!("/products/{category_id}"), body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.data()["id"].as_i64().unwrap()
    }

    pub async fn create_customer(&self, first_name: &str, email: &str) -> i64 {
        let response = self
            .post(
                "/customer",
                json!({
                    "firstName": first_name,
                    "lastName": "Tester",
                    "email": email,
                    "phone": "+1-555-0100",
                    "description": "",
                    "activeState": true
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.data()["id"].as_i64().unwrap()
    }
}

/// A product body that passes every validation rule.
pub fn product_body() -> Value {
    json!({
        "name": "Lamp",
        "description": "Desk lamp",
        "price": 19.99,
        "stock": 4,
        "length": 30,
        "width": 15,
        "height": 45,
        "weight": 2,
        "color": "black",
        "material": "steel",
        "manufacturer": "Lumen",
        "warranty": "1 year",
        "activeState": true
    })
}
