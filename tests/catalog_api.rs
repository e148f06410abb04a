use std::collections::HashMap;

use catalog_backend::{config::AppConfig, database, routes, state::AppState};
use reqwest::StatusCode;
use serde_json::Value;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Same router as prod over a seeded in-memory SQLite catalog, bound to
    /// an ephemeral port.
    async fn spawn(extra: &[(&str, &str)]) -> Self {
        let mut vars: HashMap<String, String> = HashMap::new();
        vars.insert("DATABASE_URL".into(), "sqlite::memory:".into());
        for (k, v) in extra {
            vars.insert(k.to_string(), v.to_string());
        }
        let config = AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test config");
        let store = database::connect_store(&config.database)
            .await
            .expect("failed to open test store");
        let app = routes::build_app(AppState::new(store, &config));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, client: reqwest::Client::new(), handle }
    }

    async fn get(&self, path: &str, content_type: Option<&str>) -> reqwest::Response {
        let mut req = self.client.get(format!("{}{}", self.base_url, path));
        if let Some(ct) = content_type {
            req = req.header("Content-Type", ct);
        }
        req.send().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["idProduct"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn first_page_of_five() {
    let server = TestServer::spawn(&[]).await;
    let res = server.get("/products?page=1&limit=5", Some("application/json")).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(ids(&body), vec![1, 2, 3, 4, 5]);
    assert_eq!(body["data"][0]["description"], "Product 1");
    assert_eq!(body["data"][0]["price"].as_f64(), Some(10.0));
    assert!(body["data"][0].get("width").is_none());

    let pagination = &body["pagination"];
    assert_eq!(pagination["page"], 1);
    assert_eq!(pagination["limit"], 5);
    assert_eq!(pagination["total"], 100);
    assert_eq!(pagination["totalPages"], 20);
    assert_eq!(pagination["hasNextPage"], true);
    assert_eq!(pagination["hasPreviousPage"], false);
}

#[tokio::test]
async fn middle_and_last_pages() {
    let server = TestServer::spawn(&[]).await;

    let body: Value = server.get("/products?page=2&limit=10", None).await.json().await.unwrap();
    assert_eq!(ids(&body), (11..=20).collect::<Vec<_>>());
    assert_eq!(body["pagination"]["hasNextPage"], true);
    assert_eq!(body["pagination"]["hasPreviousPage"], true);

    let body: Value = server.get("/products?page=10&limit=10", None).await.json().await.unwrap();
    assert_eq!(ids(&body), (91..=100).collect::<Vec<_>>());
    assert_eq!(body["pagination"]["totalPages"], 10);
    assert_eq!(body["pagination"]["hasNextPage"], false);
    assert_eq!(body["pagination"]["hasPreviousPage"], true);
}

#[tokio::test]
async fn page_past_the_end_is_empty_not_an_error() {
    let server = TestServer::spawn(&[]).await;
    let res = server.get("/products?page=30&limit=10", None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert!(ids(&body).is_empty());
    assert_eq!(body["pagination"]["totalPages"], 10);
    assert_eq!(body["pagination"]["hasNextPage"], false);
    assert_eq!(body["pagination"]["hasPreviousPage"], true);
}

#[tokio::test]
async fn defaults_cover_the_whole_catalog() {
    let server = TestServer::spawn(&[]).await;
    let body: Value = server.get("/products", None).await.json().await.unwrap();
    assert_eq!(ids(&body).len(), 100);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 1000);
    assert_eq!(body["pagination"]["totalPages"], 1);
}

#[tokio::test]
async fn invalid_paging_is_bad_request() {
    let server = TestServer::spawn(&[]).await;
    let cases = [
        ("/products?page=0&limit=10", "Page must be greater than 0"),
        ("/products?page=abc", "Page must be greater than 0"),
        ("/products?page=1&limit=0", "Limit must be between 1 and 10000"),
        ("/products?page=1&limit=10001", "Limit must be between 1 and 10000"),
        ("/products?page=1&limit=20000", "Limit must be between 1 and 10000"),
    ];
    for (path, message) in cases {
        let res = server.get(path, Some("application/json")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], message, "{path}");
    }
}

#[tokio::test]
async fn csv_page_has_header_and_rows() {
    let server = TestServer::spawn(&[]).await;
    let res = server.get("/products?page=1&limit=3", Some("text/csv")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.contains("text/csv"));

    let text = res.text().await.unwrap();
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "\"idProduct\";\"description\";\"price\"");
    assert_eq!(lines[1], "\"1\";\"Product 1\";\"10\"");
    assert_eq!(lines[3], "\"3\";\"Product 3\";\"30\"");
}

#[tokio::test]
async fn bare_csv_layout() {
    let server = TestServer::spawn(&[("CSV_HEADER", "false"), ("CSV_QUOTING", "necessary")]).await;
    let text = server.get("/products/all", Some("text/csv")).await.text().await.unwrap();
    let first_line = text.split('\n').next().unwrap();
    assert!(first_line.starts_with("1;Product 1;10;11;6;9;2;"), "{first_line}");
    assert_eq!(text.split('\n').count(), 100);
}

#[tokio::test]
async fn unknown_format_is_unprocessable() {
    let server = TestServer::spawn(&[]).await;
    let res = server.get("/products", Some("application/xml")).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid type");
}

#[tokio::test]
async fn full_listing_is_a_bare_array() {
    let server = TestServer::spawn(&[]).await;
    let body: Value = server.get("/products/all", Some("application/json")).await.json().await.unwrap();
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 100);
    assert_eq!(products[0]["idProduct"], 1);
    assert_eq!(products[0]["price"].as_f64(), Some(10.0));
    assert_eq!(products[99]["idProduct"], 100);
    assert_eq!(products[99]["price"].as_f64(), Some(1000.0));
    assert!(products[0]["volume"].is_number());
}

#[tokio::test]
async fn single_product_has_derived_metrics() {
    let server = TestServer::spawn(&[]).await;
    let res = server.get("/products/1", None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["idProduct"], 1);
    assert_eq!(body["description"], "Product 1");
    assert_eq!(body["price"].as_f64(), Some(10.0));
    assert_eq!(body["width"], 11);
    assert_eq!(body["height"], 6);
    assert_eq!(body["length"], 9);
    assert_eq!(body["weight"].as_f64(), Some(2.0));

    let volume = body["volume"].as_f64().unwrap();
    let density = body["density"].as_f64().unwrap();
    assert!((volume - 0.000594).abs() < 1e-10);
    assert!((density - 2.0 / 0.000594).abs() < 1e-2);
}

#[tokio::test]
async fn missing_product_is_not_found() {
    let server = TestServer::spawn(&[]).await;
    let res = server.get("/products/999", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Product not found");

    for path in ["/products/abc", "/products/99999999999999999999"] {
        let res = server.get(path, None).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{path}");
        let content_type = res.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.contains("application/json"), "{path}: {content_type}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "Product id must be an integer", "{path}");
    }
}

#[tokio::test]
async fn oversized_page_is_an_empty_page() {
    let server = TestServer::spawn(&[]).await;
    for path in ["/products?page=4294967296&limit=10", "/products?page=99999999999999999999&limit=10"] {
        let res = server.get(path, None).await;
        assert_eq!(res.status(), StatusCode::OK, "{path}");
        let body: Value = res.json().await.unwrap();
        assert!(ids(&body).is_empty(), "{path}");
        assert_eq!(body["pagination"]["total"], 100);
        assert_eq!(body["pagination"]["totalPages"], 10);
        assert_eq!(body["pagination"]["hasNextPage"], false);
        assert_eq!(body["pagination"]["hasPreviousPage"], true);
    }

    let res = server.get("/products?page=1&limit=99999999999999999999", None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Limit must be between 1 and 10000");
}

#[tokio::test]
async fn client_paging_matches_server_paging() {
    let server = TestServer::spawn(&[]).await;
    let client = TestServer::spawn(&[("PAGING_STRATEGY", "client")]).await;
    for path in ["/products?page=1&limit=5", "/products?page=7&limit=15", "/products?page=12&limit=10"] {
        let a: Value = server.get(path, None).await.json().await.unwrap();
        let b: Value = client.get(path, None).await.json().await.unwrap();
        assert_eq!(a, b, "{path}");
    }
}

#[tokio::test]
async fn health_and_banner() {
    let server = TestServer::spawn(&[]).await;
    assert_eq!(server.get("/health", None).await.text().await.unwrap(), "OK");
    assert_eq!(server.get("/", None).await.status(), StatusCode::OK);
}
