//! HTTP endpoint tests driving the catalog router in-process

mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use catalog_core::{
    CatalogAppState, CatalogExceptionFactory, Dispatcher, Environment, ExceptionTranslator,
    Product, catalog_validators, config::HttpConfig, create_catalog_router,
};
use common::{RecordingStore, dispatcher_with, product};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

fn app(store: Arc<RecordingStore>, environment: Environment) -> Router {
    router_for(dispatcher_with(store, catalog_validators()), environment)
}

fn router_for(dispatcher: Arc<Dispatcher>, environment: Environment) -> Router {
    router_with(dispatcher, environment, &HttpConfig::default())
}

fn router_with(dispatcher: Arc<Dispatcher>, environment: Environment, http: &HttpConfig) -> Router {
    let state = CatalogAppState::new(
        dispatcher,
        Arc::new(CatalogExceptionFactory),
        ExceptionTranslator::new(environment),
        CancellationToken::new(),
    );
    create_catalog_router(state, http)
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Response) {
    let response = app.oneshot(request).await.unwrap();
    (response.status(), response)
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, response) = call(
        app(Arc::default(), Environment::Production),
        request(Method::GET, "/api/v1/health", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"status": "healthy", "message": "API is running"})
    );
}

#[tokio::test]
async fn test_create_returns_location_and_persists() {
    let store = Arc::new(RecordingStore::default());
    let (status, response) = call(
        app(store.clone(), Environment::Production),
        request(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "Desk",
                "category": ["Furniture"],
                "description": "Standing desk",
                "image_file": "desk.png",
                "price": 350.0
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let json = json_body(response).await;
    let id = json["id"].as_str().unwrap();
    assert_eq!(location, format!("/api/v1/products/{id}"));

    let stored = store.get(&id.parse().unwrap()).unwrap();
    assert_eq!(stored.name, "Desk");
}

#[tokio::test]
async fn test_get_by_id_and_category() {
    let lamp = product("Lamp", "Lighting", 10.0);
    let chair = product("Chair", "Furniture", 80.0);
    let store = Arc::new(RecordingStore::with_products(vec![lamp.clone(), chair]));

    let (status, response) = call(
        app(store.clone(), Environment::Production),
        request(Method::GET, &format!("/api/v1/products/{}", lamp.id), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json = json_body(response).await;
    let fetched: Product = serde_json::from_value(json["product"].clone()).unwrap();
    assert_eq!(fetched, lamp);

    let (status, response) = call(
        app(store.clone(), Environment::Production),
        request(Method::GET, "/api/v1/products/category/light", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["products"].as_array().unwrap().len(), 1);
    assert_eq!(json["products"][0]["name"], "Lamp");

    let (_, response) = call(
        app(store, Environment::Production),
        request(Method::GET, "/api/v1/products", None),
    )
    .await;
    assert_eq!(json_body(response).await["products"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_non_uuid_id_is_not_found_by_identifier() {
    let (status, response) = call(
        app(Arc::default(), Environment::Production),
        request(Method::GET, "/api/v1/products/not-a-uuid", None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["title"], "Product Not Found");
    assert_eq!(
        json["detail"],
        "Product with identifier 'not-a-uuid' was not found."
    );
    assert_eq!(json["type"], "ProductNotFound");
    assert!(json["errors"].is_null());
}

#[tokio::test]
async fn test_update_validation_failure_envelope() {
    let lamp = product("Lamp", "Lighting", 10.0);
    let store = Arc::new(RecordingStore::with_products(vec![lamp.clone()]));

    let mut body = serde_json::to_value(&lamp).unwrap();
    body["name"] = json!("");

    let (status, response) = call(
        app(store.clone(), Environment::Production),
        request(Method::PUT, "/api/v1/products", Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({
            "status": 400,
            "title": "Validation Error",
            "detail": "One or more validation errors occurred.",
            "type": "ValidationError",
            "errors": {"Product.Name": ["Product Name is required."]}
        })
    );
    assert!(store.committed().is_empty());
}

#[tokio::test]
async fn test_update_of_missing_product_is_not_found() {
    let missing = product("Ghost", "Nowhere", 1.0);

    let (status, response) = call(
        app(Arc::default(), Environment::Production),
        request(
            Method::PUT,
            "/api/v1/products",
            Some(serde_json::to_value(&missing).unwrap()),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(
        json["detail"],
        format!("Product with ID '{}' was not found.", missing.id)
    );
    assert!(json["errors"].is_null());
}

#[tokio::test]
async fn test_update_and_delete_succeed() {
    let chair = product("Chair", "Furniture", 80.0);
    let store = Arc::new(RecordingStore::with_products(vec![chair.clone()]));

    let mut body = serde_json::to_value(&chair).unwrap();
    body["price"] = json!(95.0);
    let (status, response) = call(
        app(store.clone(), Environment::Production),
        request(Method::PUT, "/api/v1/products", Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"is_success": true}));
    assert_eq!(store.get(&chair.id).unwrap().price, 95.0);

    let (status, response) = call(
        app(store.clone(), Environment::Production),
        request(Method::DELETE, &format!("/api/v1/products/{}", chair.id), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"is_success": true}));
    assert_eq!(store.deletes(), 1);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let (status, response) = call(app(Arc::default(), Environment::Production), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["title"], "Bad Request");
    assert_eq!(json["type"], "BadRequest");
    assert!(json["errors"].is_null());
}

#[tokio::test]
async fn test_unclassified_failure_detail_follows_environment() {
    let unwired = || Arc::new(Dispatcher::builder().build().unwrap());

    let (status, response) = call(
        router_for(unwired(), Environment::Production),
        request(Method::GET, "/api/v1/products", None),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["title"], "Internal Server Error");
    assert_eq!(
        json["detail"],
        "An error occurred while processing your request."
    );
    assert!(json["errors"].is_null());

    let (status, response) = call(
        router_for(unwired(), Environment::Development),
        request(Method::GET, "/api/v1/products", None),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
    assert!(detail.starts_with("No handler registered for request type"));
    assert!(detail.contains("GetProductsQuery"));
}

#[tokio::test]
async fn test_undecodable_path_parameter_uses_envelope() {
    let (status, response) = call(
        app(Arc::default(), Environment::Production),
        request(Method::GET, "/api/v1/products/%FF", None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["status"], 400);
    assert_eq!(json["title"], "Bad Request");
    assert_eq!(json["type"], "BadRequest");
    assert!(json["errors"].is_null());
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let store = Arc::new(RecordingStore::default());
    let http = HttpConfig {
        max_body_bytes: 64,
        ..HttpConfig::default()
    };
    let router = router_with(
        dispatcher_with(store.clone(), catalog_validators()),
        Environment::Production,
        &http,
    );

    let (status, response) = call(
        router,
        request(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "Desk",
                "category": ["Furniture"],
                "description": "x".repeat(256),
                "image_file": "desk.png",
                "price": 350.0
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let json = json_body(response).await;
    assert_eq!(json["status"], 413);
    assert_eq!(json["title"], "Payload Too Large");
    assert_eq!(json["type"], "PayloadTooLarge");
    assert!(json["errors"].is_null());
    assert!(store.committed().is_empty());
}
