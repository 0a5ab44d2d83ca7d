//! Axum HTTP adapter for the product catalog

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Path as AxumPath, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{
        HeaderValue, Method, StatusCode,
        header::{CONTENT_TYPE, LOCATION},
    },
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::{
    middleware::{PanicResponder, exception_translation},
    problem::ExceptionTranslator,
};
use crate::{
    application::{
        commands::*,
        dispatcher::Dispatcher,
        exceptions::{ExceptionFactory, ProductKey},
        queries::*,
        request::Request,
    },
    config::HttpConfig,
    error::{CatalogError, CatalogResult},
};
use catalog_domain::{Product, ProductId};

/// Route prefix shared by every endpoint
pub const API_PREFIX: &str = "/api/v1";

/// Shared state handed to every route
#[derive(Clone)]
pub struct CatalogAppState {
    dispatcher: Arc<Dispatcher>,
    exceptions: Arc<dyn ExceptionFactory>,
    translator: ExceptionTranslator,
    shutdown: CancellationToken,
}

impl CatalogAppState {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        exceptions: Arc<dyn ExceptionFactory>,
        translator: ExceptionTranslator,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            dispatcher,
            exceptions,
            translator,
            shutdown,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Dispatch with a token cancelled when the server shuts down
    async fn send<R: Request>(&self, request: R) -> CatalogResult<R::Response> {
        let cancel = self.shutdown.child_token();
        self.dispatcher.send(request, &cancel).await
    }
}

impl std::fmt::Debug for CatalogAppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogAppState")
            .field("dispatcher", &self.dispatcher)
            .field("translator", &self.translator)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProductResponse {
    pub id: ProductId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductResponse {
    pub is_success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteProductResponse {
    pub is_success: bool,
}

/// Create the catalog router with every route, the exception translation
/// middleware and the tower layers
pub fn create_catalog_router(state: CatalogAppState, http: &HttpConfig) -> Router {
    let translator = state.translator;

    let api = Router::new()
        .route("/health", get(health))
        .route(
            "/products",
            get(get_products).post(create_product).put(update_product),
        )
        .route("/products/{id}", get(get_product_by_id).delete(delete_product))
        .route("/products/category/{category}", get(get_products_by_category));

    Router::new()
        .nest(API_PREFIX, api)
        .with_state(state)
        .layer(CatchPanicLayer::custom(PanicResponder::new(translator)))
        .layer(middleware::from_fn_with_state(translator, exception_translation))
        .layer(DefaultBodyLimit::max(http.max_body_bytes))
        .layer(cors_layer(&http.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Path ids that are not UUIDs cannot name a product
fn parse_product_id(state: &CatalogAppState, raw: &str) -> CatalogResult<ProductId> {
    raw.parse::<ProductId>()
        .map_err(|_| state.exceptions.product_not_found(&ProductKey::Identifier(raw.to_string())))
}

/// Extractor rejections keep their status where the taxonomy has one
fn rejection_error(status: StatusCode, detail: String) -> CatalogError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        CatalogError::payload_too_large(detail)
    } else {
        CatalogError::bad_request(detail)
    }
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> CatalogResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| rejection_error(rejection.status(), rejection.body_text()))
}

fn path_param(path: Result<AxumPath<String>, PathRejection>) -> CatalogResult<String> {
    path.map(|AxumPath(value)| value)
        .map_err(|rejection| rejection_error(rejection.status(), rejection.body_text()))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "API is running".to_string(),
    })
}

async fn get_products(
    State(state): State<CatalogAppState>,
) -> Result<Json<GetProductsResult>, CatalogError> {
    Ok(Json(state.send(GetProductsQuery).await?))
}

async fn get_product_by_id(
    State(state): State<CatalogAppState>,
    id: Result<AxumPath<String>, PathRejection>,
) -> Result<Json<GetProductByIdResult>, CatalogError> {
    let id = parse_product_id(&state, &path_param(id)?)?;
    Ok(Json(state.send(GetProductByIdQuery { id }).await?))
}

async fn get_products_by_category(
    State(state): State<CatalogAppState>,
    category: Result<AxumPath<String>, PathRejection>,
) -> Result<Json<GetProductsByCategoryResult>, CatalogError> {
    let category = path_param(category)?;
    Ok(Json(state.send(GetProductsByCategoryQuery { category }).await?))
}

async fn create_product(
    State(state): State<CatalogAppState>,
    body: Result<Json<CreateProductCommand>, JsonRejection>,
) -> Result<impl IntoResponse, CatalogError> {
    let command = json_body(body)?;
    let CreateProductResult { id } = state.send(command).await?;

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format!("{API_PREFIX}/products/{id}"))],
        Json(CreateProductResponse { id }),
    ))
}

async fn update_product(
    State(state): State<CatalogAppState>,
    body: Result<Json<Product>, JsonRejection>,
) -> Result<Json<UpdateProductResponse>, CatalogError> {
    let product = json_body(body)?;
    let is_success = state
        .send(UpdateProductOrchestratorCommand { product })
        .await?;
    Ok(Json(UpdateProductResponse { is_success }))
}

async fn delete_product(
    State(state): State<CatalogAppState>,
    id: Result<AxumPath<String>, PathRejection>,
) -> Result<Json<DeleteProductResponse>, CatalogError> {
    let id = parse_product_id(&state, &path_param(id)?)?;
    let is_success = state.send(DeleteProductOrchestratorCommand { id }).await?;
    Ok(Json(DeleteProductResponse { is_success }))
}
