use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::info;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use crate::config::Config;
use crate::errors::ApiError;
use crate::handlers::{self, ALL_CITIES_PATH, HEALTH_PATH};
use crate::manager_forecast::ForecastSource;
use crate::models::{HealthStatus, ServiceInfo, WeatherListing};

/// State shared by all requests, immutable once the router is built
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ForecastSource>,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    /// Returns a new state
    ///
    /// # Arguments
    ///
    /// * 'config' - configuration holding the upstream API key
    /// * 'source' - where forecasts are fetched from
    pub fn new(config: &Config, source: Arc<dyn ForecastSource>) -> AppState {
        AppState {
            source,
            api_key: config.cwa.api_key.as_deref().map(Arc::from),
        }
    }
}

/// Creates the router mapping each path to its handler
///
/// # Arguments
///
/// * 'state' - state shared by the handlers
/// * 'cors' - whether to allow cross origin requests
pub fn create_router(state: AppState, cors: bool) -> Router {
    let mut router = Router::new()
        .route("/", get(root))
        .route(HEALTH_PATH, get(health))
        .route(ALL_CITIES_PATH, get(all_cities))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(log_request));

    if cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

async fn root() -> Json<ServiceInfo> {
    Json(handlers::service_info())
}

async fn health() -> Json<HealthStatus> {
    Json(handlers::health())
}

async fn all_cities(State(state): State<AppState>) -> Result<Json<WeatherListing>, ApiError> {
    handlers::all_cities(state.api_key.as_deref(), state.source.as_ref())
        .await
        .map(Json)
}

async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Turns a panicking handler into a 500 response, the panic itself is logged by the panic hook
///
/// # Arguments
///
/// * 'err' - the panic payload
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown error".to_string()
    };

    ApiError::InternalError(message).into_response()
}

/// Logs method, path, status and elapsed time for every request
///
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    info!("{} {} {} {}ms", method, path, response.status().as_u16(), start.elapsed().as_millis());

    response
}
