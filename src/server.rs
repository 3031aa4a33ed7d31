//! actix-web front end: `/api/planning`, `/api/assets` and `/api/development`.

use crate::{
    error::GenerationError,
    models::GenerationResult,
    providers::GenerationClient,
};
use actix_cors::Cors;
use actix_web::{
    error::JsonPayloadError,
    http::{header, StatusCode},
    middleware::Logger,
    web, HttpRequest, HttpResponse, ResponseError,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

pub const WELCOME_MESSAGE: &str = "Welcome to the Game Demo API!";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    MissingPayload(&'static str),

    #[error("{0}")]
    MalformedBody(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingPayload(_) | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningRequest {
    pub task_description: Option<Value>,
    #[serde(default, deserialize_with = "present_value")]
    pub selected_model: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetsRequest {
    pub model_data: Option<Value>,
    #[serde(default, deserialize_with = "present_value")]
    pub selected_model: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevelopmentRequest {
    pub task_data: Option<Value>,
    #[serde(default, deserialize_with = "present_value")]
    pub selected_model: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct PlanningResponse {
    pub plan: GenerationResult,
}

#[derive(Debug, Serialize)]
pub struct AssetsResponse {
    pub assets: GenerationResult,
}

#[derive(Debug, Serialize)]
pub struct DevelopmentResponse {
    pub development: GenerationResult,
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only a missing field is `None`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Turns a payload field into prompt text.
///
/// Falsy values (`null`, `""`, `false`, `0`) and a missing field count as
/// absent. Other strings pass through and any other JSON value is sent in
/// compact form.
fn prompt_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Identifier text for `selectedModel`. Only a missing field selects the
/// default model; `null` or a number is passed on and rejected as unsupported.
fn model_selector(value: Option<&Value>) -> Option<String> {
    value.map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

async fn welcome() -> HttpResponse {
    HttpResponse::Ok().body(WELCOME_MESSAGE)
}

async fn generate_plan(
    client: web::Data<GenerationClient>,
    body: web::Json<PlanningRequest>,
) -> Result<HttpResponse, ApiError> {
    let prompt = prompt_text(body.task_description.as_ref())
        .ok_or(ApiError::MissingPayload("Task description is required"))?;

    let plan = client
        .generate_plan(&prompt, model_selector(body.selected_model.as_ref()).as_deref())
        .await
        .map_err(|e| {
            log::error!("Error in planning controller: {}", e);
            e
        })?;

    Ok(HttpResponse::Ok().json(PlanningResponse { plan }))
}

async fn generate_assets(
    client: web::Data<GenerationClient>,
    body: web::Json<AssetsRequest>,
) -> Result<HttpResponse, ApiError> {
    let prompt = prompt_text(body.model_data.as_ref())
        .ok_or(ApiError::MissingPayload("Model data is required"))?;

    let assets = client
        .generate_assets(&prompt, model_selector(body.selected_model.as_ref()).as_deref())
        .await
        .map_err(|e| {
            log::error!("Error in assets controller: {}", e);
            e
        })?;

    log::info!(
        "Assets response: has_text={} has_image={} has_image_url={}",
        !assets.text().is_empty(),
        assets.has_image(),
        assets.image_url().is_some()
    );

    Ok(HttpResponse::Ok().json(AssetsResponse { assets }))
}

async fn start_development(
    client: web::Data<GenerationClient>,
    body: web::Json<DevelopmentRequest>,
) -> Result<HttpResponse, ApiError> {
    let prompt = prompt_text(body.task_data.as_ref())
        .ok_or(ApiError::MissingPayload("Task data is required"))?;

    let development = client
        .start_development(&prompt, model_selector(body.selected_model.as_ref()).as_deref())
        .await
        .map_err(|e| {
            log::error!("Error in development controller: {}", e);
            e
        })?;

    Ok(HttpResponse::Ok().json(DevelopmentResponse { development }))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected request body: {}", err);
    ApiError::MalformedBody(format!("Invalid JSON body: {}", err)).into()
}

/// Registers the routes; the caller supplies the shared [`GenerationClient`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/", web::get().to(welcome))
        .service(
            web::scope("/api")
                .route("/planning", web::post().to(generate_plan))
                .route("/assets", web::post().to(generate_assets))
                .route("/development", web::post().to(start_development)),
        );
}

/// Browser frontends may call from any origin.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
}

/// Serves the API until the process is stopped.
pub async fn run(client: GenerationClient, host: &str, port: u16) -> std::io::Result<()> {
    let data = web::Data::new(client);

    actix_web::HttpServer::new(move || {
        actix_web::App::new()
            .wrap(cors())
            .wrap(Logger::new("%r %s %Dms"))
            .app_data(data.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run()
    .await
}
