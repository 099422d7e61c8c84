//! Web API Module
//!
//! Exposes RESTful endpoints over the call analysis service.
//! All endpoints return JSON and require no authentication.

use crate::service::{CallAnalysisService, ServiceError};
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================
// APPLICATION STATE
// ============================================================

/// Shared application state
pub struct AppState {
    pub service: CallAnalysisService,
}

impl AppState {
    pub fn new(service: CallAnalysisService) -> Self {
        Self { service }
    }
}

// ============================================================
// API REQUEST/RESPONSE TYPES
// ============================================================

#[derive(Deserialize)]
pub struct AnalyzeQuery {
    pub customer_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: &str) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }
    }
}

/// Map a service result onto an HTTP response
fn respond<T: Serialize>(result: Result<T, ServiceError>) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::success(data)),
        Err(e) => {
            let body = ApiResponse::<()>::error(&e.to_string());
            match e {
                ServiceError::NotFound(_) => HttpResponse::NotFound().json(body),
                ServiceError::InvalidArgument(_) => HttpResponse::BadRequest().json(body),
                ServiceError::Storage(ref cause) => {
                    error!("Storage failure: {}", cause);
                    HttpResponse::InternalServerError().json(body)
                }
            }
        }
    }
}

// ============================================================
// API HANDLERS
// ============================================================

/// Health check endpoint
async fn health_check(data: web::Data<Arc<AppState>>) -> impl Responder {
    HttpResponse::Ok().json(data.service.health())
}

async fn list_transcripts(data: web::Data<Arc<AppState>>) -> impl Responder {
    respond(data.service.list_transcripts())
}

async fn get_transcript(data: web::Data<Arc<AppState>>, path: web::Path<i64>) -> impl Responder {
    respond(data.service.get_transcript(path.into_inner()))
}

async fn get_customer_transcripts(
    data: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> impl Responder {
    respond(data.service.customer_transcripts(&path.into_inner()))
}

/// Analyze a transcript and save the result
async fn analyze_transcript(
    data: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
    query: web::Query<AnalyzeQuery>,
) -> impl Responder {
    respond(
        data.service
            .analyze_transcript(path.into_inner(), query.customer_id.as_deref()),
    )
}

async fn get_analysis(data: web::Data<Arc<AppState>>, path: web::Path<i64>) -> impl Responder {
    respond(data.service.get_analysis(path.into_inner()))
}

async fn get_customer_analysis(
    data: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> impl Responder {
    respond(data.service.customer_analysis_history(&path.into_inner()))
}

/// Analyze every transcript of a customer
async fn batch_analyze(
    data: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> impl Responder {
    respond(data.service.batch_analyze_customer(&path.into_inner()))
}

// ============================================================
// SERVER CONFIGURATION
// ============================================================

/// Register every route on an app or test service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/api/transcripts", web::get().to(list_transcripts))
        .route("/api/transcripts/{transcript_id}", web::get().to(get_transcript))
        .route(
            "/api/customers/{customer_id}/transcripts",
            web::get().to(get_customer_transcripts),
        )
        .route("/api/analyze/{transcript_id}", web::post().to(analyze_transcript))
        .route("/api/analysis/{analysis_id}", web::get().to(get_analysis))
        .route(
            "/api/customers/{customer_id}/analysis",
            web::get().to(get_customer_analysis),
        )
        .route(
            "/api/customers/{customer_id}/batch-analyze",
            web::post().to(batch_analyze),
        );
}

/// Configure and run the API server
pub async fn run_server(state: Arc<AppState>, host: &str, port: u16) -> std::io::Result<()> {
    info!("Call analysis API starting at http://{}:{}", host, port);
    info!("  GET  /api/transcripts");
    info!("  GET  /api/transcripts/:id");
    info!("  GET  /api/customers/:id/transcripts");
    info!("  POST /api/analyze/:id?customer_id=");
    info!("  GET  /api/analysis/:id");
    info!("  GET  /api/customers/:id/analysis");
    info!("  POST /api/customers/:id/batch-analyze");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(configure)
    })
    .bind((host, port))?
    .run()
    .await
}
