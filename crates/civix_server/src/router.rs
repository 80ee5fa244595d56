//! Route table. State travels as `Extension`s: the `CivicService` trait
//! object and the discovery configuration.

use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use civix_core::service::CivicService;

use crate::config::DiscoveryConfig;
use crate::handlers;

pub fn build_router(service: Arc<dyn CivicService>, discovery: DiscoveryConfig) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api/config", get(handlers::config::jurisdiction_config))
        .route("/api/discovery", get(handlers::discovery::json))
        .route("/api/discovery.json", get(handlers::discovery::json))
        .route("/api/discovery.xml", get(handlers::discovery::xml_doc))
        .route("/api/services", get(handlers::services::list_json))
        .route("/api/services.json", get(handlers::services::list_json))
        .route("/api/services.xml", get(handlers::services::list_xml))
        .route(
            "/api/services/:service_code",
            get(handlers::services::definition),
        )
        .route(
            "/api/requests",
            get(handlers::requests::list_json).post(handlers::requests::create_json),
        )
        .route(
            "/api/requests.json",
            get(handlers::requests::list_json).post(handlers::requests::create_json),
        )
        .route(
            "/api/requests.xml",
            get(handlers::requests::list_xml).post(handlers::requests::create_xml),
        )
        .route(
            "/api/requests/:service_request_id",
            get(handlers::requests::get_one),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(Extension(service))
        .layer(Extension(discovery))
}
