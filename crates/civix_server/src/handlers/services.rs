//! Service catalog endpoints: the service list (JSON and XML) and the
//! per-service attribute definition.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Extension, Path, Query};
use axum::response::Response;
use axum::Json;

use civix_core::service::CivicService;

use crate::dto::{ServiceDefinitionDto, ServiceDto};
use crate::error::AppError;
use crate::xml;

fn jurisdiction(params: &HashMap<String, String>) -> Option<&str> {
    params.get("jurisdiction_id").map(String::as_str)
}

pub async fn list_json(
    Extension(service): Extension<Arc<dyn CivicService>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ServiceDto>>, AppError> {
    let services = service.list_services(jurisdiction(&params)).await?;
    Ok(Json(services.into_iter().map(ServiceDto::from).collect()))
}

pub async fn list_xml(
    Extension(service): Extension<Arc<dyn CivicService>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let services = service.list_services(jurisdiction(&params)).await?;
    let dtos: Vec<ServiceDto> = services.into_iter().map(ServiceDto::from).collect();
    Ok(xml::response(xml::render_services(&dtos)?))
}

pub async fn definition(
    Extension(service): Extension<Arc<dyn CivicService>>,
    Path(raw_code): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ServiceDefinitionDto>, AppError> {
    let service_code = raw_code.strip_suffix(".json").unwrap_or(&raw_code);
    let definition = service
        .get_service_definition(jurisdiction(&params).unwrap_or_default(), service_code)
        .await?;
    Ok(Json(definition.into()))
}
