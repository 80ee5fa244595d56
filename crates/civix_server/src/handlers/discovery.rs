//! Discovery endpoint — static deployment metadata from configuration.

use axum::extract::Extension;
use axum::response::Response;
use axum::Json;

use crate::config::DiscoveryConfig;
use crate::dto::{DiscoveryDto, EndpointDto};
use crate::error::AppError;
use crate::xml;

fn document(config: &DiscoveryConfig) -> DiscoveryDto {
    DiscoveryDto {
        contact: config.contact.clone(),
        changeset: config.changeset.clone(),
        endpoints: vec![EndpointDto {
            specification: "http://wiki.open311.org/GeoReport_v2".into(),
            url: format!("{}/api", config.base_url),
            changeset: config.changeset.clone(),
            kind: "production".into(),
            formats: vec!["application/json".into(), "text/xml".into()],
        }],
    }
}

pub async fn json(Extension(config): Extension<DiscoveryConfig>) -> Json<DiscoveryDto> {
    Json(document(&config))
}

pub async fn xml_doc(
    Extension(config): Extension<DiscoveryConfig>,
) -> Result<Response, AppError> {
    Ok(xml::response(xml::render_discovery(&document(&config))?))
}
