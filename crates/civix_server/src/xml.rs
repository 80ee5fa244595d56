//! XML renditions of the wire DTOs, written with the quick-xml event
//! writer. Element names follow the GeoReport v2 XML format.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::dto::{DiscoveryDto, ServiceDto, ServiceRequestDto};

/// Wrap a rendered document in a `text/xml` response.
pub fn response(body: String) -> Response {
    (
        [(header::CONTENT_TYPE, "text/xml; charset=utf-8")],
        body,
    )
        .into_response()
}

fn declaration(w: &mut Writer<Vec<u8>>) -> anyhow::Result<()> {
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(())
}

// Text content is escaped by the writer.
fn text_element(w: &mut Writer<Vec<u8>>, name: &str, value: &str) -> anyhow::Result<()> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(value)))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn finish(w: Writer<Vec<u8>>) -> anyhow::Result<String> {
    Ok(String::from_utf8(w.into_inner())?)
}

pub fn render_services(services: &[ServiceDto]) -> anyhow::Result<String> {
    let mut w = Writer::new(Vec::new());
    declaration(&mut w)?;
    w.write_event(Event::Start(BytesStart::new("services")))?;
    for s in services {
        w.write_event(Event::Start(BytesStart::new("service")))?;
        text_element(&mut w, "service_code", &s.service_code)?;
        text_element(&mut w, "service_name", &s.service_name)?;
        if let Some(description) = &s.description {
            text_element(&mut w, "description", description)?;
        }
        w.write_event(Event::End(BytesEnd::new("service")))?;
    }
    w.write_event(Event::End(BytesEnd::new("services")))?;
    finish(w)
}

pub fn render_requests(requests: &[ServiceRequestDto]) -> anyhow::Result<String> {
    let mut w = Writer::new(Vec::new());
    declaration(&mut w)?;
    w.write_event(Event::Start(BytesStart::new("service_requests")))?;
    for r in requests {
        w.write_event(Event::Start(BytesStart::new("request")))?;
        text_element(&mut w, "service_request_id", &r.service_request_id)?;
        text_element(&mut w, "jurisdiction_id", &r.jurisdiction_id)?;
        text_element(&mut w, "service_code", &r.service_code)?;
        text_element(&mut w, "status", &r.status)?;
        if let Some(address) = &r.address {
            text_element(&mut w, "address", address)?;
        }
        if let Some(lat) = r.lat {
            text_element(&mut w, "lat", &lat.to_string())?;
        }
        if let Some(long) = r.long {
            text_element(&mut w, "long", &long.to_string())?;
        }
        if let Some(description) = &r.description {
            text_element(&mut w, "description", description)?;
        }
        text_element(&mut w, "requested_datetime", &r.requested_datetime)?;
        if !r.selected_values.is_empty() {
            w.write_event(Event::Start(BytesStart::new("attributes")))?;
            for sv in &r.selected_values {
                w.write_event(Event::Start(BytesStart::new("attribute")))?;
                text_element(&mut w, "code", &sv.code)?;
                for value in &sv.values {
                    text_element(&mut w, "value", value)?;
                }
                w.write_event(Event::End(BytesEnd::new("attribute")))?;
            }
            w.write_event(Event::End(BytesEnd::new("attributes")))?;
        }
        w.write_event(Event::End(BytesEnd::new("request")))?;
    }
    w.write_event(Event::End(BytesEnd::new("service_requests")))?;
    finish(w)
}

pub fn render_discovery(discovery: &DiscoveryDto) -> anyhow::Result<String> {
    let mut w = Writer::new(Vec::new());
    declaration(&mut w)?;
    w.write_event(Event::Start(BytesStart::new("discovery")))?;
    text_element(&mut w, "contact", &discovery.contact)?;
    text_element(&mut w, "changeset", &discovery.changeset)?;
    w.write_event(Event::Start(BytesStart::new("endpoints")))?;
    for e in &discovery.endpoints {
        w.write_event(Event::Start(BytesStart::new("endpoint")))?;
        text_element(&mut w, "specification", &e.specification)?;
        text_element(&mut w, "url", &e.url)?;
        text_element(&mut w, "changeset", &e.changeset)?;
        text_element(&mut w, "type", &e.kind)?;
        w.write_event(Event::Start(BytesStart::new("formats")))?;
        for format in &e.formats {
            text_element(&mut w, "format", format)?;
        }
        w.write_event(Event::End(BytesEnd::new("formats")))?;
        w.write_event(Event::End(BytesEnd::new("endpoint")))?;
    }
    w.write_event(Event::End(BytesEnd::new("endpoints")))?;
    w.write_event(Event::End(BytesEnd::new("discovery")))?;
    finish(w)
}
