//! HTTP query server adapter.
//!
//! Registers a wildcard GET and POST handler on the ESP-IDF HTTP server
//! and forwards every request to [`QueryHandler`]. Routing, locking and
//! rendering all live in the handler; this adapter only moves bytes.

use esp_idf_svc::http::Method as HttpMethod;
use esp_idf_svc::http::server::{Configuration, EspHttpServer};
use esp_idf_svc::io::Write;
use log::{error, info};

use crate::adapters::log_sink::LogEventSink;
use crate::adapters::time::Esp32Clock;
use crate::app::ports::TimePort;
use crate::app::service::SharedReceiver;
use crate::error::{CommsError, Error, Result};
use crate::query::render::JsonRenderer;
use crate::query::{Method, QueryHandler};

/// Start the query server on `port`. The server stops when the
/// returned handle is dropped.
pub fn serve(shared: SharedReceiver, port: u16) -> Result<EspHttpServer<'static>> {
    let fail = |e: esp_idf_sys::EspError| {
        error!("HTTP: {}", e);
        Error::Comms(CommsError::HttpServerFailed)
    };

    let config = Configuration {
        http_port: port,
        uri_match_wildcard: true,
        ..Default::default()
    };
    let mut server = EspHttpServer::new(&config).map_err(fail)?;

    let methods = [
        (HttpMethod::Get, Method::Get),
        (HttpMethod::Post, Method::Post),
    ];
    for (http_method, method) in methods {
        let shared = shared.clone();
        server
            .fn_handler("/*", http_method, move |req| {
                let handler = QueryHandler::new(JsonRenderer);
                let now_us = Esp32Clock::new().uptime_us();
                let resp = handler.handle(&shared, method, req.uri(), now_us, &mut LogEventSink);

                let mut headers: heapless::Vec<(&str, &str), 2> = heapless::Vec::new();
                let _ = headers.push(("Content-Type", resp.content_type));
                if let Some(location) = resp.location {
                    let _ = headers.push(("Location", location));
                }

                let mut out = req.into_response(resp.status, None, &headers)?;
                out.write_all(resp.body.as_bytes())
            })
            .map_err(fail)?;
    }

    info!("HTTP: query server listening on port {}", port);
    Ok(server)
}
