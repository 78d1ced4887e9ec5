//! Passive query interface.
//!
//! Maps an HTTP-style `(method, path)` pair onto the receiver and
//! produces a complete response. The handler is transport-agnostic:
//! the ESP-IDF HTTP server adapter only copies [`QueryResponse`] onto
//! the wire, and host tests call [`QueryHandler::handle`] directly.
//!
//! | Method     | Path                     | Response                          |
//! |------------|--------------------------|-----------------------------------|
//! | GET        | `/`                      | 200, pan / tilt / total messages  |
//! | GET        | `/current`, `/datos`     | 200, current position             |
//! | GET        | `/stats`                 | 200, full statistics view         |
//! | GET / POST | `/reset`, `/resetstats`  | 302 to `/stats`, counters zeroed  |
//! | *          | *                        | 404                               |

pub mod render;

use std::sync::Mutex;

use log::{info, warn};

use crate::app::ports::EventSink;
use crate::app::service::{self, ReceiverService};

use render::StatsRenderer;

/// Where a reset redirects to.
pub const STATS_PATH: &str = "/stats";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Current,
    Stats,
    Reset,
    NotFound,
}

impl Route {
    /// Resolve a request target. Any query string is ignored.
    pub fn resolve(method: Method, target: &str) -> Self {
        let path = target.split_once('?').map_or(target, |(p, _)| p);
        match (method, path) {
            (Method::Get, "/") => Self::Root,
            (Method::Get, "/current" | "/datos") => Self::Current,
            (Method::Get, "/stats") => Self::Stats,
            (_, "/reset" | "/resetstats") => Self::Reset,
            _ => Self::NotFound,
        }
    }
}

/// A fully formed response, ready for any HTTP backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Set on redirects.
    pub location: Option<&'static str>,
}

impl QueryResponse {
    fn ok(content_type: &'static str, body: String) -> Self {
        Self {
            status: 200,
            content_type,
            body,
            location: None,
        }
    }

    fn redirect(location: &'static str) -> Self {
        Self {
            status: 302,
            content_type: "text/plain",
            body: String::new(),
            location: Some(location),
        }
    }

    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.into(),
            location: None,
        }
    }
}

/// Serves queries against the shared receiver.
pub struct QueryHandler<R: StatsRenderer> {
    renderer: R,
}

impl<R: StatsRenderer> QueryHandler<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    /// Answer one request at `now_us`.
    ///
    /// The service lock is held only while the view is built or the
    /// counters are reset; rendering happens after it is released.
    pub fn handle(
        &self,
        shared: &Mutex<ReceiverService>,
        method: Method,
        target: &str,
        now_us: u64,
        sink: &mut impl EventSink,
    ) -> QueryResponse {
        let route = Route::resolve(method, target);
        let rendered = match route {
            Route::Root => {
                let view = service::lock(shared).root();
                self.renderer.render_root(&view)
            }
            Route::Current => {
                let view = service::lock(shared).current();
                self.renderer.render_position(&view)
            }
            Route::Stats => {
                let view = service::lock(shared).snapshot(now_us);
                self.renderer.render_stats(&view)
            }
            Route::Reset => {
                service::lock(shared).reset_stats(sink);
                info!("Statistics reset via {}", target);
                return QueryResponse::redirect(STATS_PATH);
            }
            Route::NotFound => return QueryResponse::text(404, "not found"),
        };

        match rendered {
            Ok(body) => QueryResponse::ok(R::CONTENT_TYPE, body),
            Err(e) => {
                warn!("Rendering {:?} failed: {:?}", route, e);
                QueryResponse::text(500, "render failed")
            }
        }
    }
}
