//! Query routes against a live receiver.

use std::sync::Mutex;

use crate::mock_hw::{LogSink, MockServos};

use pantilt::app::events::AppEvent;
use pantilt::app::service::{self, ReceiverService};
use pantilt::config::SystemConfig;
use pantilt::query::render::JsonRenderer;
use pantilt::query::{Method, QueryHandler, STATS_PATH};

fn receiver_with(lines: &[(&str, u64)]) -> Mutex<ReceiverService> {
    let svc = Mutex::new(ReceiverService::new(&SystemConfig::default()));
    let mut hw = MockServos::new();
    let mut sink = LogSink::new();
    {
        let mut guard = service::lock(&svc);
        guard.start(&mut hw, &mut sink);
        for (line, at) in lines {
            let _ = guard.handle_line(line, *at, &mut hw, &mut sink);
        }
    }
    svc
}

fn get(svc: &Mutex<ReceiverService>, path: &str) -> serde_json::Value {
    let handler = QueryHandler::new(JsonRenderer);
    let resp = handler.handle(svc, Method::Get, path, 10_000_000, &mut LogSink::new());
    assert_eq!(resp.status, 200, "GET {path}");
    assert_eq!(resp.content_type, "application/json");
    serde_json::from_str(&resp.body).unwrap()
}

#[test]
fn root_reports_pan_tilt_and_total() {
    let svc = receiver_with(&[("30", 0), ("60", 1_000)]);
    let v = get(&svc, "/");
    assert_eq!(v["pan"], 60);
    assert_eq!(v["tilt"], 90);
    assert_eq!(v["total_messages"], 2);
}

#[test]
fn current_and_datos_agree() {
    let svc = receiver_with(&[("135", 0)]);
    assert_eq!(get(&svc, "/current"), get(&svc, "/datos"));
    assert_eq!(get(&svc, "/current")["position"], 135);
}

#[test]
fn stats_view_fields() {
    let svc = receiver_with(&[("0", 0), ("10", 1_000), ("999", 2_000), ("20", 3_000)]);
    let v = get(&svc, "/stats");
    assert_eq!(v["total_messages"], 3);
    assert_eq!(v["parse_errors"], 1);
    assert_eq!(v["intervals"]["min_us"], 1_000);
    assert_eq!(v["intervals"]["max_us"], 2_000);
    assert_eq!(v["intervals"]["mean_us"], 1_500.0);
    assert_eq!(v["history_us"], serde_json::json!([1_000, 2_000]));
    assert_eq!(v["stress"]["phase"], "none");
}

#[test]
fn reset_then_stats_is_empty() {
    let svc = receiver_with(&[("0", 0), ("10", 1_000), ("abc-200", 2_000)]);
    let mut sink = LogSink::new();

    let handler = QueryHandler::new(JsonRenderer);
    let resp = handler.handle(&svc, Method::Get, "/resetstats", 3_000, &mut sink);
    assert_eq!(resp.status, 302);
    assert_eq!(resp.location, Some(STATS_PATH));
    assert_eq!(sink.events, vec![AppEvent::StatsReset]);

    let v = get(&svc, "/stats");
    assert_eq!(v["total_messages"], 0);
    assert_eq!(v["parse_errors"], 0);
    assert!(v["intervals"].is_null());
    assert_eq!(v["history_us"], serde_json::json!([]));
    assert_eq!(v["stress"]["phase"], "none");
    // Position survives a statistics reset.
    assert_eq!(v["position"], 0);
}

#[test]
fn unknown_route_is_404() {
    let svc = receiver_with(&[]);
    let handler = QueryHandler::new(JsonRenderer);
    let resp = handler.handle(&svc, Method::Post, "/current", 0, &mut LogSink::new());
    assert_eq!(resp.status, 404);
}
