//! The HTTP server runs on its own task; these tests hammer the shared
//! receiver from several threads and check no query observes a torn
//! reset or an inconsistent aggregate.

use std::sync::Arc;
use std::thread;

use crate::mock_hw::{LogSink, MockServos};

use pantilt::app::service::{self, ReceiverService};
use pantilt::config::SystemConfig;
use pantilt::query::render::JsonRenderer;
use pantilt::query::{Method, QueryHandler};

#[test]
fn snapshots_never_see_half_reset_state() {
    let shared = ReceiverService::new(&SystemConfig::default()).shared();

    let writer = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            let mut hw = MockServos::new();
            let mut sink = LogSink::new();
            for i in 0..2_000u64 {
                let line = (i % 181).to_string();
                let mut svc = service::lock(&shared);
                let _ = svc.handle_line(&line, i * 1_000, &mut hw, &mut sink);
            }
        })
    };

    let resetter = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            let handler = QueryHandler::new(JsonRenderer);
            for _ in 0..200 {
                let resp = handler.handle(&shared, Method::Post, "/reset", 0, &mut LogSink::new());
                assert_eq!(resp.status, 302);
                thread::yield_now();
            }
        })
    };

    let reader = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            for _ in 0..2_000 {
                let view = service::lock(&shared).snapshot(u64::MAX / 2);
                let total = view.total_messages as usize;
                // The ring only holds intervals since the last reset.
                assert_eq!(view.history_us.len(), total.saturating_sub(1).min(100));
                match view.intervals {
                    None => assert!(total <= 1),
                    Some(s) => {
                        assert!(total >= 2);
                        assert!(s.min_us <= s.max_us);
                    }
                }
            }
        })
    };

    writer.join().unwrap();
    resetter.join().unwrap();
    reader.join().unwrap();
}
