//! View rendering.
//!
//! The query handler is generic over [`StatsRenderer`]; the JSON
//! renderer is the only one the firmware ships.

use crate::app::snapshot::{PositionView, RootView, StatsView};

/// Turns read-only views into response bodies.
pub trait StatsRenderer {
    type Error: core::fmt::Debug;

    /// MIME type of every body this renderer produces.
    const CONTENT_TYPE: &'static str;

    fn render_root(&self, view: &RootView) -> Result<String, Self::Error>;
    fn render_position(&self, view: &PositionView) -> Result<String, Self::Error>;
    fn render_stats(&self, view: &StatsView) -> Result<String, Self::Error>;
}

/// Compact JSON via `serde_json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl StatsRenderer for JsonRenderer {
    type Error = serde_json::Error;

    const CONTENT_TYPE: &'static str = "application/json";

    fn render_root(&self, view: &RootView) -> Result<String, Self::Error> {
        serde_json::to_string(view)
    }

    fn render_position(&self, view: &PositionView) -> Result<String, Self::Error> {
        serde_json::to_string(view)
    }

    fn render_stats(&self, view: &StatsView) -> Result<String, Self::Error> {
        serde_json::to_string(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::command::Angle;

    #[test]
    fn root_json() {
        let view = RootView {
            pan: Angle::new(12).unwrap(),
            tilt: Angle::CENTRE,
            total_messages: 7,
        };
        assert_eq!(
            JsonRenderer.render_root(&view).unwrap(),
            r#"{"pan":12,"tilt":90,"total_messages":7}"#
        );
    }
}
