//! Serial command link.
//!
//! The host writes one angle per line over a byte channel. This module
//! turns that byte stream into command lines without blocking the
//! control loop.
//!
//! ```text
//! ┌───────────┐   bytes   ┌─────────────┐   line   ┌──────────────────┐
//! │ Transport │─────────▶│ LineDecoder │────────▶│ ReceiverService  │
//! │ (trait)   │           │ (framing)   │          │ handle_line()    │
//! └───────────┘           └─────────────┘          └──────────────────┘
//! ```

pub mod line;
pub mod transport;
