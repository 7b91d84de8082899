//! Shared derivations used by the provider adapters.
//!
//! Percentages, unit conversions and the disk selection heuristic live in
//! [`normalize`]; the common alert shape lives in [`alerts`].

pub mod alerts;
pub mod normalize;

pub use alerts::{Alert, AlertLevel};
pub use normalize::{
    bytes_to_gb, long_uptime_display, percentage, queue_progress, select_disk_index,
    short_uptime_display, uptime_days, DiskNeedle,
};
