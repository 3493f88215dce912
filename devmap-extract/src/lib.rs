//! Host frames -> points and per-device state.

pub mod access;
pub mod alerts;
pub mod discovery;
pub mod payload;
pub mod points;
pub mod state;

pub use access::{number_column, text_column, ColumnError, NumberColumn, TextColumn};
pub use alerts::{alert_counts, aligned_positional_counts, positional_alert_counts, AlertAlignment};
pub use discovery::{KeyCatalog, KeyDiscovery};
pub use payload::PayloadError;
pub use points::{extract_points, location_ordinals};
pub use state::{extract, FactIndex, StateExtractor};
