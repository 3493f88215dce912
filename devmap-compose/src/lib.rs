//! Marker visuals and the text shown around them.

pub mod format;
pub mod marker;
pub mod panel;

pub use format::{badge_text, relative_time, round_off, Precision, MISSING_VALUE};
pub use marker::{cluster_target, compose, icon_for_cluster, pin_width, status_gated_color, MarkerStyle};
pub use panel::{
    detail_view, hover_card, list_card, AlertRow, AlertTable, CardContext, DetailRow, DetailView, HoverCard,
    ListCard, StatusTone,
};
