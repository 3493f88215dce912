use std::sync::Arc;

use async_trait::async_trait;
use devmap_schema::Frame;
use thiserror::Error;

pub mod json;
pub use json::{decode_frames, JsonFrameSource};

pub mod memory;
pub use memory::InMemoryFrameSource;

pub mod multi;
pub use multi::MultiFrameSource;

pub type FrameSourceHandle = Arc<dyn FrameSource>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error on {path}: {message}")]
    Io { path: String, message: String },
    #[error("frame document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame {frame}, field {field}: {message}")]
    Field {
        frame: String,
        field: String,
        message: String,
    },
    #[error("frame {frame}: {source}")]
    Arrow {
        frame: String,
        #[source]
        source: arrow::error::ArrowError,
    },
}

/// Where a render pass gets its tables.
///
/// Every call yields the complete current dataset; a refresh never patches
/// a previous result.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn frames(&self) -> Result<Vec<Frame>, SourceError>;
}

/// Source with no tables; renders an empty map.
pub struct NullFrameSource;

#[async_trait]
impl FrameSource for NullFrameSource {
    async fn frames(&self) -> Result<Vec<Frame>, SourceError> {
        Ok(Vec::new())
    }
}
