use async_trait::async_trait;
use devmap_schema::Frame;
use tokio::sync::Mutex;

use crate::{FrameSource, SourceError};

/// Frames held in memory and swapped wholesale on each refresh.
///
/// Stands in for the host's query pipeline in tests and embedding code.
#[derive(Default)]
pub struct InMemoryFrameSource {
    frames: Mutex<Vec<Frame>>,
}

impl InMemoryFrameSource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: Mutex::new(frames),
        }
    }

    /// Replace the whole dataset, returning the previous one.
    pub async fn replace(&self, frames: Vec<Frame>) -> Vec<Frame> {
        let mut inner = self.frames.lock().await;
        std::mem::replace(&mut *inner, frames)
    }
}

#[async_trait]
impl FrameSource for InMemoryFrameSource {
    async fn frames(&self) -> Result<Vec<Frame>, SourceError> {
        // Frames share their batches; cloning is a refcount bump per table.
        Ok(self.frames.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use devmap_schema::FrameBuilder;

    use super::*;

    fn frame(name: &str) -> Frame {
        FrameBuilder::new()
            .name(name)
            .text("deviceid", vec![Some("a")])
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn replace_swaps_the_dataset() {
        let source = InMemoryFrameSource::new(vec![frame("first")]);
        assert_eq!(source.frames().await.unwrap()[0].name(), Some("first"));

        let old = source.replace(vec![frame("second"), frame("third")]).await;
        assert_eq!(old.len(), 1);
        let names: Vec<_> = source
            .frames()
            .await
            .unwrap()
            .iter()
            .map(|f| f.label().to_string())
            .collect();
        assert_eq!(names, vec!["second", "third"]);
    }

    #[tokio::test]
    async fn default_is_empty() {
        assert!(InMemoryFrameSource::default().frames().await.unwrap().is_empty());
    }
}
