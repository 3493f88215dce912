use async_trait::async_trait;
use devmap_schema::Frame;

use crate::{FrameSource, FrameSourceHandle, SourceError};

/// Concatenates several sources in order, as if the host had delivered
/// all their tables in one refresh.
///
/// Order matters: device facts are resolved first-match-wins across frames,
/// so earlier sources shadow later ones for the same device.
pub struct MultiFrameSource {
    pub sources: Vec<FrameSourceHandle>,
}

impl MultiFrameSource {
    pub fn new(sources: Vec<FrameSourceHandle>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl FrameSource for MultiFrameSource {
    async fn frames(&self) -> Result<Vec<Frame>, SourceError> {
        let mut out = Vec::new();
        for source in &self.sources {
            out.extend(source.frames().await?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use devmap_schema::FrameBuilder;

    use super::*;
    use crate::{InMemoryFrameSource, NullFrameSource};

    #[tokio::test]
    async fn keeps_source_order() {
        let loc = FrameBuilder::new()
            .name("locations")
            .number("lat", vec![Some(1.0)])
            .number("lng", vec![Some(2.0)])
            .text("deviceid", vec![Some("a")])
            .build()
            .unwrap();
        let tel = FrameBuilder::new()
            .name("telemetry")
            .text("deviceid", vec![Some("a")])
            .build()
            .unwrap();

        let multi = MultiFrameSource::new(vec![
            Arc::new(InMemoryFrameSource::new(vec![loc])),
            Arc::new(NullFrameSource),
            Arc::new(InMemoryFrameSource::new(vec![tel])),
        ]);
        let frames = multi.frames().await.unwrap();
        let names: Vec<_> = frames.iter().map(|f| f.label()).collect();
        assert_eq!(names, vec!["locations", "telemetry"]);
    }
}
