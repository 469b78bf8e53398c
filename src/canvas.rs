//! Seams to the host's map canvas and coordinate transform engine.

use tracing::debug;

use crate::geoadmin::Crs;
use crate::geometry::Rectangle;
use crate::locator::SearchResult;

/// Extra room around a triggered result when framing the view.
pub const FRAME_PADDING: f64 = 1.5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("no transform from EPSG:{from} to EPSG:{to}")]
    Unsupported { from: u32, to: u32 },
}

/// Converts rectangles from the service CRS to the display CRS.
pub trait CrsTransform {
    fn transform(&self, rect: Rectangle, from: Crs, to_epsg: u32)
    -> Result<Rectangle, TransformError>;
}

/// Map view that can highlight a geometry and move its extent.
pub trait MapCanvas {
    fn destination_epsg(&self) -> u32;
    fn highlight(&mut self, rect: Rectangle, epsg: u32);
    fn set_extent(&mut self, extent: Rectangle);
    fn refresh(&mut self);
}

/// Only handles the case where display and service CRS coincide.
pub struct IdentityTransform;

impl CrsTransform for IdentityTransform {
    fn transform(
        &self,
        rect: Rectangle,
        from: Crs,
        to_epsg: u32,
    ) -> Result<Rectangle, TransformError> {
        if from.epsg() == to_epsg {
            Ok(rect)
        } else {
            Err(TransformError::Unsupported {
                from: from.epsg(),
                to: to_epsg,
            })
        }
    }
}

/// Canvas that records what it was asked to draw.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub epsg: u32,
    pub highlighted: Option<Rectangle>,
    pub extent: Option<Rectangle>,
    pub refreshes: usize,
}

impl RecordingCanvas {
    pub fn new(epsg: u32) -> Self {
        Self {
            epsg,
            ..Default::default()
        }
    }
}

impl MapCanvas for RecordingCanvas {
    fn destination_epsg(&self) -> u32 {
        self.epsg
    }

    fn highlight(&mut self, rect: Rectangle, _epsg: u32) {
        self.highlighted = Some(rect);
    }

    fn set_extent(&mut self, extent: Rectangle) {
        self.extent = Some(extent);
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}

/// Highlights a chosen result on the canvas and frames the view around it.
pub fn trigger_result(
    result: &SearchResult,
    service_crs: Crs,
    transform: &impl CrsTransform,
    canvas: &mut impl MapCanvas,
) -> Result<(), TransformError> {
    let dest = canvas.destination_epsg();
    let rect = transform.transform(result.bbox, service_crs, dest)?;
    canvas.highlight(rect, dest);
    let extent = rect.scaled(FRAME_PADDING);
    debug!(label = %result.label, ?extent, "framing result");
    canvas.set_extent(extent);
    canvas.refresh();
    Ok(())
}
