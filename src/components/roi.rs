use std::fmt::Debug;

use geo::{BoundingRect, Contains, MultiPolygon, Point};

use crate::{
    buffer::Buffer,
    components::bounds::TileBounds,
    errors::{Result, TileFormatError},
};

/// How a [Roi] is tested against tile pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum RoiTest {
    /// Through [Roi::mask] buffers, replicating edge values outside of the roi bounds.
    #[default]
    Mask,
    /// Through [Roi::contains], pixels outside of the roi bounds are excluded.
    Geometric,
}

/// Region of interest restricting which pixels contribute to statistics.
pub trait Roi: Send + Sync + Debug {
    fn bounds(&self) -> TileBounds;

    /// Whether pixel `(x, y)` in image coords is inside.
    fn contains(&self, x: usize, y: usize) -> bool;

    /// (H, W) inclusion mask for `bounds`, non zero is inside.
    ///
    /// Pixels beyond [Roi::bounds] take the value of the closest edge pixel.
    fn mask(&self, bounds: &TileBounds) -> Buffer<u8, 2> {
        let roi_bounds = self.bounds();
        let (x0, y0) = bounds.offset();
        let (width, height) = bounds.shape();
        Buffer::from_shape_fn([height, width], |(row, col)| {
            if roi_bounds.is_empty() {
                return 0;
            }
            let (x, y) = roi_bounds.clamp(x0 + col, y0 + row);
            u8::from(self.contains(x, y))
        })
    }
}

/// Raster mask placed at `bounds` in image coords.
#[derive(Debug, Clone)]
pub struct RasterRoi {
    bounds: TileBounds,
    mask: Buffer<u8, 2>,
}

impl RasterRoi {
    pub fn new(offset: (usize, usize), mask: Buffer<u8, 2>) -> Self {
        let [height, width] = mask.shape();
        let bounds = TileBounds::new(offset, (width, height));
        Self { bounds, mask }
    }

    pub fn from_vec(offset: (usize, usize), shape: (usize, usize), mask: Vec<u8>) -> Result<Self> {
        let (width, height) = shape;
        Ok(Self::new(offset, Buffer::from_vec([height, width], mask)?))
    }
}

impl Roi for RasterRoi {
    fn bounds(&self) -> TileBounds {
        self.bounds
    }

    fn contains(&self, x: usize, y: usize) -> bool {
        if !self.bounds.contains(x, y) {
            return false;
        }
        let (x0, y0) = self.bounds.offset();
        let (width, _) = self.bounds.shape();
        self.mask.as_ref()[(y - y0) * width + (x - x0)] != 0
    }
}

/// Polygonal roi in pixel coords, a pixel is inside when its centre is.
#[derive(Debug, Clone)]
pub struct GeometryRoi {
    geometry: MultiPolygon<f64>,
    bounds: TileBounds,
}

impl GeometryRoi {
    pub fn new(geometry: impl Into<MultiPolygon<f64>>) -> Self {
        let geometry = geometry.into();
        let bounds = match geometry.bounding_rect() {
            Some(rect) => {
                let min = rect.min();
                let max = rect.max();
                let offset = (min.x.max(0.).floor() as usize, min.y.max(0.).floor() as usize);
                let end = (max.x.max(0.).ceil() as usize, max.y.max(0.).ceil() as usize);
                TileBounds::new(offset, (end.0 - offset.0, end.1 - offset.1))
            }
            None => TileBounds::new((0, 0), (0, 0)),
        };
        Self { geometry, bounds }
    }
}

impl Roi for GeometryRoi {
    fn bounds(&self) -> TileBounds {
        self.bounds
    }

    fn contains(&self, x: usize, y: usize) -> bool {
        let centre = Point::new(x as f64 + 0.5, y as f64 + 0.5);
        self.geometry.contains(&centre)
    }
}

/// Checks a mask against the (W, H) shape of the tile it was built for.
pub(crate) fn check_mask(mask: &Buffer<u8, 2>, tile_shape: (usize, usize)) -> Result<()> {
    let [height, width] = mask.shape();
    if (width, height) != tile_shape {
        Err(TileFormatError::RoiMaskShape {
            mask: (width, height),
            tile: tile_shape,
        })?
    }
    Ok(())
}
