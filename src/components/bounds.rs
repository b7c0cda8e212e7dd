use geo::{Coord, Rect};
use shrinkwraprs::Shrinkwrap;

use crate::{errors::Result, intersection::Intersection};

/// Pixel bounds of a tile or image, from the `offset` of its top left pixel
/// (image origin at top left) and its `shape` in (W, H).
///
/// Half open, `max` is one past the last pixel.
#[derive(Shrinkwrap, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileBounds(Rect<usize>);

impl Intersection for TileBounds {
    type Output = TileBounds;
    fn intersection(&self, rhs: &Self) -> Result<Self::Output> {
        Ok(TileBounds(self.0.intersection(&rhs.0)?))
    }
}

impl From<Rect<usize>> for TileBounds {
    fn from(value: Rect<usize>) -> Self {
        Self(value)
    }
}

impl TileBounds {
    pub fn new(offset: (usize, usize), shape: (usize, usize)) -> Self {
        let offset = Coord::from(offset);
        let max = offset + Coord::from(shape);
        Self(Rect::new(offset, max))
    }

    /// (width, height)
    pub fn shape(&self) -> (usize, usize) {
        (self.0.width(), self.0.height())
    }

    /// Coords of the top left pixel.
    pub fn offset(&self) -> (usize, usize) {
        self.0.min().x_y()
    }

    /// Pixel area.
    pub fn size(&self) -> usize {
        self.0.width() * self.0.height()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Clamps image coords onto the closest pixel inside the bounds.
    pub fn clamp(&self, x: usize, y: usize) -> (usize, usize) {
        let min = self.0.min();
        let max = self.0.max();
        (
            x.clamp(min.x, max.x.saturating_sub(1).max(min.x)),
            y.clamp(min.y, max.y.saturating_sub(1).max(min.y)),
        )
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        let min = self.0.min();
        let max = self.0.max();
        (min.x..max.x).contains(&x) & (min.y..max.y).contains(&y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_and_offset() {
        let bounds = TileBounds::new((4, 8), (3, 2));
        assert_eq!(bounds.offset(), (4, 8));
        assert_eq!(bounds.shape(), (3, 2));
        assert_eq!(bounds.size(), 6);
        assert!(bounds.contains(6, 9));
        assert!(!bounds.contains(7, 9));
    }

    #[test]
    fn clamp_replicates_edges() {
        let bounds = TileBounds::new((2, 2), (2, 2));
        assert_eq!(bounds.clamp(0, 0), (2, 2));
        assert_eq!(bounds.clamp(10, 3), (3, 3));
        assert_eq!(bounds.clamp(2, 3), (2, 3));
    }
}
