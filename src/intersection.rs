use geo::{Coord, CoordNum, Rect};

use crate::errors::{Result, TileStatsError};

pub trait CoordUtils<T: CoordNum> {
    fn operate(&self, rhs: &Self, op: impl Fn(T, T) -> T) -> Self;
}

impl<T: CoordNum> CoordUtils<T> for Coord<T> {
    fn operate(&self, rhs: &Self, op: impl Fn(T, T) -> T) -> Self {
        Coord {
            x: op(self.x, rhs.x),
            y: op(self.y, rhs.y),
        }
    }
}

pub trait Intersection {
    type Output;
    fn intersection(&self, rhs: &Self) -> Result<Self::Output>;
}

/// Rectangles are treated as half open, touching edges do not intersect.
impl<T: CoordNum> Intersection for Rect<T> {
    type Output = Rect<T>;
    fn intersection(&self, rhs: &Self) -> Result<Rect<T>> {
        let lhs_max = self.max();
        let rhs_min = rhs.min();
        if (lhs_max.x <= rhs_min.x) | (lhs_max.y <= rhs_min.y) {
            return Err(TileStatsError::NoIntersection);
        }

        let lhs_min = self.min();
        let rhs_max = rhs.max();
        if (lhs_min.x >= rhs_max.x) | (lhs_min.y >= rhs_max.y) {
            return Err(TileStatsError::NoIntersection);
        }

        let min = lhs_min.operate(&rhs_min, |x, y| if x > y { x } else { y });
        let max = lhs_max.operate(&rhs_max, |x, y| if x < y { x } else { y });

        Ok(Self::new(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case((0, 0), (4, 4), (2, 2), (6, 6), Some(((2, 2), (4, 4))))]
    #[case((0, 0), (4, 4), (4, 0), (8, 4), None)]
    #[case((2, 2), (3, 3), (0, 0), (8, 8), Some(((2, 2), (3, 3))))]
    #[case((0, 0), (2, 2), (5, 5), (6, 6), None)]
    fn rect_intersection(
        #[case] lhs_min: (usize, usize),
        #[case] lhs_max: (usize, usize),
        #[case] rhs_min: (usize, usize),
        #[case] rhs_max: (usize, usize),
        #[case] expected: Option<((usize, usize), (usize, usize))>,
    ) {
        let lhs = Rect::new(lhs_min, lhs_max);
        let rhs = Rect::new(rhs_min, rhs_max);
        let result = lhs.intersection(&rhs).ok();
        assert_eq!(
            result,
            expected.map(|(min, max)| Rect::new(min, max))
        );
    }
}
