use itertools::Itertools;
use log::debug;

use crate::{
    buffer::Buffer,
    components::{
        bounds::TileBounds,
        config::Configuration,
        nodata::NoData,
        roi::{check_mask, Roi, RoiTest},
        tile::{dispatch, Sample, Tile},
    },
    errors::{Result, TileFormatError},
    intersection::Intersection,
};

/// Filtered samples of one tile, lazily read from its buffer.
///
/// Pixel positions are decimated by the sampling period and filtered by the roi
/// once, at construction. Values are filtered for `NaN` and no-data on every
/// iteration, so the view can be walked as many times as needed.
pub struct SampleView<'a, T: Sample> {
    buffer: &'a Buffer<T, 3>,
    bands: &'a [usize],
    /// Row-major pixel offsets within a band plane.
    offsets: Box<[usize]>,
    nodata: Option<&'a NoData>,
}

impl<'a, T: Sample> SampleView<'a, T> {
    /// Samples of the band at `slot` in the band selection.
    pub fn band(&self, slot: usize) -> impl Iterator<Item = f64> + '_ {
        let plane = self.buffer.band(self.bands[slot]);
        let nodata = self.nodata;
        self.offsets
            .iter()
            .map(move |offset| plane[*offset])
            .filter(|sample| !T::is_nan(*sample))
            .map(|sample| sample.as_())
            .filter(move |value| !matches!(nodata, Some(nodata) if nodata.contains(*value)))
    }

    /// `(value, band)` pairs over every selected band.
    pub fn iter(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.bands
            .iter()
            .enumerate()
            .flat_map(move |(slot, band)| self.band(slot).map(move |value| (value, *band)))
    }

    /// Pixels that passed decimation and the roi, before value filtering.
    pub fn pixel_count(&self) -> usize {
        self.offsets.len()
    }
}

/// Per selected band samples of one tile, indexed by band slot.
#[derive(Debug, Default, PartialEq)]
pub struct TileSamples(Box<[Vec<f64>]>);

impl TileSamples {
    pub fn band(&self, slot: usize) -> &[f64] {
        &self.0[slot]
    }

    pub fn bands(&self) -> impl Iterator<Item = (usize, &[f64])> {
        self.0.iter().map(Vec::as_slice).enumerate()
    }

    pub fn len(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns tiles into [SampleView]s following a [Configuration].
pub struct SampleExtractor<'a> {
    config: &'a Configuration,
    bands: &'a [usize],
    roi: Option<&'a dyn Roi>,
    /// Nominal (W, H) of the source tiles, edge tiles may be smaller.
    tile_shape: Option<(usize, usize)>,
}

impl<'a> SampleExtractor<'a> {
    pub fn new(config: &'a Configuration, bands: &'a [usize], roi: Option<&'a dyn Roi>) -> Self {
        Self {
            config,
            bands,
            roi,
            tile_shape: None,
        }
    }

    /// Sampling periods are checked against `tile_shape` instead of each tile's own
    /// shape, so clipped edge tiles are still sampled.
    pub fn with_tile_shape(mut self, tile_shape: (usize, usize)) -> Self {
        self.tile_shape = Some(tile_shape);
        self
    }

    /// Checks the tile layout against the band selection.
    pub fn check(&self, tile: &Tile) -> Result<()> {
        tile.validate()?;
        let count = tile.band_count();
        if let Some(band) = self.bands.iter().find(|band| **band >= count) {
            Err(TileFormatError::MissingBand { band: *band, count })?
        }
        Ok(())
    }

    /// View over the samples of `buffer`, `None` when the tile contributes nothing.
    pub fn view<'t, T: Sample>(
        &'t self,
        bounds: &TileBounds,
        buffer: &'t Buffer<T, 3>,
    ) -> Result<Option<SampleView<'t, T>>> {
        Ok(self.offsets(bounds)?.map(|offsets| SampleView {
            buffer,
            bands: self.bands,
            offsets,
            nodata: self.config.nodata(),
        }))
    }

    /// Samples of `tile`, `None` when the tile contributes nothing.
    ///
    /// The encoding is resolved once here, the sample loop is monomorphised.
    pub fn extract(&self, tile: &Tile) -> Result<Option<TileSamples>> {
        self.check(tile)?;
        let bounds = tile.bounds();
        dispatch!(tile.data(), buffer => Ok(self.view(bounds, buffer)?.map(|view| collect(&view))))
    }

    fn offsets(&self, bounds: &TileBounds) -> Result<Option<Box<[usize]>>> {
        let (x_period, y_period) = self.config.period();
        let (width, height) = bounds.shape();
        let (tile_width, tile_height) = self.tile_shape.unwrap_or((width, height));
        if x_period > tile_width || y_period > tile_height {
            debug!("skipping {bounds:?}, period ({x_period}, {y_period}) exceeds tile shape");
            return Ok(None);
        }

        let positions = (0..height)
            .step_by(y_period)
            .cartesian_product((0..width).step_by(x_period));
        let offsets: Box<[usize]> = match (self.roi, self.config.roi_test()) {
            (None, _) => positions.map(|(row, col)| row * width + col).collect(),
            (Some(roi), RoiTest::Mask) => {
                let mask = roi.mask(bounds);
                check_mask(&mask, (width, height))?;
                let mask = mask.as_ref();
                positions
                    .map(|(row, col)| row * width + col)
                    .filter(|offset| mask[*offset] != 0)
                    .collect()
            }
            (Some(roi), RoiTest::Geometric) => {
                if roi.bounds().intersection(bounds).is_err() {
                    debug!("skipping {bounds:?}, outside of roi");
                    return Ok(None);
                }
                let (x0, y0) = bounds.offset();
                positions
                    .filter(|(row, col)| roi.contains(x0 + col, y0 + row))
                    .map(|(row, col)| row * width + col)
                    .collect()
            }
        };
        Ok(Some(offsets))
    }
}

fn collect<T: Sample>(view: &SampleView<'_, T>) -> TileSamples {
    TileSamples(
        (0..view.bands.len())
            .map(|slot| view.band(slot).collect())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{roi::RasterRoi, stats::StatKind};
    use rstest::rstest;

    fn config() -> Configuration {
        Configuration::new([0], &[StatKind::Histogram], &[0.], &[64.], &[4]).unwrap()
    }

    fn tile<T: Sample>(shape: [usize; 3], data: Vec<T>) -> Tile {
        let [_, height, width] = shape;
        Tile::new(
            TileBounds::new((0, 0), (width, height)),
            Buffer::from_vec(shape, data).unwrap(),
        )
    }

    #[test]
    fn widens_unsigned_without_sign_extension() {
        let config = config();
        let extractor = SampleExtractor::new(&config, &[0], None);
        let samples = extractor
            .extract(&tile([1, 1, 2], vec![255u8, 128]))
            .unwrap()
            .unwrap();
        assert_eq!(samples.band(0), &[255., 128.]);

        let samples = extractor
            .extract(&tile([1, 1, 1], vec![u16::MAX]))
            .unwrap()
            .unwrap();
        assert_eq!(samples.band(0), &[65535.]);
    }

    #[test]
    fn keeps_signed_values() {
        let config = config();
        let extractor = SampleExtractor::new(&config, &[0], None);
        let samples = extractor
            .extract(&tile([1, 1, 2], vec![-3i16, i16::MIN]))
            .unwrap()
            .unwrap();
        assert_eq!(samples.band(0), &[-3., -32768.]);

        let samples = extractor
            .extract(&tile([1, 1, 1], vec![i32::MIN]))
            .unwrap()
            .unwrap();
        assert_eq!(samples.band(0), &[i32::MIN as f64]);
    }

    #[test]
    fn drops_nan_without_nodata() {
        let config = config();
        let extractor = SampleExtractor::new(&config, &[0], None);
        let samples = extractor
            .extract(&tile([1, 1, 3], vec![1f32, f32::NAN, 2.]))
            .unwrap()
            .unwrap();
        assert_eq!(samples.band(0), &[1., 2.]);

        let samples = extractor
            .extract(&tile([1, 1, 2], vec![f64::NAN, 0.5]))
            .unwrap()
            .unwrap();
        assert_eq!(samples.band(0), &[0.5]);
    }

    #[test]
    fn excludes_nodata() {
        let config = config().with_nodata(NoData::values([0., 9.]));
        let extractor = SampleExtractor::new(&config, &[0], None);
        let data = vec![0u8, 1, 9, 3, 0, 5];
        let samples = extractor.extract(&tile([1, 2, 3], data)).unwrap().unwrap();
        assert_eq!(samples.band(0), &[1., 3., 5.]);
    }

    #[rstest]
    #[case((2, 1), vec![0., 2., 4., 6., 8., 10.])]
    #[case((1, 2), vec![0., 1., 2., 3., 8., 9., 10., 11.])]
    #[case((3, 2), vec![0., 3., 8., 11.])]
    #[case((4, 1), vec![0., 4., 8.])]
    fn decimates_by_period(#[case] period: (usize, usize), #[case] expected: Vec<f64>) {
        let config = config().with_period(period.0, period.1).unwrap();
        let extractor = SampleExtractor::new(&config, &[0], None);
        let data: Vec<u8> = (0..12).collect();
        let samples = extractor.extract(&tile([1, 3, 4], data)).unwrap().unwrap();
        assert_eq!(samples.band(0), expected.as_slice());
    }

    #[test]
    fn period_beyond_tile_skips() {
        let config = config().with_period(16, 1).unwrap();
        let extractor = SampleExtractor::new(&config, &[0], None);
        let data: Vec<u8> = (0..64).collect();
        assert_eq!(extractor.extract(&tile([1, 8, 8], data)).unwrap(), None);
    }

    #[test]
    fn clipped_tile_follows_nominal_shape() {
        let config = config().with_period(3, 1).unwrap();
        let data = vec![8u8, 9];
        let tile = Tile::new(
            TileBounds::new((8, 0), (2, 1)),
            Buffer::from_vec([1, 1, 2], data).unwrap(),
        );

        let extractor = SampleExtractor::new(&config, &[0], None);
        assert_eq!(extractor.extract(&tile).unwrap(), None);

        let extractor = extractor.with_tile_shape((4, 1));
        let samples = extractor.extract(&tile).unwrap().unwrap();
        assert_eq!(samples.band(0), &[8.]);
    }

    #[test]
    fn selects_bands_in_order() {
        let config = Configuration::new([2, 0], &[StatKind::Mode], &[0.], &[10.], &[2]).unwrap();
        let extractor = SampleExtractor::new(&config, &[2, 0], None);
        let data = vec![1i32, 2, 10, 20, 100, 200];
        let tile = tile([3, 1, 2], data);
        let samples = extractor.extract(&tile).unwrap().unwrap();
        assert_eq!(samples.band(0), &[100., 200.]);
        assert_eq!(samples.band(1), &[1., 2.]);

        let buffer = match tile.data() {
            crate::components::tile::TileData::Int(buffer) => buffer,
            _ => unreachable!(),
        };
        let view = extractor.view(tile.bounds(), buffer).unwrap().unwrap();
        let pairs: Vec<(f64, usize)> = view.iter().collect();
        assert_eq!(pairs, vec![(100., 2), (200., 2), (1., 0), (2., 0)]);
        // restartable
        assert_eq!(view.iter().count(), 4);
        assert_eq!(view.pixel_count(), 2);
    }

    #[test]
    fn missing_band_is_a_tile_format_error() {
        let config = Configuration::new([1], &[StatKind::Mode], &[0.], &[10.], &[2]).unwrap();
        let extractor = SampleExtractor::new(&config, &[1], None);
        let result = extractor.extract(&tile([1, 1, 1], vec![0u8]));
        assert!(matches!(
            result,
            Err(crate::errors::TileStatsError::TileFormatError(
                TileFormatError::MissingBand { band: 1, count: 1 }
            ))
        ));
    }

    #[test]
    fn roi_mask_and_geometric_tests() {
        // left column inside
        let roi = RasterRoi::from_vec((0, 0), (2, 2), vec![1, 0, 1, 0]).unwrap();
        let data: Vec<u8> = (0..4).collect();

        let config = config();
        let extractor = SampleExtractor::new(&config, &[0], Some(&roi));
        let samples = extractor.extract(&tile([1, 2, 2], data.clone())).unwrap().unwrap();
        assert_eq!(samples.band(0), &[0., 2.]);

        let config = config.with_roi_test(RoiTest::Geometric);
        let extractor = SampleExtractor::new(&config, &[0], Some(&roi));
        let samples = extractor.extract(&tile([1, 2, 2], data)).unwrap().unwrap();
        assert_eq!(samples.band(0), &[0., 2.]);
    }

    #[test]
    fn geometric_roi_skips_disjoint_tiles() {
        let roi = RasterRoi::from_vec((10, 10), (1, 1), vec![1]).unwrap();
        let config = config().with_roi_test(RoiTest::Geometric);
        let extractor = SampleExtractor::new(&config, &[0], Some(&roi));
        assert_eq!(extractor.extract(&tile([1, 2, 2], vec![0u8; 4])).unwrap(), None);
    }
}
