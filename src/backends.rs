#[cfg(feature = "gdal")]
pub mod gdal_backend {
    use std::path::{Path, PathBuf};

    use gdal::{
        raster::{GdalDataType, GdalType},
        Dataset as GdalDataset,
    };
    use log::info;

    use crate::{
        buffer::Buffer,
        components::{
            bounds::TileBounds,
            source::{TileGrid, TileIndex, TileSource},
            tile::{Encoding, Sample, Tile, TileData},
        },
        errors::{Result, TileFormatError, TileStatsError},
    };

    fn encoding_from_gdal(data_type: GdalDataType) -> Result<Encoding> {
        Ok(match data_type {
            GdalDataType::UInt8 => Encoding::Byte,
            GdalDataType::UInt16 => Encoding::UShort,
            GdalDataType::Int16 => Encoding::Short,
            GdalDataType::Int32 => Encoding::Int,
            GdalDataType::Float32 => Encoding::Float,
            GdalDataType::Float64 => Encoding::Double,
            other => Err(TileFormatError::UnsupportedEncoding(format!("{other:?}")))?,
        })
    }

    /// Raster file read block by block through GDAL.
    ///
    /// The dataset is reopened on every tile read so tiles can be pulled from
    /// several threads.
    #[derive(Debug, Clone)]
    pub struct GdalTileSource {
        path: PathBuf,
        grid: TileGrid,
        band_count: usize,
        encoding: Encoding,
    }

    impl GdalTileSource {
        /// Tiles follow the block size of the first band.
        pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
            let path = path.as_ref().to_path_buf();
            let dataset = GdalDataset::open(&path)?;
            let band_count = dataset.raster_count();
            if band_count == 0 {
                Err(TileFormatError::MissingBand { band: 0, count: 0 })?
            }
            let rasterband = dataset.rasterband(1)?;
            let encoding = encoding_from_gdal(rasterband.band_type())?;
            let bounds = TileBounds::new((0, 0), dataset.raster_size());
            let source = Self {
                grid: TileGrid::new(bounds, rasterband.block_size()),
                path,
                band_count,
                encoding,
            };
            info!("opened {source:?}");
            Ok(source)
        }

        pub fn encoding(&self) -> Encoding {
            self.encoding
        }

        fn read<T: GdalType + Sample>(
            &self,
            dataset: &GdalDataset,
            bounds: &TileBounds,
        ) -> Result<TileData> {
            let (width, height) = bounds.shape();
            let (x, y) = bounds.offset();
            let mut data = Vec::with_capacity(self.band_count * width * height);
            for band_index in 1..=self.band_count {
                let buffer = dataset.rasterband(band_index)?.read_as::<T>(
                    (x as isize, y as isize),
                    (width, height),
                    (width, height),
                    None,
                )?;
                data.extend_from_slice(buffer.data());
            }
            Ok(Buffer::from_vec([self.band_count, height, width], data)?.into())
        }
    }

    impl TileSource for GdalTileSource {
        fn bounds(&self) -> TileBounds {
            *self.grid.bounds()
        }

        fn band_count(&self) -> usize {
            self.band_count
        }

        fn tile_shape(&self) -> (usize, usize) {
            self.grid.tile_shape()
        }

        fn tile(&self, index: TileIndex) -> Result<Tile> {
            let bounds = self
                .grid
                .tile_bounds(index)
                .ok_or(TileStatsError::TileIndexOutOfRange(index))?;
            let dataset = GdalDataset::open(&self.path)?;
            let data = match self.encoding {
                Encoding::Byte => self.read::<u8>(&dataset, &bounds)?,
                Encoding::UShort => self.read::<u16>(&dataset, &bounds)?,
                Encoding::Short => self.read::<i16>(&dataset, &bounds)?,
                Encoding::Int => self.read::<i32>(&dataset, &bounds)?,
                Encoding::Float => self.read::<f32>(&dataset, &bounds)?,
                Encoding::Double => self.read::<f64>(&dataset, &bounds)?,
            };
            Ok(Tile::new(bounds, data))
        }

        fn tile_grid(&self) -> TileGrid {
            self.grid
        }
    }
}
