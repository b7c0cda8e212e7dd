use itertools::Itertools;

use crate::{
    buffer::Buffer,
    components::{
        bounds::TileBounds,
        tile::{dispatch, Tile, TileData},
    },
    errors::{Result, TileStatsError},
};

/// Column and row of a tile in a [TileGrid].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIndex {
    pub x: usize,
    pub y: usize,
}

impl From<(usize, usize)> for TileIndex {
    fn from(value: (usize, usize)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

/// Regular partition of image bounds into tiles, edge tiles are clipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    bounds: TileBounds,
    /// (W, H)
    tile_shape: (usize, usize),
}

impl TileGrid {
    pub fn new(bounds: TileBounds, tile_shape: (usize, usize)) -> Self {
        let tile_shape = (tile_shape.0.max(1), tile_shape.1.max(1));
        Self { bounds, tile_shape }
    }

    pub fn bounds(&self) -> &TileBounds {
        &self.bounds
    }

    /// Nominal (W, H) of a tile.
    pub fn tile_shape(&self) -> (usize, usize) {
        self.tile_shape
    }

    /// (columns, rows)
    pub fn shape(&self) -> (usize, usize) {
        let (width, height) = self.bounds.shape();
        (
            width.div_ceil(self.tile_shape.0),
            height.div_ceil(self.tile_shape.1),
        )
    }

    pub fn len(&self) -> usize {
        let (columns, rows) = self.shape();
        columns * rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major tile indexes, each exactly once.
    pub fn indexes(&self) -> impl Iterator<Item = TileIndex> {
        let (columns, rows) = self.shape();
        (0..rows)
            .cartesian_product(0..columns)
            .map(|(y, x)| TileIndex { x, y })
    }

    pub fn tile_bounds(&self, index: TileIndex) -> Option<TileBounds> {
        let (columns, rows) = self.shape();
        if index.x >= columns || index.y >= rows {
            return None;
        }
        let (x0, y0) = self.bounds.offset();
        let (width, height) = self.bounds.shape();
        let (tile_width, tile_height) = self.tile_shape;
        let offset = (index.x * tile_width, index.y * tile_height);
        let shape = (
            tile_width.min(width - offset.0),
            tile_height.min(height - offset.1),
        );
        Some(TileBounds::new((x0 + offset.0, y0 + offset.1), shape))
    }
}

/// Supplier of the tiles of an image.
///
/// Tiles must partition [TileSource::bounds] exactly once, with no gaps or overlaps.
pub trait TileSource: Send + Sync {
    fn bounds(&self) -> TileBounds;

    fn band_count(&self) -> usize;

    /// Nominal (W, H) of a tile, edge tiles may be smaller.
    fn tile_shape(&self) -> (usize, usize);

    fn tile(&self, index: TileIndex) -> Result<Tile>;

    fn tile_grid(&self) -> TileGrid {
        TileGrid::new(self.bounds(), self.tile_shape())
    }

    fn tile_indexes(&self) -> Vec<TileIndex> {
        self.tile_grid().indexes().collect()
    }
}

/// Whole image held in memory, cut into tiles on request.
#[derive(Debug, Clone)]
pub struct MemoryTileSource {
    grid: TileGrid,
    data: TileData,
}

impl MemoryTileSource {
    /// `data` is (C, H, W) and covers the image placed at `offset`.
    pub fn new(offset: (usize, usize), data: impl Into<TileData>, tile_shape: (usize, usize)) -> Self {
        let data = data.into();
        let [_, height, width] = data.shape();
        let bounds = TileBounds::new(offset, (width, height));
        Self {
            grid: TileGrid::new(bounds, tile_shape),
            data,
        }
    }

    pub fn data(&self) -> &TileData {
        &self.data
    }
}

/// Copies the part of an image `buffer` covered by `tile`.
fn window<T: Copy>(
    buffer: &Buffer<T, 3>,
    image: &TileBounds,
    tile: &TileBounds,
) -> Result<Buffer<T, 3>> {
    let [bands, _, image_width] = buffer.shape();
    let (image_x, image_y) = image.offset();
    let (x0, y0) = tile.offset();
    let (width, height) = tile.shape();
    let (col, row) = (x0 - image_x, y0 - image_y);
    let data = (0..bands)
        .cartesian_product(row..row + height)
        .flat_map(|(band, row)| {
            let start = row * image_width + col;
            buffer.band(band)[start..start + width].iter().copied()
        })
        .collect();
    Buffer::from_vec([bands, height, width], data)
}

impl TileSource for MemoryTileSource {
    fn bounds(&self) -> TileBounds {
        self.grid.bounds
    }

    fn band_count(&self) -> usize {
        self.data.band_count()
    }

    fn tile_shape(&self) -> (usize, usize) {
        self.grid.tile_shape
    }

    fn tile(&self, index: TileIndex) -> Result<Tile> {
        let bounds = self
            .grid
            .tile_bounds(index)
            .ok_or(TileStatsError::TileIndexOutOfRange(index))?;
        let data = dispatch!(&self.data, buffer => TileData::from(window(buffer, &self.grid.bounds, &bounds)?));
        Ok(Tile::new(bounds, data))
    }

    fn tile_grid(&self) -> TileGrid {
        self.grid
    }
}
