use std::fmt::{Debug, Display};

use num::traits::AsPrimitive;

use crate::{
    buffer::Buffer,
    components::bounds::TileBounds,
    errors::{Result, TileFormatError},
};

/// Numeric encoding of tile samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Byte,
    UShort,
    Short,
    Int,
    Float,
    Double,
}

impl Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Encoding::Byte => "u8",
            Encoding::UShort => "u16",
            Encoding::Short => "i16",
            Encoding::Int => "i32",
            Encoding::Float => "f32",
            Encoding::Double => "f64",
        };
        f.write_str(name)
    }
}

/// Raw sample type of a tile, widened to `f64` before accumulation.
pub trait Sample: AsPrimitive<f64> + Copy + Send + Sync + Debug + 'static {
    const ENCODING: Encoding;

    fn into_data(buffer: Buffer<Self, 3>) -> TileData;

    /// Samples for which this holds never reach an accumulator.
    fn is_nan(self) -> bool {
        false
    }
}

impl Sample for u8 {
    const ENCODING: Encoding = Encoding::Byte;
    fn into_data(buffer: Buffer<Self, 3>) -> TileData {
        TileData::Byte(buffer)
    }
}

impl Sample for u16 {
    const ENCODING: Encoding = Encoding::UShort;
    fn into_data(buffer: Buffer<Self, 3>) -> TileData {
        TileData::UShort(buffer)
    }
}

impl Sample for i16 {
    const ENCODING: Encoding = Encoding::Short;
    fn into_data(buffer: Buffer<Self, 3>) -> TileData {
        TileData::Short(buffer)
    }
}

impl Sample for i32 {
    const ENCODING: Encoding = Encoding::Int;
    fn into_data(buffer: Buffer<Self, 3>) -> TileData {
        TileData::Int(buffer)
    }
}

impl Sample for f32 {
    const ENCODING: Encoding = Encoding::Float;
    fn into_data(buffer: Buffer<Self, 3>) -> TileData {
        TileData::Float(buffer)
    }
    fn is_nan(self) -> bool {
        num::Float::is_nan(self)
    }
}

impl Sample for f64 {
    const ENCODING: Encoding = Encoding::Double;
    fn into_data(buffer: Buffer<Self, 3>) -> TileData {
        TileData::Double(buffer)
    }
    fn is_nan(self) -> bool {
        num::Float::is_nan(self)
    }
}

/// Band interleaved samples of shape (C, H, W), one variant per [Encoding].
#[derive(Debug, Clone, PartialEq)]
pub enum TileData {
    Byte(Buffer<u8, 3>),
    UShort(Buffer<u16, 3>),
    Short(Buffer<i16, 3>),
    Int(Buffer<i32, 3>),
    Float(Buffer<f32, 3>),
    Double(Buffer<f64, 3>),
}

/// Runs `$body` with `$buffer` bound to the typed buffer of a [TileData].
macro_rules! dispatch {
    ($data:expr, $buffer:ident => $body:expr) => {
        match $data {
            $crate::components::tile::TileData::Byte($buffer) => $body,
            $crate::components::tile::TileData::UShort($buffer) => $body,
            $crate::components::tile::TileData::Short($buffer) => $body,
            $crate::components::tile::TileData::Int($buffer) => $body,
            $crate::components::tile::TileData::Float($buffer) => $body,
            $crate::components::tile::TileData::Double($buffer) => $body,
        }
    };
}
pub(crate) use dispatch;

impl<T: Sample> From<Buffer<T, 3>> for TileData {
    fn from(value: Buffer<T, 3>) -> Self {
        T::into_data(value)
    }
}

impl TileData {
    /// (C, H, W)
    pub fn shape(&self) -> [usize; 3] {
        dispatch!(self, buffer => buffer.shape())
    }

    pub fn band_count(&self) -> usize {
        self.shape()[0]
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            TileData::Byte(_) => Encoding::Byte,
            TileData::UShort(_) => Encoding::UShort,
            TileData::Short(_) => Encoding::Short,
            TileData::Int(_) => Encoding::Int,
            TileData::Float(_) => Encoding::Float,
            TileData::Double(_) => Encoding::Double,
        }
    }
}

/// Rectangular partition of an image with its samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    bounds: TileBounds,
    data: TileData,
}

impl Tile {
    pub fn new(bounds: TileBounds, data: impl Into<TileData>) -> Self {
        Self {
            bounds,
            data: data.into(),
        }
    }

    pub fn bounds(&self) -> &TileBounds {
        &self.bounds
    }

    pub fn data(&self) -> &TileData {
        &self.data
    }

    pub fn band_count(&self) -> usize {
        self.data.band_count()
    }

    /// Checks the declared bounds against the buffer shape.
    pub fn validate(&self) -> Result<()> {
        let [_, height, width] = self.data.shape();
        let bounds = self.bounds.shape();
        if bounds != (width, height) {
            Err(TileFormatError::ShapeMismatch {
                bounds,
                buffer: (width, height),
            })?
        }
        Ok(())
    }
}
