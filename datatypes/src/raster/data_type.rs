use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The native cell type of a raster band.
///
/// `U1` and `U4` are sub-byte types that are typically used for palette indices.
#[derive(
    Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, Serialize, Copy, Clone, Display, EnumIter,
)]
pub enum RasterDataType {
    U1,
    U4,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

impl RasterDataType {
    /// Returns true if the given `value` is valid for the `RasterDataType` variant,
    /// i.e. it can be represented by a variable of the corresponding primitive data type
    ///
    /// # Examples
    ///
    /// ```
    /// use rastermosaic_datatypes::raster::RasterDataType;
    ///
    /// assert!(RasterDataType::U4.is_valid(15.0));
    /// assert!(!RasterDataType::U4.is_valid(16.0));
    /// assert!(RasterDataType::F32.is_valid(f64::NAN));
    /// assert!(!RasterDataType::I16.is_valid(f64::NAN));
    /// ```
    #[allow(clippy::float_cmp)]
    #[allow(clippy::cast_lossless)]
    pub fn is_valid(self, value: f64) -> bool {
        match self {
            RasterDataType::U1 | RasterDataType::U4 => {
                let (min, max) = self.sample_value_range();
                value.fract() == 0.0 && value >= min && value <= max
            }
            RasterDataType::U8 => value as u8 as f64 == value,
            RasterDataType::I8 => value as i8 as f64 == value,
            RasterDataType::U16 => value as u16 as f64 == value,
            RasterDataType::I16 => value as i16 as f64 == value,
            RasterDataType::U32 => value as u32 as f64 == value,
            RasterDataType::I32 => value as i32 as f64 == value,
            RasterDataType::F32 => value.is_nan() || value as f32 as f64 == value,
            RasterDataType::F64 => true,
        }
    }

    /// The inclusive range of sample values the type can represent
    #[allow(clippy::cast_lossless)]
    pub fn sample_value_range(self) -> (f64, f64) {
        match self {
            RasterDataType::U1 => (0., 1.),
            RasterDataType::U4 => (0., 15.),
            RasterDataType::U8 => (u8::MIN as f64, u8::MAX as f64),
            RasterDataType::I8 => (i8::MIN as f64, i8::MAX as f64),
            RasterDataType::U16 => (u16::MIN as f64, u16::MAX as f64),
            RasterDataType::I16 => (i16::MIN as f64, i16::MAX as f64),
            RasterDataType::U32 => (u32::MIN as f64, u32::MAX as f64),
            RasterDataType::I32 => (i32::MIN as f64, i32::MAX as f64),
            RasterDataType::F32 => (f32::MIN as f64, f32::MAX as f64),
            RasterDataType::F64 => (f64::MIN, f64::MAX),
        }
    }

    /// Checks whether all samples of `other` can be represented by this type
    pub fn holds(self, other: RasterDataType) -> bool {
        let (min, max) = other.sample_value_range();
        self.is_valid(min) && self.is_valid(max)
    }

    pub fn is_float(self) -> bool {
        matches!(self, RasterDataType::F32 | RasterDataType::F64)
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            RasterDataType::I8
                | RasterDataType::I16
                | RasterDataType::I32
                | RasterDataType::F32
                | RasterDataType::F64
        )
    }

    /// Unsigned integer types whose value range starts at zero
    pub fn has_zero_floor(self) -> bool {
        !self.is_signed()
    }

    pub fn bits(self) -> u32 {
        match self {
            RasterDataType::U1 => 1,
            RasterDataType::U4 => 4,
            RasterDataType::U8 | RasterDataType::I8 => 8,
            RasterDataType::U16 | RasterDataType::I16 => 16,
            RasterDataType::U32 | RasterDataType::I32 | RasterDataType::F32 => 32,
            RasterDataType::F64 => 64,
        }
    }

    /// Sub-byte palette types reserve the first index outside their range as no data
    pub fn reserved_no_data(self) -> Option<f64> {
        match self {
            RasterDataType::U1 => Some(2.),
            RasterDataType::U4 => Some(16.),
            _ => None,
        }
    }
}
