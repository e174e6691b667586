use crate::error;
use crate::util::Result;
use rastermosaic_datatypes::raster::{
    BandStatistics, RasterBandDescriptor, RasterCatalogEntry, RasterDataType,
};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ensure};

/// Each cell type and the next wider type that holds all of its values.
/// `F64` is the widest type and has no successor.
const PROMOTION_LADDER: &[(RasterDataType, RasterDataType)] = &[
    (RasterDataType::U1, RasterDataType::U8),
    (RasterDataType::U4, RasterDataType::U8),
    (RasterDataType::U8, RasterDataType::U16),
    (RasterDataType::I8, RasterDataType::I16),
    (RasterDataType::U16, RasterDataType::U32),
    (RasterDataType::I16, RasterDataType::I32),
    (RasterDataType::U32, RasterDataType::F64),
    (RasterDataType::I32, RasterDataType::F64),
    (RasterDataType::F32, RasterDataType::F64),
];

/// The output cell type and per band no-data values of a raster
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelModel {
    pub data_type: RasterDataType,
    pub no_data_values: Vec<f64>,
}

/// The next wider cell type
///
/// # Errors
///
/// Fails for `F64`, which cannot be promoted.
///
pub fn promote(data_type: RasterDataType) -> Result<RasterDataType> {
    PROMOTION_LADDER
        .iter()
        .find(|(from, _)| *from == data_type)
        .map(|(_, to)| *to)
        .context(error::PromotionExhausted { data_type })
}

/// `data_type` followed by all types it promotes to
fn promotion_chain(data_type: RasterDataType) -> impl Iterator<Item = RasterDataType> {
    std::iter::successors(Some(data_type), |data_type| promote(*data_type).ok())
}

/// The narrowest cell type that can hold all samples of `native` as well as all `no_data_values`.
///
/// Floating point types are never promoted and only accept NaN as no-data value.
///
/// # Errors
///
/// Fails on a non-NaN no-data value for a floating point type or if the promotion exceeds `F64`.
///
pub fn resolve_cell_type(
    native: RasterDataType,
    no_data_values: &[f64],
) -> Result<RasterDataType> {
    if native.is_float() {
        for &no_data_value in no_data_values {
            ensure!(
                no_data_value.is_nan(),
                error::InvalidFloatNoData {
                    data_type: native,
                    no_data_value,
                }
            );
        }
        return Ok(native);
    }

    let mut data_type = native;
    while !no_data_values.iter().all(|value| data_type.is_valid(*value)) {
        data_type = promote(data_type)?;
    }

    if data_type != native {
        tracing::debug!(%native, promoted = %data_type, "promoted cell type for no-data");
    }

    Ok(data_type)
}

/// Suggests a no-data value that does not collide with the observed values.
///
/// The suggestion lies just outside the observed range, or outside the type's range if there are no usable statistics.
/// It may not fit into `data_type`, which then has to be promoted by [`resolve_cell_type`].
pub fn suggest_no_data(data_type: RasterDataType, statistics: Option<BandStatistics>) -> f64 {
    if data_type.is_float() {
        return f64::NAN;
    }

    if let Some(reserved) = data_type.reserved_no_data() {
        return reserved;
    }

    let (min, max) = statistics
        .filter(BandStatistics::is_usable)
        .map_or_else(|| data_type.sample_value_range(), |s| (s.min, s.max));

    let below = (min - 1.).ceil();
    if data_type.is_valid(below) {
        return below;
    }

    let above = (max + 1.).floor();
    if data_type.is_valid(above) {
        return above;
    }

    if data_type.has_zero_floor() {
        above
    } else {
        below
    }
}

/// The no-data value of a band.
///
/// An explicit no-data value wins, color-mapped bands use the first index after their palette.
///
/// # Errors
///
/// Fails if a floating point band declares a no-data value other than NaN.
///
pub fn resolve_no_data(band: &RasterBandDescriptor) -> Result<f64> {
    if let Some(no_data_value) = band.no_data_value {
        ensure!(
            !band.data_type.is_float() || no_data_value.is_nan(),
            error::InvalidFloatNoData {
                data_type: band.data_type,
                no_data_value,
            }
        );
        return Ok(no_data_value);
    }

    if band.data_type.is_float() {
        return Ok(f64::NAN);
    }

    if let Some(color_map) = &band.color_map {
        return Ok(color_map.len() as f64);
    }

    Ok(suggest_no_data(band.data_type, band.usable_statistics()))
}

/// The narrowest type that holds all values of `a` and `b`
fn common_type(a: RasterDataType, b: RasterDataType) -> Result<RasterDataType> {
    promotion_chain(a)
        .chain(promotion_chain(b))
        .filter(|candidate| candidate.holds(a) && candidate.holds(b))
        .min_by_key(|candidate| candidate.bits())
        .context(error::PromotionExhausted { data_type: a })
}

/// Resolves one no-data value per band and one output cell type for all bands of `entry`
pub fn resolve_pixel_model(entry: &RasterCatalogEntry) -> Result<PixelModel> {
    let mut data_type: Option<RasterDataType> = None;
    let mut no_data_values = Vec::with_capacity(entry.bands().len());

    for band in entry.bands() {
        let no_data_value = resolve_no_data(band)?;
        let band_type = resolve_cell_type(band.data_type, &[no_data_value])?;

        data_type = Some(match data_type {
            Some(data_type) => common_type(data_type, band_type)?,
            None => band_type,
        });
        no_data_values.push(no_data_value);
    }

    Ok(PixelModel {
        data_type: data_type.unwrap_or_else(|| entry.native_data_type()),
        no_data_values,
    })
}
