use crate::error;
use crate::mosaic::query_record::RasterQueryRecord;
use crate::util::Result;
use rastermosaic_datatypes::primitives::{BoundingBox2D, Coordinate2D, SpatialResolution};
use rastermosaic_datatypes::raster::{
    GeoTransform, GridRectangle, PixelSize, PixelTransform, PyramidLevel, RasterCatalog,
};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ensure};

/// The shared output grid of a mosaic
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicLayout {
    /// Position of the reference record in the placed records
    pub reference: usize,
    pub canvas_size: PixelSize,
    /// The world extent of the canvas, aligned to the reference grid
    pub canvas_envelope: BoundingBox2D,
    pub resolution: SpatialResolution,
    /// Maps canvas pixels to world coordinates
    pub geo_transform: GeoTransform,
}

/// The record with the coarsest level resolution. The first one wins on ties.
fn select_reference(records: &[RasterQueryRecord]) -> usize {
    let mut reference = 0;

    for (index, record) in records.iter().enumerate().skip(1) {
        if record.level_resolution.x > records[reference].level_resolution.x {
            reference = index;
        }
    }

    reference
}

/// The axis-aligned transform of a pixel transform, anchored at `pixel`
fn affine_at<T: PixelTransform>(transform: &T, pixel: Coordinate2D) -> GeoTransform {
    let origin = transform.pixel_to_world(pixel);
    let right = transform.pixel_to_world(Coordinate2D::new(pixel.x + 1., pixel.y));
    let down = transform.pixel_to_world(Coordinate2D::new(pixel.x, pixel.y + 1.));

    GeoTransform::new(origin, right.x - origin.x, down.y - origin.y)
}

/// Places all records in one output grid, using the grid of the selected level of the coarsest record.
///
/// See [`place_with`].
pub fn place(
    catalog: &RasterCatalog,
    result_envelope: &BoundingBox2D,
    records: Vec<RasterQueryRecord>,
) -> Result<(MosaicLayout, Vec<RasterQueryRecord>)> {
    place_with(catalog, result_envelope, records, PyramidLevel::geo_transform)
}

/// Places all records in one output grid.
///
/// The grid is created by `transform_for` from the selected level of the reference record,
/// which is the record with the coarsest resolution.
/// The canvas covers `result_envelope` and every record's placement is its result envelope in canvas pixels,
/// clipped to the canvas.
///
/// # Errors
///
/// Fails if there are no records, if a record was not fitted, or if the reference record does not
/// point to a raster level in `catalog`.
///
pub fn place_with<T, F>(
    catalog: &RasterCatalog,
    result_envelope: &BoundingBox2D,
    mut records: Vec<RasterQueryRecord>,
    transform_for: F,
) -> Result<(MosaicLayout, Vec<RasterQueryRecord>)>
where
    T: PixelTransform,
    F: Fn(&PyramidLevel) -> T,
{
    ensure!(!records.is_empty(), error::NoMatches);

    for record in &records {
        ensure!(
            record.tile_fit.is_some(),
            error::RecordNotFitted {
                raster_id: record.raster_id.clone()
            }
        );
    }

    let reference = select_reference(&records);
    let reference_record = &records[reference];

    let entry = catalog
        .get(reference_record.raster_index)
        .context(error::RasterIndexOutOfBounds {
            raster_index: reference_record.raster_index,
            len: catalog.len(),
        })?;
    let level = entry
        .level(reference_record.level_index)
        .context(error::LevelIndexOutOfBounds {
            raster_id: entry.raster_id().clone(),
            level_index: reference_record.level_index,
            len: entry.levels().len(),
        })?;

    let transform = transform_for(level);

    let canvas = transform.world_to_pixel_rectangle(result_envelope);
    let canvas_bounds = GridRectangle::with_size(Default::default(), canvas.size());

    for record in &mut records {
        let Some(fit) = record.tile_fit else {
            continue;
        };

        let placement = transform
            .world_to_pixel_rectangle(&fit.result_envelope)
            .translate(-canvas.x, -canvas.y)
            .intersection(&canvas_bounds);

        tracing::trace!(raster_id = %record.raster_id, ?placement, "placed raster");

        record.mosaic_placement = Some(placement);
    }

    let layout = MosaicLayout {
        reference,
        canvas_size: canvas.size(),
        canvas_envelope: transform.pixel_rectangle_to_world(&canvas),
        resolution: level.resolution(),
        geo_transform: affine_at(
            &transform,
            Coordinate2D::new(canvas.x as f64, canvas.y as f64),
        ),
    };

    tracing::debug!(
        reference_raster = %records[reference].raster_id,
        canvas_width = layout.canvas_size.width,
        canvas_height = layout.canvas_size.height,
        "placed mosaic"
    );

    Ok((layout, records))
}
