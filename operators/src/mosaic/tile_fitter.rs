use crate::error;
use crate::mosaic::query_record::{RasterQueryRecord, TileFit};
use crate::util::Result;
use rastermosaic_datatypes::primitives::BoundingBox2D;
use rastermosaic_datatypes::raster::{
    GridRectangle, PixelTransform, PyramidLevel, RasterCatalog, RasterCatalogEntry,
};
use snafu::OptionExt;

/// `floor(numerator / denominator)` for a positive denominator
fn floor_div(numerator: isize, denominator: isize) -> isize {
    numerator.div_euclid(denominator)
}

/// `ceil(numerator / denominator)` for a positive denominator
fn ceil_div(numerator: isize, denominator: isize) -> isize {
    -(-numerator).div_euclid(denominator)
}

/// The tiles along one axis that cover the pixels `[pixel_min, pixel_max)`.
///
/// Returns the first tile and the number of tiles, which is not positive for an empty span.
fn covering_tiles(
    pixel_min: isize,
    pixel_max: isize,
    tile_size: isize,
    level_tiles: isize,
) -> (isize, isize) {
    let span = pixel_max - pixel_min;
    let first_tile = floor_div(pixel_min, tile_size);
    let mut tile_count = ceil_div(span, tile_size);

    if span > 0
        && (first_tile + tile_count) * tile_size < pixel_max
        && first_tile + tile_count < level_tiles
    {
        tile_count += 1;
    }

    (first_tile, tile_count)
}

fn level_of<'e>(entry: &'e RasterCatalogEntry, level_index: usize) -> Result<&'e PyramidLevel> {
    entry.level(level_index).context(error::LevelIndexOutOfBounds {
        raster_id: entry.raster_id().clone(),
        level_index,
        len: entry.levels().len(),
    })
}

/// Computes the pixel window and tile range of a pyramid level that cover `requested_envelope`.
///
/// The window is rounded outwards to whole pixels and clipped to the valid pixels of the level.
/// A request outside of the level yields an empty window and a degenerate result envelope.
///
/// # Errors
///
/// Fails if the level does not exist.
///
pub fn fit_window(
    requested_envelope: &BoundingBox2D,
    entry: &RasterCatalogEntry,
    level_index: usize,
) -> Result<TileFit> {
    let level = level_of(entry, level_index)?;
    let geo_transform = level.geo_transform();
    let tile_size = level.tile_size();
    let level_tile_range = level.tile_range();

    let result_pixel_window = geo_transform
        .world_to_pixel_rectangle(requested_envelope)
        .intersection(&level.valid_pixel_window());

    let result_envelope = geo_transform.pixel_rectangle_to_world(&result_pixel_window);

    let (tile_x, tiles_x) = covering_tiles(
        result_pixel_window.x,
        result_pixel_window.max_x(),
        tile_size.width as isize,
        level_tile_range.max_x(),
    );
    let (tile_y, tiles_y) = covering_tiles(
        result_pixel_window.y,
        result_pixel_window.max_y(),
        tile_size.height as isize,
        level_tile_range.max_y(),
    );

    let matching_tile_range =
        GridRectangle::new(tile_x, tile_y, tiles_x, tiles_y).intersection(&level_tile_range);

    let tiled_pixel_window =
        matching_tile_range.scale(tile_size.width as isize, tile_size.height as isize);

    let window_in_tiled_pixels =
        result_pixel_window.translate(-tiled_pixel_window.x, -tiled_pixel_window.y);

    tracing::trace!(
        raster_id = %entry.raster_id(),
        level_index,
        ?result_pixel_window,
        ?matching_tile_range,
        "fitted tile range"
    );

    Ok(TileFit {
        result_envelope,
        result_pixel_window,
        matching_tile_range,
        level_tile_range,
        tiled_pixel_window,
        window_in_tiled_pixels,
    })
}

/// Fits the record's requested envelope against its selected level
pub fn fit(record: RasterQueryRecord, catalog: &RasterCatalog) -> Result<RasterQueryRecord> {
    let envelope = record.requested_envelope;
    refit(record, catalog, &envelope)
}

/// Fits the record against an adjusted target envelope.
///
/// A previous placement is discarded, since it was computed from the previous fit.
pub fn refit(
    mut record: RasterQueryRecord,
    catalog: &RasterCatalog,
    envelope: &BoundingBox2D,
) -> Result<RasterQueryRecord> {
    let entry = catalog
        .get(record.raster_index)
        .context(error::RasterIndexOutOfBounds {
            raster_index: record.raster_index,
            len: catalog.len(),
        })?;

    record.tile_fit = Some(fit_window(envelope, entry, record.level_index)?);
    record.mosaic_placement = None;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rastermosaic_datatypes::primitives::SpatialResolution;
    use rastermosaic_datatypes::raster::{
        PixelOffset, PixelSize, PyramidLevelDefinition, RasterBandDescriptor, RasterDataType,
    };
    use rastermosaic_datatypes::spatial_reference::SpatialReference;
    use rastermosaic_datatypes::util::test::{catalog, pyramid_entry};

    /// 1000x600 pixels of 1 unit, padded by 10 columns left and 20 rows top
    fn padded_entry() -> RasterCatalogEntry {
        RasterCatalogEntry::builder("padded", PixelSize::new(256, 256), SpatialReference::epsg_4326())
            .level(
                PyramidLevelDefinition::new(
                    BoundingBox2D::new((0., 0.).into(), (1000., 600.).into()).unwrap(),
                    PixelSize::new(1000, 600),
                )
                .with_pixel_offset(PixelOffset::new(10, 20)),
            )
            .band(RasterBandDescriptor::new("band", RasterDataType::U8))
            .build()
            .unwrap()
    }

    fn bbox(min: (f64, f64), max: (f64, f64)) -> BoundingBox2D {
        BoundingBox2D::new(min.into(), max.into()).unwrap()
    }

    #[test]
    fn inner_window() {
        let fit = fit_window(&bbox((100.5, 200.2), (300.7, 400.9)), &padded_entry(), 0).unwrap();

        assert_eq!(fit.result_pixel_window, GridRectangle::new(110, 219, 201, 201));
        assert_eq!(fit.result_envelope, bbox((100., 200.), (301., 401.)));
        assert_eq!(fit.matching_tile_range, GridRectangle::new(0, 0, 2, 2));
        assert_eq!(fit.level_tile_range, GridRectangle::new(0, 0, 4, 3));
        assert_eq!(fit.tiled_pixel_window, GridRectangle::new(0, 0, 512, 512));
        assert_eq!(fit.window_in_tiled_pixels, GridRectangle::new(110, 219, 201, 201));
        assert!(!fit.is_empty());
    }

    #[test]
    fn clipped_to_valid_pixels() {
        let fit = fit_window(&bbox((-50., -50.), (50., 50.)), &padded_entry(), 0).unwrap();

        assert_eq!(fit.result_pixel_window, GridRectangle::new(10, 570, 50, 50));
        assert_eq!(fit.result_envelope, bbox((0., 0.), (50., 50.)));
        assert_eq!(fit.matching_tile_range, GridRectangle::new(0, 2, 1, 1));
        assert_eq!(fit.tiled_pixel_window, GridRectangle::new(0, 512, 256, 256));
        assert_eq!(fit.window_in_tiled_pixels, GridRectangle::new(10, 58, 50, 50));
    }

    #[test]
    fn tile_aligned_window_needs_no_extra_tile() {
        // pixels [256, 512) x [256, 512) of the tiled grid
        let fit = fit_window(&bbox((246., 108.), (502., 364.)), &padded_entry(), 0).unwrap();

        assert_eq!(fit.result_pixel_window, GridRectangle::new(256, 256, 256, 256));
        assert_eq!(fit.matching_tile_range, GridRectangle::new(1, 1, 1, 1));
        assert_eq!(fit.window_in_tiled_pixels, GridRectangle::new(0, 0, 256, 256));
    }

    #[test]
    fn window_crossing_tile_border_gets_extra_tile() {
        // pixels [250, 260) along x straddle the border of tiles 0 and 1
        let fit = fit_window(&bbox((240., 300.), (250., 310.)), &padded_entry(), 0).unwrap();

        assert_eq!(fit.result_pixel_window.x, 250);
        assert_eq!(fit.result_pixel_window.width, 10);
        assert_eq!(fit.matching_tile_range.x, 0);
        assert_eq!(fit.matching_tile_range.width, 2);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn disjoint_request_yields_empty_window() {
        let fit = fit_window(&bbox((2000., 2000.), (2100., 2100.)), &padded_entry(), 0).unwrap();

        assert!(fit.is_empty());
        assert!(fit.result_pixel_window.width <= 0);
        assert!(fit.matching_tile_range.is_empty());
        assert_eq!(fit.result_envelope.size_x(), 0.);
    }

    #[test]
    fn huge_request_is_clipped_to_valid_pixels() {
        let request = bbox((-1e20, -1e20), (1e20, 1e20));

        let fit = fit_window(&request, &padded_entry(), 0).unwrap();
        assert_eq!(fit.result_pixel_window, GridRectangle::new(10, 20, 1000, 600));
        assert_eq!(fit.result_envelope, bbox((0., 0.), (1000., 600.)));
        assert_eq!(fit.matching_tile_range, fit.level_tile_range);

        let fit = fit_window(&request, &pyramid_entry("pyramid", (0., 0.), &[1., 2.]), 0).unwrap();
        assert_eq!(fit.result_pixel_window, GridRectangle::new(0, 0, 1024, 1024));
        assert_eq!(fit.result_envelope, bbox((0., 0.), (1024., 1024.)));
    }

    #[test]
    fn coarser_level() {
        let entry = pyramid_entry("pyramid", (0., 0.), &[1., 2., 4.]);

        let fit = fit_window(&bbox((100., 100.), (500., 300.)), &entry, 1).unwrap();

        // level 1 has 512x512 pixels of 2 units, rows count from y = 1024
        assert_eq!(fit.result_pixel_window, GridRectangle::new(50, 362, 200, 100));
        assert_eq!(fit.result_envelope, bbox((100., 100.), (500., 300.)));
        assert_eq!(fit.matching_tile_range, GridRectangle::new(0, 1, 1, 1));
    }

    #[test]
    fn result_envelope_round_trips() {
        let entry = padded_entry();

        for request in [
            bbox((100.5, 200.2), (300.7, 400.9)),
            bbox((-50., -50.), (50., 50.)),
            bbox((0.1, 0.3), (999.9, 599.7)),
            bbox((333.3, 111.1), (333.4, 111.2)),
        ] {
            let fit = fit_window(&request, &entry, 0).unwrap();
            let refitted = fit_window(&fit.result_envelope, &entry, 0).unwrap();

            assert_eq!(refitted.result_pixel_window, fit.result_pixel_window);
            assert_eq!(refitted.result_envelope, fit.result_envelope);
        }
    }

    #[test]
    fn tiled_window_covers_result_window() {
        let entry = pyramid_entry("pyramid", (0., 0.), &[1., 2., 4.]);

        for level_index in 0..3 {
            for offset in [0., 3.7, 128., 255.5, 511.9] {
                let request = bbox((offset, offset / 2.), (offset + 300.3, offset / 2. + 17.));
                let fit = fit_window(&request, &entry, level_index).unwrap();

                assert!(fit.tiled_pixel_window.contains(&fit.result_pixel_window));
                assert!(fit.level_tile_range.contains(&fit.matching_tile_range));
            }
        }
    }

    #[test]
    fn fit_and_refit_records() {
        let catalog = catalog(vec![padded_entry()]);
        let record = RasterQueryRecord::new(
            "padded".into(),
            0,
            0,
            SpatialResolution::one(),
            bbox((-50., -50.), (50., 50.)),
            SpatialResolution::one(),
        );

        let record = fit(record, &catalog).unwrap();
        assert_eq!(
            record.result_envelope(),
            Some(bbox((0., 0.), (50., 50.)))
        );

        let mut record = record;
        record.mosaic_placement = Some(GridRectangle::new(0, 0, 50, 50));

        let record = refit(record, &catalog, &bbox((10., 10.), (20., 20.))).unwrap();
        assert_eq!(
            record.result_envelope(),
            Some(bbox((10., 10.), (20., 20.)))
        );
        assert_eq!(record.requested_envelope, bbox((-50., -50.), (50., 50.)));
        assert_eq!(record.mosaic_placement, None);
    }

    #[test]
    fn invalid_indices() {
        let catalog = catalog(vec![padded_entry()]);
        let record = RasterQueryRecord::new(
            "padded".into(),
            0,
            3,
            SpatialResolution::one(),
            bbox((0., 0.), (1., 1.)),
            SpatialResolution::one(),
        );

        assert!(matches!(
            fit(record.clone(), &catalog),
            Err(Error::LevelIndexOutOfBounds { level_index: 3, .. })
        ));

        let record = RasterQueryRecord {
            raster_index: 1,
            ..record
        };
        assert!(matches!(
            fit(record, &catalog),
            Err(Error::RasterIndexOutOfBounds { raster_index: 1, len: 1 })
        ));
    }
}
