use crate::mosaic::policy::ResolutionPolicy;
use crate::mosaic::query_record::RasterQueryRecord;
use crate::mosaic::resolution_selector::select_level;
use crate::util::Result;
use crate::util::config::{Query, get_config_element};
use rastermosaic_datatypes::primitives::{BoundingBox2D, SpatialResolution};
use rastermosaic_datatypes::raster::RasterCatalog;
use rastermosaic_datatypes::spatial_reference::SpatialReference;
use serde::{Deserialize, Serialize};

/// A request for the pixels of a catalog inside `spatial_bounds` at `spatial_resolution`
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicQuery {
    pub spatial_bounds: BoundingBox2D,
    pub spatial_resolution: SpatialResolution,
    pub spatial_reference: SpatialReference,
    #[serde(default)]
    pub policy: ResolutionPolicy,
}

impl MosaicQuery {
    pub fn new(
        spatial_bounds: BoundingBox2D,
        spatial_resolution: SpatialResolution,
        spatial_reference: SpatialReference,
        policy: ResolutionPolicy,
    ) -> Self {
        Self {
            spatial_bounds,
            spatial_resolution,
            spatial_reference,
            policy,
        }
    }

    /// Creates a query with the policy from the `query.default_policy` setting
    pub fn with_configured_policy(
        spatial_bounds: BoundingBox2D,
        spatial_resolution: SpatialResolution,
        spatial_reference: SpatialReference,
    ) -> Result<Self> {
        let query_config: Query = get_config_element()?;

        Ok(Self::new(
            spatial_bounds,
            spatial_resolution,
            spatial_reference,
            query_config.default_policy,
        ))
    }
}

/// Finds all rasters whose selected pyramid level intersects the query bounds.
///
/// Touching envelopes count as intersecting. Rasters in a different spatial reference than the query are skipped.
/// The records are returned in catalog order and are not fitted yet.
///
/// # Errors
///
/// Fails if the query resolution is invalid.
///
pub fn find_matches(catalog: &RasterCatalog, query: &MosaicQuery) -> Result<Vec<RasterQueryRecord>> {
    let mut records = Vec::new();

    for (raster_index, entry) in catalog.iter().enumerate() {
        if entry.spatial_reference() != query.spatial_reference {
            tracing::debug!(
                raster_id = %entry.raster_id(),
                spatial_reference = %entry.spatial_reference(),
                "raster uses a different spatial reference than the query"
            );
            continue;
        }

        let level_index = select_level(entry.levels(), query.spatial_resolution, query.policy)?;
        let level = &entry.levels()[level_index];

        if !level.image_envelope().intersects_bbox(&query.spatial_bounds) {
            tracing::trace!(raster_id = %entry.raster_id(), level_index, "raster does not intersect query");
            continue;
        }

        tracing::debug!(
            raster_id = %entry.raster_id(),
            raster_index,
            level_index,
            "matched raster"
        );

        records.push(RasterQueryRecord::new(
            entry.raster_id().clone(),
            raster_index,
            level_index,
            level.resolution(),
            query.spatial_bounds,
            query.spatial_resolution,
        ));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rastermosaic_datatypes::raster::{
        PixelSize, RasterBandDescriptor, RasterCatalogEntry, RasterDataType,
    };
    use rastermosaic_datatypes::util::test::{catalog, level_definition, pyramid_entry};

    fn bbox(min: (f64, f64), max: (f64, f64)) -> BoundingBox2D {
        BoundingBox2D::new(min.into(), max.into()).unwrap()
    }

    fn query(bounds: BoundingBox2D, resolution: f64) -> MosaicQuery {
        MosaicQuery::new(
            bounds,
            SpatialResolution::new(resolution, resolution).unwrap(),
            SpatialReference::epsg_4326(),
            ResolutionPolicy::Nearest,
        )
    }

    fn three_rasters() -> RasterCatalog {
        catalog(vec![
            pyramid_entry("west", (0., 0.), &[1., 2., 4.]),
            pyramid_entry("east", (1024., 0.), &[1., 2., 4.]),
            pyramid_entry("far", (10_000., 10_000.), &[1., 2., 4.]),
        ])
    }

    #[test]
    fn matches_in_catalog_order() {
        let records =
            find_matches(&three_rasters(), &query(bbox((500., 0.), (1500., 100.)), 2.)).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].raster_id, "west".into());
        assert_eq!(records[0].raster_index, 0);
        assert_eq!(records[1].raster_id, "east".into());
        assert_eq!(records[1].raster_index, 1);

        for record in &records {
            assert_eq!(record.level_index, 1);
            assert_eq!(record.level_resolution, SpatialResolution::new(2., 2.).unwrap());
            assert_eq!(record.requested_envelope, bbox((500., 0.), (1500., 100.)));
            assert_eq!(record.tile_fit, None);
            assert_eq!(record.mosaic_placement, None);
        }
    }

    #[test]
    fn touching_edges_intersect() {
        let records =
            find_matches(&three_rasters(), &query(bbox((-10., -10.), (0., 0.)), 1.)).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].raster_id, "west".into());
    }

    #[test]
    fn disjoint_rasters_are_excluded() {
        let records =
            find_matches(&three_rasters(), &query(bbox((5000., 5000.), (6000., 6000.)), 1.))
                .unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn level_selection_is_per_raster() {
        let fine = RasterCatalogEntry::builder(
            "fine",
            PixelSize::new(256, 256),
            SpatialReference::epsg_4326(),
        )
        .level(level_definition((0., 0.), 0.5, 2048, 2048))
        .level(level_definition((0., 0.), 1., 1024, 1024))
        .level(level_definition((0., 0.), 2., 512, 512))
        .band(RasterBandDescriptor::new("band", RasterDataType::U8))
        .build()
        .unwrap();

        let catalog = catalog(vec![
            fine,
            pyramid_entry("coarse", (0., 0.), &[2., 4.]),
        ]);

        let records = find_matches(&catalog, &query(bbox((0., 0.), (10., 10.)), 2.)).unwrap();

        assert_eq!(records[0].level_index, 2);
        assert_eq!(records[1].level_index, 0);
    }

    #[test]
    fn skips_other_spatial_reference() {
        let mercator = RasterCatalogEntry::builder(
            "mercator",
            PixelSize::new(256, 256),
            SpatialReference::epsg_3857(),
        )
        .level(level_definition((0., 0.), 1., 1024, 1024))
        .band(RasterBandDescriptor::new("band", RasterDataType::U8))
        .build()
        .unwrap();

        let catalog = catalog(vec![pyramid_entry("wgs84", (0., 0.), &[1., 2.]), mercator]);

        let records = find_matches(&catalog, &query(bbox((0., 0.), (10., 10.)), 1.)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].raster_id, "wgs84".into());
        assert_eq!(records[0].raster_index, 0);

        let mut mercator_query = query(bbox((0., 0.), (10., 10.)), 1.);
        mercator_query.spatial_reference = SpatialReference::epsg_3857();

        let records = find_matches(&catalog, &mercator_query).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].raster_id, "mercator".into());
        assert_eq!(records[0].raster_index, 1);
    }

    #[test]
    fn empty_catalog() {
        let records =
            find_matches(&RasterCatalog::default(), &query(bbox((0., 0.), (1., 1.)), 1.)).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn configured_policy() {
        let query = MosaicQuery::with_configured_policy(
            bbox((0., 0.), (1., 1.)),
            SpatialResolution::one(),
            SpatialReference::epsg_4326(),
        )
        .unwrap();

        assert_eq!(query.policy, ResolutionPolicy::Nearest);
    }

    #[test]
    fn deserialize_query() {
        let query: MosaicQuery = serde_json::from_str(
            r#"{
                "spatialBounds": {
                    "lowerLeftCoordinate": {"x": 0.0, "y": 0.0},
                    "upperRightCoordinate": {"x": 10.0, "y": 10.0}
                },
                "spatialResolution": {"x": 0.5, "y": 0.5},
                "spatialReference": "EPSG:4326",
                "policy": "speed"
            }"#,
        )
        .unwrap();

        assert_eq!(query.policy, ResolutionPolicy::Speed);
        assert_eq!(query.spatial_reference, SpatialReference::epsg_4326());
    }
}
