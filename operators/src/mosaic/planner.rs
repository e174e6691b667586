use crate::mosaic::catalog_matcher::{MosaicQuery, find_matches};
use crate::mosaic::mosaic_placer::{MosaicLayout, place};
use crate::mosaic::query_record::RasterQueryRecord;
use crate::mosaic::tile_fitter::fit;
use crate::util::Result;
use rastermosaic_datatypes::raster::RasterCatalog;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The fitted and placed records of one query
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicPlan {
    pub records: Vec<RasterQueryRecord>,
    /// `None` if no raster covers any pixel of the query
    pub layout: Option<MosaicLayout>,
}

impl MosaicPlan {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            layout: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_none()
    }
}

/// Plans queries against a shared, immutable catalog
#[derive(Clone, Debug)]
pub struct MosaicPlanner {
    catalog: Arc<RasterCatalog>,
}

impl MosaicPlanner {
    pub fn new(catalog: Arc<RasterCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &RasterCatalog {
        &self.catalog
    }

    /// Matches, fits and places the rasters of one query.
    ///
    /// Rasters whose fitted window is empty are dropped. The mosaic canvas covers the union of all result envelopes.
    pub fn plan(&self, query: &MosaicQuery) -> Result<MosaicPlan> {
        let records = find_matches(&self.catalog, query)?
            .into_iter()
            .map(|record| fit(record, &self.catalog))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .filter(RasterQueryRecord::has_pixels)
            .collect::<Vec<_>>();

        let Some(result_envelope) = records
            .iter()
            .filter_map(RasterQueryRecord::result_envelope)
            .reduce(|union, envelope| union.union(&envelope))
        else {
            tracing::debug!(bounds = ?query.spatial_bounds, "no raster covers the query");
            return Ok(MosaicPlan::empty());
        };

        let (layout, records) = place(&self.catalog, &result_envelope, records)?;

        Ok(MosaicPlan {
            records,
            layout: Some(layout),
        })
    }

    /// Plans independent queries in parallel on the current rayon thread pool.
    ///
    /// The results are in the order of `queries`.
    pub fn plan_all(&self, queries: &[MosaicQuery]) -> Vec<Result<MosaicPlan>> {
        queries.par_iter().map(|query| self.plan(query)).collect()
    }
}
