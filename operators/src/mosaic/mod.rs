mod catalog_matcher;
mod mosaic_placer;
mod pixel_model;
mod planner;
mod policy;
mod query_record;
mod resolution_selector;
mod tile_fitter;

pub use catalog_matcher::{MosaicQuery, find_matches};
pub use mosaic_placer::{MosaicLayout, place, place_with};
pub use pixel_model::{
    PixelModel, promote, resolve_cell_type, resolve_no_data, resolve_pixel_model, suggest_no_data,
};
pub use planner::{MosaicPlan, MosaicPlanner};
pub use policy::{BracketChoice, ResolutionPolicy};
pub use query_record::{RasterQueryRecord, TileFit};
pub use resolution_selector::select_level;
pub use tile_fitter::{fit, fit_window, refit};
