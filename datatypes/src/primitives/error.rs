use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))] // disables default `Snafu` suffix
pub enum PrimitivesError {
    #[snafu(display("Spatial resolution must be positive and finite, but is {}", value))]
    InvalidSpatialResolution { value: f64 },
}
