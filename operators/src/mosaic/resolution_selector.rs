use crate::error;
use crate::mosaic::policy::{BracketChoice, ResolutionPolicy};
use crate::util::Result;
use float_cmp::approx_eq;
use rastermosaic_datatypes::primitives::SpatialResolution;
use rastermosaic_datatypes::raster::PyramidLevel;
use snafu::ensure;

/// Outcome of scanning a pyramid for the requested scale
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum LevelScan {
    /// a level matches the requested scale exactly
    Exact(usize),
    /// the requested scale lies between two adjacent levels
    Bracket { finer: usize, coarser: usize },
}

/// Scale factors of a pyramid relative to its finest level along the x axis
struct PyramidScales<'l> {
    levels: &'l [PyramidLevel],
    highest_resolution: f64,
}

impl<'l> PyramidScales<'l> {
    fn new(levels: &'l [PyramidLevel]) -> Self {
        Self {
            levels,
            highest_resolution: levels[0].resolution().x,
        }
    }

    fn scale(&self, level_index: usize) -> f64 {
        self.levels[level_index].resolution().x / self.highest_resolution
    }

    fn last(&self) -> usize {
        self.levels.len() - 1
    }

    /// The scale of the less reduced axis of a request
    fn requested_scale(&self, requested: SpatialResolution) -> f64 {
        requested.min_axis() / self.highest_resolution
    }

    fn scan(&self, requested_scale: f64) -> LevelScan {
        for coarser in 1..self.levels.len() {
            let scale = self.scale(coarser);

            if approx_eq!(f64, scale, requested_scale) {
                return LevelScan::Exact(coarser);
            }

            if scale >= requested_scale {
                return LevelScan::Bracket {
                    finer: coarser - 1,
                    coarser,
                };
            }
        }

        LevelScan::Bracket {
            finer: self.last() - 1,
            coarser: self.last(),
        }
    }
}

/// Selects the index of the pyramid level that matches `requested` best under `policy`.
///
/// `levels` must be ordered from finest to coarsest.
/// Requests finer than the finest level select level 0, requests coarser than the coarsest level select the last one.
/// A request that hits the scale of a level exactly selects that level regardless of `policy`.
///
/// # Errors
///
/// Fails if `levels` is empty or `requested` is not positive and finite.
///
pub fn select_level(
    levels: &[PyramidLevel],
    requested: SpatialResolution,
    policy: ResolutionPolicy,
) -> Result<usize> {
    ensure!(!levels.is_empty(), error::EmptyPyramid);
    ensure!(
        requested.is_valid(),
        error::InvalidRequestResolution {
            x: requested.x,
            y: requested.y,
        }
    );

    let scales = PyramidScales::new(levels);
    let requested_scale = scales.requested_scale(requested);

    if requested_scale <= 1. || approx_eq!(f64, requested_scale, 1.) || scales.last() == 0 {
        return Ok(0);
    }

    if requested_scale >= scales.scale(scales.last()) {
        return Ok(scales.last());
    }

    let level_index = match scales.scan(requested_scale) {
        LevelScan::Exact(level_index) => level_index,
        LevelScan::Bracket { finer, coarser } => {
            match policy.choose(scales.scale(finer), scales.scale(coarser), requested_scale) {
                BracketChoice::Finer => finer,
                BracketChoice::Coarser => coarser,
            }
        }
    };

    tracing::trace!(
        requested_scale,
        %policy,
        level_index,
        "selected pyramid level"
    );

    Ok(level_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rastermosaic_datatypes::raster::RasterCatalogEntry;
    use rastermosaic_datatypes::util::test::pyramid_entry;
    use strum::IntoEnumIterator;

    fn pyramid() -> RasterCatalogEntry {
        pyramid_entry("pyramid", (0., 0.), &[1., 2., 4., 8.])
    }

    fn resolution(value: f64) -> SpatialResolution {
        SpatialResolution::new(value, value).unwrap()
    }

    #[test]
    fn nearest_breaks_ties_towards_finer_level() {
        let entry = pyramid();
        assert_eq!(
            select_level(entry.levels(), resolution(3.), ResolutionPolicy::Nearest).unwrap(),
            1
        );
        assert_eq!(
            select_level(entry.levels(), resolution(3.5), ResolutionPolicy::Nearest).unwrap(),
            2
        );
        assert_eq!(
            select_level(entry.levels(), resolution(2.5), ResolutionPolicy::Nearest).unwrap(),
            1
        );
    }

    #[test]
    fn speed_selects_coarser_level() {
        let entry = pyramid();
        assert_eq!(
            select_level(entry.levels(), resolution(3.), ResolutionPolicy::Speed).unwrap(),
            2
        );
    }

    #[test]
    fn quality_selects_finer_level() {
        let entry = pyramid();
        assert_eq!(
            select_level(entry.levels(), resolution(3.), ResolutionPolicy::Quality).unwrap(),
            1
        );
        assert_eq!(
            select_level(entry.levels(), resolution(7.9), ResolutionPolicy::Quality).unwrap(),
            2
        );
    }

    #[test]
    fn finer_requests_select_level_zero() {
        let entry = pyramid();
        for policy in ResolutionPolicy::iter() {
            for value in [0.01, 0.5, 1.] {
                assert_eq!(
                    select_level(entry.levels(), resolution(value), policy).unwrap(),
                    0
                );
            }
        }
    }

    #[test]
    fn coarser_requests_select_last_level() {
        let entry = pyramid();
        for policy in ResolutionPolicy::iter() {
            for value in [8., 9., 1000.] {
                assert_eq!(
                    select_level(entry.levels(), resolution(value), policy).unwrap(),
                    3
                );
            }
        }
    }

    #[test]
    fn exact_scales_match_for_every_policy() {
        let entry = pyramid();
        for policy in ResolutionPolicy::iter() {
            for (expected, value) in [1., 2., 4., 8.].into_iter().enumerate() {
                assert_eq!(
                    select_level(entry.levels(), resolution(value), policy).unwrap(),
                    expected,
                    "{policy} at {value}"
                );
            }
        }
    }

    #[test]
    fn exact_scales_tolerate_rounding_noise() {
        let entry = pyramid_entry("pyramid", (0., 0.), &[0.1, 0.2, 0.4]);

        // one ulp above the resolution of level 1
        let requested = resolution(0.1 * 2. + f64::EPSILON / 8.);
        assert_eq!(
            select_level(entry.levels(), requested, ResolutionPolicy::Speed).unwrap(),
            1
        );
        assert_eq!(
            select_level(entry.levels(), requested, ResolutionPolicy::Quality).unwrap(),
            1
        );
    }

    #[test]
    fn uses_least_reduced_axis() {
        let entry = pyramid();
        let requested = SpatialResolution::new(8., 2.).unwrap();

        assert_eq!(
            select_level(entry.levels(), requested, ResolutionPolicy::Speed).unwrap(),
            1
        );
    }

    #[test]
    fn single_level() {
        let entry = pyramid_entry("single", (0., 0.), &[1.]);

        for policy in ResolutionPolicy::iter() {
            assert_eq!(
                select_level(entry.levels(), resolution(5.), policy).unwrap(),
                0
            );
        }
    }

    #[test]
    fn speed_is_monotonic() {
        let entry = pyramid_entry("pyramid", (0., 0.), &[1., 2., 3., 5., 8., 13.]);

        let mut previous = 0;
        for step in 1..=300 {
            let requested = resolution(f64::from(step) * 0.05);
            let level_index =
                select_level(entry.levels(), requested, ResolutionPolicy::Speed).unwrap();

            assert!(level_index >= previous);
            assert!(level_index < entry.levels().len());
            previous = level_index;
        }
    }

    #[test]
    fn result_is_always_a_valid_index() {
        let entry = pyramid();
        for policy in ResolutionPolicy::iter() {
            for step in 1..=200 {
                let requested = SpatialResolution::new(f64::from(step) * 0.07, 1.3).unwrap();
                let level_index = select_level(entry.levels(), requested, policy).unwrap();
                assert!(level_index < entry.levels().len());
            }
        }
    }

    #[test]
    fn scan_without_bracket_uses_last_pair() {
        let entry = pyramid();
        let scales = PyramidScales::new(entry.levels());

        assert_eq!(
            scales.scan(100.),
            LevelScan::Bracket {
                finer: 2,
                coarser: 3
            }
        );
        assert_eq!(scales.scan(4.), LevelScan::Exact(2));
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(matches!(
            select_level(&[], resolution(1.), ResolutionPolicy::Nearest),
            Err(Error::EmptyPyramid)
        ));

        let entry = pyramid();
        assert!(matches!(
            select_level(
                entry.levels(),
                SpatialResolution::new_unchecked(0., 1.),
                ResolutionPolicy::Nearest
            ),
            Err(Error::InvalidRequestResolution { .. })
        ));
        assert!(matches!(
            select_level(
                entry.levels(),
                SpatialResolution::new_unchecked(f64::NAN, 1.),
                ResolutionPolicy::Nearest
            ),
            Err(Error::InvalidRequestResolution { .. })
        ));
    }
}
