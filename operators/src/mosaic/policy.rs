use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;
use strum::{Display, EnumIter};

/// How to choose between the two pyramid levels that bracket a requested resolution
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "camelCase", from = "String")]
#[strum(serialize_all = "camelCase")]
pub enum ResolutionPolicy {
    /// The finer level, never lose detail
    Quality,
    /// The coarser level, fewer pixels to read
    Speed,
    /// The level closer to the requested resolution
    #[default]
    Nearest,
}

/// One of the two levels bracketing a requested scale
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BracketChoice {
    Finer,
    Coarser,
}

impl ResolutionPolicy {
    /// Decides between the bracketing levels with scale factors `finer_scale <= requested_scale <= coarser_scale`
    ///
    /// # Examples
    ///
    /// ```
    /// use rastermosaic_operators::mosaic::{BracketChoice, ResolutionPolicy};
    ///
    /// assert_eq!(ResolutionPolicy::Nearest.choose(2., 4., 3.5), BracketChoice::Coarser);
    /// assert_eq!(ResolutionPolicy::Nearest.choose(2., 4., 3.), BracketChoice::Finer);
    /// ```
    pub fn choose(self, finer_scale: f64, coarser_scale: f64, requested_scale: f64) -> BracketChoice {
        match self {
            ResolutionPolicy::Quality => BracketChoice::Finer,
            ResolutionPolicy::Speed => BracketChoice::Coarser,
            ResolutionPolicy::Nearest => {
                if coarser_scale - requested_scale < requested_scale - finer_scale {
                    BracketChoice::Coarser
                } else {
                    BracketChoice::Finer
                }
            }
        }
    }
}

impl FromStr for ResolutionPolicy {
    type Err = Infallible;

    /// Parses a policy case-insensitively. Unknown names fall back to [`ResolutionPolicy::Nearest`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "quality" => ResolutionPolicy::Quality,
            "speed" => ResolutionPolicy::Speed,
            _ => ResolutionPolicy::Nearest,
        })
    }
}

impl From<String> for ResolutionPolicy {
    fn from(s: String) -> Self {
        let Ok(policy) = s.parse::<Self>();
        policy
    }
}
