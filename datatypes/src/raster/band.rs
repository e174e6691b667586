use super::RasterDataType;
use serde::{Deserialize, Serialize};

/// Observed sample statistics of a band
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandStatistics {
    pub min: f64,
    pub max: f64,
}

impl BandStatistics {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Statistics with a NaN bound carry no information
    pub fn is_usable(&self) -> bool {
        !self.min.is_nan() && !self.max.is_nan()
    }
}

/// An RGBA palette. Sample values of a color-mapped band index into `entries`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMap {
    entries: Vec<[u8; 4]>,
}

impl ColorMap {
    pub fn new(entries: Vec<[u8; 4]>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[[u8; 4]] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterBandDescriptor {
    pub name: String,
    pub data_type: RasterDataType,
    pub no_data_value: Option<f64>,
    pub color_map: Option<ColorMap>,
    pub statistics: Option<BandStatistics>,
}

impl RasterBandDescriptor {
    pub fn new(name: impl Into<String>, data_type: RasterDataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            no_data_value: None,
            color_map: None,
            statistics: None,
        }
    }

    #[must_use]
    pub fn with_no_data_value(mut self, no_data_value: f64) -> Self {
        self.no_data_value = Some(no_data_value);
        self
    }

    #[must_use]
    pub fn with_color_map(mut self, color_map: ColorMap) -> Self {
        self.color_map = Some(color_map);
        self
    }

    #[must_use]
    pub fn with_statistics(mut self, statistics: BandStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }

    pub fn is_color_mapped(&self) -> bool {
        self.color_map.is_some()
    }

    /// The statistics, if present and not malformed
    pub fn usable_statistics(&self) -> Option<BandStatistics> {
        self.statistics.filter(BandStatistics::is_usable)
    }
}
