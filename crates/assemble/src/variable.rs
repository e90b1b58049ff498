//! Raw reanalysis variables and how they reduce to daily values.

use std::fmt;

/// How sub-daily values combine into one daily value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyAggregation {
    /// Accumulated fluxes (precipitation, evaporation).
    Sum,
    /// Instantaneous states (snow depth, soil moisture).
    Mean,
}

/// A raw variable delivered by the acquisition stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RawVariable {
    /// Total precipitation (m).
    TotalPrecipitation,
    /// Snow depth (m of water equivalent).
    SnowDepth,
    /// Potential evaporation (m, negative upward).
    PotentialEvaporation,
    /// Volumetric soil water, 0-7 cm.
    SoilWaterLayer1,
    /// Volumetric soil water, 7-28 cm.
    SoilWaterLayer2,
}

impl RawVariable {
    /// Every raw variable, in processing order.
    pub const ALL: [RawVariable; 5] = [
        Self::TotalPrecipitation,
        Self::SnowDepth,
        Self::PotentialEvaporation,
        Self::SoilWaterLayer1,
        Self::SoilWaterLayer2,
    ];

    /// Short variable name used inside the files.
    pub fn name(self) -> &'static str {
        match self {
            Self::TotalPrecipitation => "tp",
            Self::SnowDepth => "sd",
            Self::PotentialEvaporation => "pev",
            Self::SoilWaterLayer1 => "swvl1",
            Self::SoilWaterLayer2 => "swvl2",
        }
    }

    /// Long name used as the fragment file prefix.
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::TotalPrecipitation => "total_precipitation",
            Self::SnowDepth => "snow_depth",
            Self::PotentialEvaporation => "potential_evaporation",
            Self::SoilWaterLayer1 => "volumetric_soil_water_layer_1",
            Self::SoilWaterLayer2 => "volumetric_soil_water_layer_2",
        }
    }

    /// Daily reduction for this variable.
    pub fn aggregation(self) -> DailyAggregation {
        match self {
            Self::TotalPrecipitation | Self::PotentialEvaporation => DailyAggregation::Sum,
            Self::SnowDepth | Self::SoilWaterLayer1 | Self::SoilWaterLayer2 => {
                DailyAggregation::Mean
            }
        }
    }
}

impl fmt::Display for RawVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
