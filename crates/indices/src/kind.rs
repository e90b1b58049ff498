//! Index identities and trailing intervals.

use std::fmt;

use crate::error::IndexError;

/// One of the drought indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexKind {
    /// Total precipitation.
    Tp,
    /// Total precipitation as a percentage of normal.
    Pntp,
    /// Snow water equivalent.
    Swe,
    /// Snow water equivalent as a percentage of normal.
    Pnswe,
    /// Standardized Precipitation Index.
    Spi,
    /// Standardized Precipitation-Evapotranspiration Index.
    Spei,
    /// Soil moisture deficit.
    Smd,
}

impl IndexKind {
    /// Every index, in processing order.
    pub const ALL: [IndexKind; 7] = [
        Self::Tp,
        Self::Pntp,
        Self::Swe,
        Self::Pnswe,
        Self::Spi,
        Self::Spei,
        Self::Smd,
    ];

    /// Short variable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Tp => "tp",
            Self::Pntp => "pntp",
            Self::Swe => "swe",
            Self::Pnswe => "pnswe",
            Self::Spi => "spi",
            Self::Spei => "spei",
            Self::Smd => "smd",
        }
    }

    /// Descriptive name written as the `long_name` attribute.
    pub fn long_name(self) -> &'static str {
        match self {
            Self::Tp => "Total precipitation",
            Self::Pntp => "Total precipitation % of Normal",
            Self::Swe => "Snow water equivalent",
            Self::Pnswe => "Snow water equivalent % of Normal",
            Self::Spi => "Standardized Precipitation Index",
            Self::Spei => "Standardized Precipitation-Evapotranspiration Index",
            Self::Smd => "Soil moisture deficit",
        }
    }

    /// Units of the index values.
    pub fn units(self) -> &'static str {
        match self {
            Self::Tp | Self::Swe => "cm",
            Self::Pntp | Self::Pnswe | Self::Smd => "%",
            Self::Spi | Self::Spei => "",
        }
    }

    /// Whether the index has a value at the 1-day interval.
    pub fn defined_at_one_day(self) -> bool {
        matches!(self, Self::Swe | Self::Smd)
    }

    /// Whether the index is masked to land pixels.
    pub fn land_only(self) -> bool {
        matches!(self, Self::Swe | Self::Pnswe | Self::Smd)
    }

    /// Whether the index is a gamma-standardized index.
    pub fn is_standardized(self) -> bool {
        matches!(self, Self::Spi | Self::Spei)
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A number of trailing days ending on the analysis date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval(u32);

impl Interval {
    /// The snapshot interval: the most recent day only.
    pub const ONE_DAY: Interval = Interval(1);

    /// Longest interval the assembled window supports.
    pub const MAX_DAYS: u32 = 365;

    /// Create an interval.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidInterval`] if `days` is not in
    /// 1..=[`MAX_DAYS`](Self::MAX_DAYS).
    pub fn new(days: u32) -> Result<Self, IndexError> {
        if !(1..=Self::MAX_DAYS).contains(&days) {
            return Err(IndexError::InvalidInterval { days });
        }
        Ok(Self(days))
    }

    /// Length in days.
    pub fn days(self) -> u32 {
        self.0
    }

    /// Whether this is the 1-day snapshot interval.
    pub fn is_one_day(self) -> bool {
        self == Self::ONE_DAY
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_day_definitions() {
        let defined: Vec<_> = IndexKind::ALL
            .into_iter()
            .filter(|k| k.defined_at_one_day())
            .collect();
        assert_eq!(defined, vec![IndexKind::Swe, IndexKind::Smd]);
    }

    #[test]
    fn land_only_indices() {
        let masked: Vec<_> = IndexKind::ALL
            .into_iter()
            .filter(|k| k.land_only())
            .collect();
        assert_eq!(masked, vec![IndexKind::Swe, IndexKind::Pnswe, IndexKind::Smd]);
    }

    #[test]
    fn interval_bounds() {
        assert_eq!(Interval::new(1).unwrap(), Interval::ONE_DAY);
        assert_eq!(Interval::new(365).unwrap().days(), 365);
        assert_eq!(
            Interval::new(0).unwrap_err(),
            IndexError::InvalidInterval { days: 0 }
        );
        assert!(Interval::new(366).is_err());
        assert_eq!(Interval::new(30).unwrap().to_string(), "30d");
    }
}
