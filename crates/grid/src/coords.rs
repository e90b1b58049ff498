//! Latitude/longitude coordinate axes.

use crate::error::GridError;

/// Absolute tolerance used when comparing coordinate values.
const COORD_TOLERANCE: f64 = 1e-6;

/// The latitude and longitude axes of a regular grid.
///
/// Both axes are non-empty and hold finite values. Array data attached to a
/// grid is laid out `(latitude, longitude)` with latitude varying slowest.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCoords {
    lats: Vec<f64>,
    lons: Vec<f64>,
}

impl GridCoords {
    /// Create a new `GridCoords` after validating both axes.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyAxis`] or [`GridError::NonFiniteCoordinate`].
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Result<Self, GridError> {
        validate_axis("latitude", &lats)?;
        validate_axis("longitude", &lons)?;
        Ok(Self { lats, lons })
    }

    /// Latitude values.
    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    /// Longitude values.
    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    /// `(n_lat, n_lon)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.lats.len(), self.lons.len())
    }

    /// Total number of grid cells.
    pub fn n_cells(&self) -> usize {
        self.lats.len() * self.lons.len()
    }

    /// Returns a copy with longitudes from 180 up shifted into `[-180, 180)`.
    ///
    /// Reference grids are stored on a `0..360` longitude axis while the
    /// raw fragments use `-180..180`.
    pub fn with_remapped_longitudes(mut self) -> Self {
        for lon in &mut self.lons {
            if *lon >= 180.0 {
                *lon -= 360.0;
            }
        }
        self
    }

    /// Returns a copy with the latitude axis reversed.
    pub fn with_reversed_latitudes(&self) -> Self {
        let mut lats = self.lats.clone();
        lats.reverse();
        Self {
            lats,
            lons: self.lons.clone(),
        }
    }

    /// Whether `other` has the same axes within tolerance.
    pub fn is_compatible(&self, other: &GridCoords) -> bool {
        axes_match(&self.lats, &other.lats) && axes_match(&self.lons, &other.lons)
    }

    /// Fail with [`GridError::CoordinateMismatch`] unless `other` is compatible.
    pub fn ensure_compatible(&self, other: &GridCoords, what: &str) -> Result<(), GridError> {
        if self.is_compatible(other) {
            return Ok(());
        }
        Err(GridError::CoordinateMismatch {
            what: format!(
                "{what}: expected {}x{} grid at lat {:?}..{:?}, lon {:?}..{:?}; got {}x{}",
                self.lats.len(),
                self.lons.len(),
                self.lats.first(),
                self.lats.last(),
                self.lons.first(),
                self.lons.last(),
                other.lats.len(),
                other.lons.len(),
            ),
        })
    }
}

fn validate_axis(axis: &'static str, values: &[f64]) -> Result<(), GridError> {
    if values.is_empty() {
        return Err(GridError::EmptyAxis { axis });
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(GridError::NonFiniteCoordinate { axis, index });
    }
    Ok(())
}

fn axes_match(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() <= COORD_TOLERANCE)
}

/// Geographic bounding box in degrees, `[north, west, south, east]` order
/// as used by the reanalysis archive's area keyword.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    north: f64,
    west: f64,
    south: f64,
    east: f64,
}

impl BoundingBox {
    /// Create a box from its four edges.
    pub fn new(north: f64, west: f64, south: f64, east: f64) -> Self {
        Self {
            north,
            west,
            south,
            east,
        }
    }

    /// Create a box from `[north, west, south, east]`.
    pub fn from_area(area: [f64; 4]) -> Self {
        Self::new(area[0], area[1], area[2], area[3])
    }

    /// Whether every grid point of `coords` lies inside the box.
    pub fn contains(&self, coords: &GridCoords) -> bool {
        let lat_ok = coords.lats().iter().all(|&lat| {
            lat <= self.north + COORD_TOLERANCE && lat >= self.south - COORD_TOLERANCE
        });
        let lon_ok = coords.lons().iter().all(|&lon| {
            lon >= self.west - COORD_TOLERANCE && lon <= self.east + COORD_TOLERANCE
        });
        lat_ok && lon_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_non_finite() {
        assert_eq!(
            GridCoords::new(vec![], vec![1.0]).unwrap_err(),
            GridError::EmptyAxis { axis: "latitude" }
        );
        assert_eq!(
            GridCoords::new(vec![1.0], vec![0.0, f64::NAN]).unwrap_err(),
            GridError::NonFiniteCoordinate {
                axis: "longitude",
                index: 1
            }
        );
    }

    #[test]
    fn remap_longitudes() {
        let c = GridCoords::new(vec![60.0], vec![180.0, 215.0, 235.0])
            .unwrap()
            .with_remapped_longitudes();
        assert_eq!(c.lons(), &[-180.0, -145.0, -125.0]);
    }

    #[test]
    fn remapped_antimeridian_matches_western_axis() {
        let reference = GridCoords::new(vec![60.0], vec![180.0, 180.25, 235.0])
            .unwrap()
            .with_remapped_longitudes();
        let fragments = GridCoords::new(vec![60.0], vec![-180.0, -179.75, -125.0]).unwrap();
        assert!(reference.is_compatible(&fragments));
        assert!(reference.ensure_compatible(&fragments, "climatology").is_ok());
    }

    #[test]
    fn compatibility_within_tolerance() {
        let a = GridCoords::new(vec![60.0, 59.75], vec![-150.0]).unwrap();
        let b = GridCoords::new(vec![60.0 + 1e-9, 59.75], vec![-150.0]).unwrap();
        let c = GridCoords::new(vec![60.0], vec![-150.0]).unwrap();
        assert!(a.is_compatible(&b));
        assert!(!a.is_compatible(&c));
        assert!(a.ensure_compatible(&c, "climatology").is_err());
    }

    #[test]
    fn bounding_box() {
        let bbox = BoundingBox::from_area([76.0, -180.0, 44.0, -125.0]);
        let inside = GridCoords::new(vec![76.0, 44.0], vec![-180.0, -125.0]).unwrap();
        let outside = GridCoords::new(vec![40.0], vec![-150.0]).unwrap();
        assert!(bbox.contains(&inside));
        assert!(!bbox.contains(&outside));
    }
}
