//! Gamma parameter grids per interval and day-of-year.

use std::collections::BTreeMap;

use drought_calendar::Doy;
use drought_grid::GridCoords;
use ndarray::{Array3, ArrayView2, Axis};

use crate::error::StandardizeError;
use crate::gamma::GammaParams;

/// Fitted parameters of one interval over `(day-of-year, lat, lon)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    doys: Vec<Doy>,
    shape: Array3<f64>,
    loc: Array3<f64>,
    scale: Array3<f64>,
}

impl ParameterGrid {
    /// Create a parameter grid. The leading axis of every array follows
    /// `doys`.
    ///
    /// # Errors
    ///
    /// Returns [`StandardizeError::ParameterShape`] if `loc` or `scale` do
    /// not match `shape`, or if the leading axis does not match `doys`.
    pub fn new(
        doys: Vec<Doy>,
        shape: Array3<f64>,
        loc: Array3<f64>,
        scale: Array3<f64>,
    ) -> Result<Self, StandardizeError> {
        let expected = shape.shape().to_vec();
        if expected[0] != doys.len() {
            let mut want = expected.clone();
            want[0] = doys.len();
            return Err(StandardizeError::ParameterShape {
                name: "a",
                expected: want,
                got: expected,
            });
        }
        for (name, array) in [("loc", &loc), ("scale", &scale)] {
            if array.shape() != expected.as_slice() {
                return Err(StandardizeError::ParameterShape {
                    name,
                    expected,
                    got: array.shape().to_vec(),
                });
            }
        }
        Ok(Self {
            doys,
            shape,
            loc,
            scale,
        })
    }

    /// Days-of-year covered, in array order.
    pub fn doys(&self) -> &[Doy] {
        &self.doys
    }

    /// `(lat, lon)` shape of each day's grid.
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.shape.shape()[1], self.shape.shape()[2])
    }

    fn slice(&self, doy: Doy) -> Option<ParameterSlice<'_>> {
        let i = self.doys.iter().position(|&d| d == doy)?;
        Some(ParameterSlice {
            shape: self.shape.index_axis(Axis(0), i),
            loc: self.loc.index_axis(Axis(0), i),
            scale: self.scale.index_axis(Axis(0), i),
        })
    }
}

/// Parameters of one (interval, day-of-year) over the grid.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSlice<'a> {
    shape: ArrayView2<'a, f64>,
    loc: ArrayView2<'a, f64>,
    scale: ArrayView2<'a, f64>,
}

impl ParameterSlice<'_> {
    /// `(lat, lon)` shape.
    pub fn dim(&self) -> (usize, usize) {
        self.shape.dim()
    }

    /// Parameters at one pixel, or `None` where they are not a valid gamma.
    pub fn at(&self, row: usize, col: usize) -> Option<GammaParams> {
        GammaParams::new(
            self.shape[[row, col]],
            self.loc[[row, col]],
            self.scale[[row, col]],
        )
    }
}

/// Gamma parameters for every fitted interval on one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GammaParameterSet {
    coords: GridCoords,
    intervals: BTreeMap<u32, ParameterGrid>,
}

impl GammaParameterSet {
    /// Create an empty set on `coords`.
    pub fn new(coords: GridCoords) -> Self {
        Self {
            coords,
            intervals: BTreeMap::new(),
        }
    }

    /// Add the parameters of one interval.
    ///
    /// # Errors
    ///
    /// Returns [`StandardizeError::DuplicateInterval`] if the interval is
    /// already present, or [`StandardizeError::ParameterShape`] if the grid
    /// does not match the set's coordinates.
    pub fn insert(&mut self, interval: u32, grid: ParameterGrid) -> Result<(), StandardizeError> {
        if self.intervals.contains_key(&interval) {
            return Err(StandardizeError::DuplicateInterval { interval });
        }
        let (ny, nx) = self.coords.shape();
        if grid.grid_shape() != (ny, nx) {
            return Err(StandardizeError::ParameterShape {
                name: "a",
                expected: vec![grid.doys.len(), ny, nx],
                got: grid.shape.shape().to_vec(),
            });
        }
        self.intervals.insert(interval, grid);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    ///
    /// # Errors
    ///
    /// As for [`insert`](Self::insert).
    pub fn with_interval(
        mut self,
        interval: u32,
        grid: ParameterGrid,
    ) -> Result<Self, StandardizeError> {
        self.insert(interval, grid)?;
        Ok(self)
    }

    /// Grid axes of the parameters.
    pub fn coords(&self) -> &GridCoords {
        &self.coords
    }

    /// Fitted intervals, ascending.
    pub fn intervals(&self) -> impl Iterator<Item = u32> + '_ {
        self.intervals.keys().copied()
    }

    /// Parameters for an (interval, day-of-year).
    ///
    /// # Errors
    ///
    /// Returns [`StandardizeError::MissingInterval`] or
    /// [`StandardizeError::MissingDayOfYear`] if either is absent.
    pub fn params_for(&self, interval: u32, doy: Doy) -> Result<ParameterSlice<'_>, StandardizeError> {
        let grid = self
            .intervals
            .get(&interval)
            .ok_or(StandardizeError::MissingInterval { interval })?;
        grid.slice(doy)
            .ok_or(StandardizeError::MissingDayOfYear { interval, doy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doy(d: u16) -> Doy {
        Doy::new(d).unwrap()
    }

    fn grid(doys: &[u16], shape_value: f64) -> ParameterGrid {
        let n = doys.len();
        ParameterGrid::new(
            doys.iter().map(|&d| doy(d)).collect(),
            Array3::from_shape_fn((n, 1, 2), |(t, _, _)| shape_value + t as f64),
            Array3::zeros((n, 1, 2)),
            Array3::ones((n, 1, 2)),
        )
        .unwrap()
    }

    fn coords() -> GridCoords {
        GridCoords::new(vec![60.0], vec![-150.0, -149.0]).unwrap()
    }

    #[test]
    fn lookup_by_interval_and_doy() {
        let set = GammaParameterSet::new(coords())
            .with_interval(30, grid(&[99, 100], 2.0))
            .unwrap();
        let slice = set.params_for(30, doy(100)).unwrap();
        assert_eq!(slice.dim(), (1, 2));
        assert_eq!(slice.at(0, 1).unwrap().shape(), 3.0);
    }

    #[test]
    fn missing_lookups_are_errors() {
        let set = GammaParameterSet::new(coords())
            .with_interval(30, grid(&[100], 2.0))
            .unwrap();
        assert_eq!(
            set.params_for(7, doy(100)).unwrap_err(),
            StandardizeError::MissingInterval { interval: 7 }
        );
        assert_eq!(
            set.params_for(30, doy(366)).unwrap_err(),
            StandardizeError::MissingDayOfYear {
                interval: 30,
                doy: doy(366)
            }
        );
    }

    #[test]
    fn duplicate_interval_rejected() {
        let mut set = GammaParameterSet::new(coords());
        set.insert(30, grid(&[1], 1.0)).unwrap();
        assert_eq!(
            set.insert(30, grid(&[1], 1.0)).unwrap_err(),
            StandardizeError::DuplicateInterval { interval: 30 }
        );
    }

    #[test]
    fn shapes_are_checked() {
        let err = ParameterGrid::new(
            vec![doy(1)],
            Array3::ones((1, 1, 2)),
            Array3::zeros((1, 1, 2)),
            Array3::ones((1, 2, 2)),
        )
        .unwrap_err();
        assert!(matches!(err, StandardizeError::ParameterShape { name: "scale", .. }));

        let wrong_grid = ParameterGrid::new(
            vec![doy(1)],
            Array3::ones((1, 3, 3)),
            Array3::zeros((1, 3, 3)),
            Array3::ones((1, 3, 3)),
        )
        .unwrap();
        let mut set = GammaParameterSet::new(coords());
        assert!(set.insert(7, wrong_grid).is_err());
    }

    #[test]
    fn invalid_pixel_params_are_none() {
        let g = ParameterGrid::new(
            vec![doy(5)],
            Array3::from_elem((1, 1, 2), f64::NAN),
            Array3::zeros((1, 1, 2)),
            Array3::ones((1, 1, 2)),
        )
        .unwrap();
        let set = GammaParameterSet::new(coords()).with_interval(7, g).unwrap();
        assert!(set.params_for(7, doy(5)).unwrap().at(0, 0).is_none());
    }
}
