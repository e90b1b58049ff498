//! Per-interval output datasets with decreasing latitude.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use drought_grid::{Field, GridCoords, flip_latitude, is_increasing};

use crate::error::IndexError;
use crate::kind::{IndexKind, Interval};
use crate::results::IndexResults;

/// Every index at one interval, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDataset {
    interval: Interval,
    reference_date: NaiveDate,
    coords: GridCoords,
    fields: BTreeMap<IndexKind, Field>,
}

impl OutputDataset {
    /// The interval of every field.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Analysis date the indices describe.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Grid axes, latitude decreasing.
    pub fn coords(&self) -> &GridCoords {
        &self.coords
    }

    /// The field of one index.
    pub fn field(&self, index: IndexKind) -> Option<&Field> {
        self.fields.get(&index)
    }

    /// Indices and fields in processing order.
    pub fn fields(&self) -> impl Iterator<Item = (IndexKind, &Field)> {
        self.fields.iter().map(|(&k, f)| (k, f))
    }

    /// File name of the dataset, e.g. `drought_indices_30d.nc`.
    pub fn file_name(&self) -> String {
        format!("drought_indices_{}d.nc", self.interval.days())
    }
}

/// Split the results into one dataset per interval: the 1-day snapshot
/// first, then `intervals` ascending.
///
/// When the latitude axis is increasing, every field's rows are reversed
/// with it so that latitude decreases.
///
/// # Errors
///
/// Returns [`IndexError::MissingResult`] if any index is absent at any
/// interval.
pub fn assemble_outputs(
    mut results: IndexResults,
    coords: &GridCoords,
    intervals: &[Interval],
    reference_date: NaiveDate,
) -> Result<Vec<OutputDataset>, IndexError> {
    let flip = is_increasing(coords.lats());
    let out_coords = if flip {
        coords.with_reversed_latitudes()
    } else {
        coords.clone()
    };

    let mut ordered = intervals.to_vec();
    ordered.sort();
    ordered.dedup();
    ordered.retain(|i| !i.is_one_day());
    ordered.insert(0, Interval::ONE_DAY);

    let mut datasets = Vec::with_capacity(ordered.len());
    for interval in ordered {
        let mut fields = BTreeMap::new();
        for index in IndexKind::ALL {
            let field = results
                .take(index, interval)
                .ok_or(IndexError::MissingResult { index, interval })?;
            let field = if flip { flip_latitude(&field) } else { field };
            fields.insert(index, field);
        }
        datasets.push(OutputDataset {
            interval,
            reference_date,
            coords: out_coords.clone(),
            fields,
        });
    }
    Ok(datasets)
}
