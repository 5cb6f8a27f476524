mod observation;

pub use observation::{format_count, format_decimal, Observation};

use std::collections::BTreeMap;

/// Date-ordered observation series for a single company
pub type ObservationSeries = Vec<Observation>;

/// Full catalog: company name -> its observation series
pub type ObservationCatalog = BTreeMap<String, ObservationSeries>;
