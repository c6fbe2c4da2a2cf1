use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::delay::calculator::DelayBound;
use crate::domain::stream::priority::Priority;

/// Aggregate of a set of delay values, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// An empty input yields all-zero statistics.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in values {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return Summary::default();
        }

        Summary { count, mean: sum / count as f64, min, max }
    }
}

/// Statistics over the successfully computed delay bounds of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DelayStatistics {
    pub overall: Summary,
    pub per_priority: BTreeMap<Priority, Summary>,
    pub deadline_violations: usize,
}

impl DelayStatistics {
    pub fn from_bounds<'a>(bounds: impl IntoIterator<Item = &'a DelayBound>) -> Self {
        let mut by_priority: BTreeMap<Priority, Vec<f64>> = BTreeMap::new();
        let mut all = Vec::new();
        let mut deadline_violations = 0;

        for bound in bounds {
            all.push(bound.total);
            by_priority.entry(bound.priority).or_default().push(bound.total);
            if !bound.meets_deadline() {
                deadline_violations += 1;
            }
        }

        DelayStatistics {
            overall: Summary::from_values(all),
            per_priority: by_priority.into_iter().map(|(p, values)| (p, Summary::from_values(values))).collect(),
            deadline_violations,
        }
    }
}
