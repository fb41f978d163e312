use std::cmp::max;

/// Reported as the minimum of a series that has no positive duration.
pub const NO_MINIMUM: i64 = i64::MAX;

/// Durations (in milliseconds) observed for one key.
///
/// A duration of zero or less is what IIS logs for redirects and cached responses; it
/// counts as a request and takes part in `max` and `count_exceeding`, but is left out of
/// the average and the minimum.
#[derive(Clone, Debug, Default)]
pub struct DurationStats {
    durations: Vec<i64>,
    positive_sum: i128,
    positive_count: usize,
    max: i64,
    min_positive: Option<i64>,
}

impl DurationStats {
    pub fn new() -> Self { DurationStats::default() }

    pub fn observe(&mut self, duration: i64) {
        self.durations.push(duration);
        self.max = max(self.max, duration);
        if duration > 0 {
            self.positive_sum += i128::from(duration);
            self.positive_count += 1;
            self.min_positive = Some(self.min_positive.map_or(duration, |m| m.min(duration)));
        }
    }

    /// Folds all observations of `other` into this series.
    pub fn extend(&mut self, other: &DurationStats) {
        for &duration in &other.durations {
            self.observe(duration);
        }
    }

    pub fn count(&self) -> usize { self.durations.len() }

    /// Truncated mean of the positive durations, 0 if there are none.
    pub fn average(&self) -> i64 {
        if self.positive_count == 0 {
            0
        } else {
            // the mean of positive i64 values never exceeds their max
            let mean = self.positive_sum / self.positive_count as i128;
            i64::try_from(mean).unwrap_or(i64::MAX)
        }
    }

    pub fn max(&self) -> i64 { self.max }

    pub fn min(&self) -> i64 { self.min_positive.unwrap_or(NO_MINIMUM) }

    pub fn count_exceeding(&self, threshold: i64) -> usize {
        self.durations.iter().filter(|&&duration| duration > threshold).count()
    }

    pub fn summary(&self) -> Summary {
        let average = self.average();
        Summary {
            count: self.count(),
            average,
            over_average: self.count_exceeding(average),
            max: self.max(),
            min: self.min(),
        }
    }
}

/// One row's worth of numbers for a duration series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub average: i64,
    pub over_average: usize,
    pub max: i64,
    pub min: i64,
}
