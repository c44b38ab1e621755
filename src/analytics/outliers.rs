//! Descriptive statistics and unusually large or small records.

use crate::record::Record;

/// How many standard deviations from the mean a record must be to count as
/// an outlier.
const OUTLIER_THRESHOLD: f64 = 2.0;

/// A record whose amount is far from the mean of its group.
#[derive(Debug, Clone, PartialEq)]
pub struct Outlier<'a> {
    pub record: &'a Record,
    /// The number of standard deviations the amount is from the mean,
    /// negative for amounts below the mean.
    pub z_score: f64,
}

/// Find the records whose amount is more than two population standard
/// deviations from the mean, largest deviation first.
///
/// Fewer than two records, or records that all have the same amount, have
/// no outliers.
pub fn find_outliers<'a>(records: &[&'a Record]) -> Vec<Outlier<'a>> {
    let Some(statistics) = SummaryStatistics::new(records) else {
        return Vec::new();
    };

    if statistics.count < 2 || statistics.std_dev == 0.0 {
        return Vec::new();
    }

    let mut outliers: Vec<Outlier> = records
        .iter()
        .map(|&record| Outlier {
            record,
            z_score: (record.amount() - statistics.mean) / statistics.std_dev,
        })
        .filter(|outlier| outlier.z_score.abs() > OUTLIER_THRESHOLD)
        .collect();

    outliers.sort_by(|a, b| {
        b.z_score
            .abs()
            .partial_cmp(&a.z_score.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    outliers
}

/// The count, mean, spread and maximum of a group of amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStatistics {
    pub count: usize,
    pub mean: f64,
    /// The population standard deviation.
    pub std_dev: f64,
    pub largest: f64,
}

impl SummaryStatistics {
    /// Describe the amounts of `records`, `None` if there are no records.
    pub fn new(records: &[&Record]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let count = records.len();
        let mean = records.iter().map(|record| record.amount()).sum::<f64>() / count as f64;
        let variance = records
            .iter()
            .map(|record| (record.amount() - mean).powi(2))
            .sum::<f64>()
            / count as f64;
        let largest = records
            .iter()
            .map(|record| record.amount())
            .fold(f64::MIN, f64::max);

        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            largest,
        })
    }
}
