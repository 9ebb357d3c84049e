use std::fmt;

use chrono::Local;
use serde::Serialize;

use crate::bucket::ColorBucketer;
use crate::dataset::Dataset;

/// Headless overview of a loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub generated_at: String,
    pub base_temperature: f64,
    pub points: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub min_variance: Option<f64>,
    pub max_variance: Option<f64>,
    pub buckets: Vec<BucketCount>,
    pub overflow: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketCount {
    pub threshold: f64,
    pub color: String,
    pub count: usize,
}

impl DatasetSummary {
    pub fn build(dataset: &Dataset, bucketer: &ColorBucketer<'_>) -> Self {
        let mut buckets: Vec<BucketCount> = bucketer
            .table()
            .iter()
            .map(|(threshold, color)| BucketCount {
                threshold: *threshold,
                color: color.to_string(),
                count: 0,
            })
            .collect();

        let mut overflow = 0;
        for point in dataset.points() {
            let bucket = bucketer.bucket(dataset.base_temperature(), point.variance);
            if bucket.overflow {
                overflow += 1;
            }
            if let Some(entry) = buckets.get_mut(bucket.index) {
                entry.count += 1;
            }
        }

        let years = dataset.year_bounds();
        let variance = dataset.variance_bounds();

        Self {
            generated_at: Local::now().to_rfc3339(),
            base_temperature: dataset.base_temperature(),
            points: dataset.len(),
            first_year: years.map(|(first, _)| first),
            last_year: years.map(|(_, last)| last),
            min_variance: variance.map(|(min, _)| min),
            max_variance: variance.map(|(_, max)| max),
            buckets,
            overflow,
        }
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nGlobal Temperature Stats")?;
        writeln!(f, "========================")?;
        writeln!(f, "Data points: {}", self.points)?;
        writeln!(f, "Base temperature: {:.2}℃", self.base_temperature)?;

        if let (Some(first), Some(last)) = (self.first_year, self.last_year) {
            writeln!(f, "Years: {first} - {last}")?;
        }
        if let (Some(min), Some(max)) = (self.min_variance, self.max_variance) {
            writeln!(f, "Variance: {min:.3}℃ .. {max:.3}℃")?;
        }

        writeln!(f, "\nCells by bucket:")?;
        for bucket in &self.buckets {
            writeln!(
                f,
                "- <= {:>4.1}℃ {}: {}",
                bucket.threshold, bucket.color, bucket.count
            )?;
        }
        if self.overflow > 0 {
            writeln!(f, "(clamped above the hottest bucket: {})", self.overflow)?;
        }
        Ok(())
    }
}
