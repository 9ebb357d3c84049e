use serde::Serialize;
use thiserror::Error;

use crate::color::Rgb;
use crate::domain::round1;

/// Ascending temperature cutoffs (°C) and the fill bound to each.
pub const HEAT_SCALE: [(f64, Rgb); 9] = [
    (3.9, Rgb::new(0x45, 0x75, 0xb4)),
    (5.0, Rgb::new(0x74, 0xad, 0xd1)),
    (6.1, Rgb::new(0xab, 0xd9, 0xe9)),
    (7.2, Rgb::new(0xe0, 0xf3, 0xf8)),
    (8.3, Rgb::new(0xff, 0xff, 0xbf)),
    (9.5, Rgb::new(0xfe, 0xe0, 0x90)),
    (10.6, Rgb::new(0xfd, 0xae, 0x61)),
    (11.7, Rgb::new(0xf4, 0x6d, 0x43)),
    (12.8, Rgb::new(0xd7, 0x30, 0x27)),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BucketError {
    #[error("bucket table is empty")]
    Empty,

    #[error("bucket thresholds must be strictly ascending (entry {0})")]
    NotAscending(usize),
}

/// Result of classifying one temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bucket {
    /// Position in the table, 0 = coldest.
    pub index: usize,
    pub threshold: f64,
    #[serde(serialize_with = "serialize_rgb")]
    pub color: Rgb,
    /// The temperature was above the hottest threshold and has been clamped.
    pub overflow: bool,
}

fn serialize_rgb<S: serde::Serializer>(color: &Rgb, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(color)
}

/// Maps absolute temperatures onto a fixed, ordered table of color buckets.
#[derive(Debug, Clone, Copy)]
pub struct ColorBucketer<'a> {
    table: &'a [(f64, Rgb)],
}

impl Default for ColorBucketer<'static> {
    fn default() -> Self {
        Self { table: &HEAT_SCALE }
    }
}

impl<'a> ColorBucketer<'a> {
    pub fn new(table: &'a [(f64, Rgb)]) -> Result<Self, BucketError> {
        if table.is_empty() {
            return Err(BucketError::Empty);
        }
        if let Some(index) = table
            .windows(2)
            .position(|pair| pair[0].0.partial_cmp(&pair[1].0) != Some(std::cmp::Ordering::Less))
        {
            return Err(BucketError::NotAscending(index + 1));
        }
        Ok(Self { table })
    }

    pub const fn table(&self) -> &'a [(f64, Rgb)] {
        self.table
    }

    pub const fn len(&self) -> usize {
        self.table.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Bucket for `base_temperature + variance`, rounded to one decimal first.
    pub fn bucket(&self, base_temperature: f64, variance: f64) -> Bucket {
        self.classify(round1(base_temperature + variance))
    }

    /// First bucket whose threshold the temperature does not exceed.
    /// Anything hotter than the last threshold clamps to the last bucket.
    pub fn classify(&self, temperature: f64) -> Bucket {
        let found = self
            .table
            .iter()
            .position(|(threshold, _)| temperature <= *threshold);

        let (index, overflow) = match found {
            Some(index) => (index, false),
            None => (self.table.len() - 1, true),
        };
        let (threshold, color) = self.table[index];

        Bucket {
            index,
            threshold,
            color,
            overflow,
        }
    }
}
