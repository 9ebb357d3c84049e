use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{round1, DataPoint, Month};

pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/freeCodeCamp/ProjectReferenceData/master/global-temperature.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("an error has occurred: {status}")]
    Fetch { status: StatusCode },

    #[error("dataset request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("dataset body is not a valid dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("data point {index} is invalid: {reason}")]
    DataPoint { index: usize, reason: DataPointError },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataPointError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("month {0} is outside 1..=12")]
    MonthOutOfRange(i64),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataset {
    base_temperature: f64,
    monthly_variance: Vec<RawDataPoint>,
}

#[derive(Deserialize)]
struct RawDataPoint {
    year: Option<i32>,
    month: Option<i64>,
    variance: Option<f64>,
}

impl RawDataPoint {
    fn validate(self) -> Result<DataPoint, DataPointError> {
        let year = self.year.ok_or(DataPointError::MissingField("year"))?;
        let month = self.month.ok_or(DataPointError::MissingField("month"))?;
        let variance = self
            .variance
            .ok_or(DataPointError::MissingField("variance"))?;

        let month = u8::try_from(month)
            .ok()
            .and_then(Month::from_number)
            .ok_or(DataPointError::MonthOutOfRange(month))?;

        Ok(DataPoint::new(year, month, variance))
    }
}

/// The monthly-variance dataset. Built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    base_temperature: f64,
    monthly_variance: Vec<DataPoint>,
}

impl Dataset {
    pub const fn new(base_temperature: f64, monthly_variance: Vec<DataPoint>) -> Self {
        Self {
            base_temperature,
            monthly_variance,
        }
    }

    /// Parse and validate a dataset body. A single bad point rejects the whole body.
    pub fn from_json(body: &str) -> Result<Self, LoadError> {
        let raw: RawDataset = serde_json::from_str(body)?;

        let monthly_variance = raw
            .monthly_variance
            .into_iter()
            .enumerate()
            .map(|(index, point)| {
                point
                    .validate()
                    .map_err(|reason| LoadError::DataPoint { index, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(raw.base_temperature, monthly_variance))
    }

    /// Read a local copy of the dataset.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let body = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json(&body)?;
        info!(
            path = %path.display(),
            points = dataset.len(),
            "dataset loaded from file"
        );
        Ok(dataset)
    }

    pub const fn base_temperature(&self) -> f64 {
        self.base_temperature
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.monthly_variance
    }

    pub fn len(&self) -> usize {
        self.monthly_variance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monthly_variance.is_empty()
    }

    /// Absolute temperature of a point, rounded to one decimal.
    pub fn temperature(&self, point: &DataPoint) -> f64 {
        round1(self.base_temperature + point.variance)
    }

    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.monthly_variance.iter().map(|point| point.year).min()?;
        let max = self.monthly_variance.iter().map(|point| point.year).max()?;
        Some((min, max))
    }

    pub fn variance_bounds(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let (min, max) = self.monthly_variance.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), point| (min.min(point.variance), max.max(point.variance)),
        );
        Some((min, max))
    }

    /// Distinct years in ascending order.
    pub fn distinct_years(&self) -> Vec<i32> {
        self.monthly_variance
            .iter()
            .map(|point| point.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Fetches the dataset over HTTP. One request, no retry.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    client: Client,
}

impl DatasetLoader {
    pub fn new() -> Result<Self, LoadError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub async fn load(&self, url: &str) -> Result<Dataset, LoadError> {
        info!(%url, "fetching dataset");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        debug!(%status, "dataset response received");
        if !status.is_success() {
            return Err(LoadError::Fetch { status });
        }

        let body = response.text().await?;
        let dataset = Dataset::from_json(&body)?;

        info!(
            points = dataset.len(),
            base_temperature = dataset.base_temperature(),
            "dataset loaded"
        );
        Ok(dataset)
    }
}

/// Convenience wrapper over [`DatasetLoader::load`] with a default client.
pub async fn load(url: &str) -> Result<Dataset, LoadError> {
    DatasetLoader::new()?.load(url).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SAMPLE: &str = r#"{
        "baseTemperature": 8.66,
        "monthlyVariance": [
            {"year": 1753, "month": 1, "variance": -1.366},
            {"year": 1753, "month": 2, "variance": -2.223},
            {"year": 1754, "month": 1, "variance": -0.5}
        ]
    }"#;

    // Answers exactly one request with the given status line and body.
    async fn serve_once(status_line: &'static str, body: &'static str) -> std::io::Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0_u8; 2048];
                let _ = socket.read(&mut request).await;
                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Ok(format!("http://{addr}/global-temperature.json"))
    }

    #[test]
    fn test_from_json_reads_camel_case_fields() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = Dataset::from_json(SAMPLE)?;

        assert!((dataset.base_temperature() - 8.66).abs() < f64::EPSILON);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.points()[1].month, Month::February);
        assert_eq!(dataset.year_bounds(), Some((1753, 1754)));
        assert_eq!(dataset.distinct_years(), vec![1753, 1754]);
        Ok(())
    }

    #[test]
    fn test_missing_top_level_field_is_parse_error() {
        let result = Dataset::from_json(r#"{"baseTemperature": 8.66}"#);
        assert!(matches!(result, Err(LoadError::Parse(_))));

        let result = Dataset::from_json(r#"{"monthlyVariance": []}"#);
        assert!(matches!(result, Err(LoadError::Parse(_))));

        let result = Dataset::from_json("not json");
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_incomplete_point_names_its_index() {
        let body = r#"{
            "baseTemperature": 8.66,
            "monthlyVariance": [
                {"year": 1753, "month": 1, "variance": -1.366},
                {"year": 1753, "variance": -2.223}
            ]
        }"#;

        match Dataset::from_json(body) {
            Err(LoadError::DataPoint { index, reason }) => {
                assert_eq!(index, 1);
                assert_eq!(reason, DataPointError::MissingField("month"));
            }
            other => panic!("expected a data point error, got {other:?}"),
        }
    }

    #[test]
    fn test_month_out_of_range_is_rejected() {
        let body = r#"{"baseTemperature": 8.66, "monthlyVariance": [{"year": 1753, "month": 13, "variance": 0.1}]}"#;
        match Dataset::from_json(body) {
            Err(LoadError::DataPoint { index: 0, reason }) => {
                assert_eq!(reason, DataPointError::MonthOutOfRange(13));
            }
            other => panic!("expected a data point error, got {other:?}"),
        }
    }

    #[test]
    fn test_variance_beyond_f64_is_parse_error() {
        // JSON has no NaN or infinity; an overflowing literal is the closest a body gets.
        let body = r#"{"baseTemperature": 8.66, "monthlyVariance": [{"year": 1753, "month": 1, "variance": 1e400}]}"#;
        assert!(matches!(Dataset::from_json(body), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_bounds_on_empty_dataset() {
        let dataset = Dataset::new(8.66, Vec::new());
        assert!(dataset.is_empty());
        assert_eq!(dataset.year_bounds(), None);
        assert_eq!(dataset.variance_bounds(), None);
    }

    #[test]
    fn test_temperature_is_rounded_absolute_value() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = Dataset::from_json(SAMPLE)?;
        let point = dataset
            .points()
            .iter()
            .find(|point| point.year == 1753 && point.month == Month::January)
            .ok_or("missing January 1753")?;
        // 8.66 - 1.366 = 7.294
        assert!((dataset.temperature(point) - 7.3).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_from_file_reports_path_on_io_error() {
        let missing = Path::new("/definitely/not/here/global-temperature.json");
        match Dataset::from_file(missing) {
            Err(LoadError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected an io error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_file_reads_local_copy() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("global-temperature.json");
        std::fs::write(&path, SAMPLE)?;

        let dataset = Dataset::from_file(&path)?;
        assert_eq!(dataset.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_success() -> Result<(), Box<dyn std::error::Error>> {
        let url = serve_once("200 OK", SAMPLE).await?;
        let dataset = load(&url).await?;
        assert_eq!(dataset.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_non_success_status_is_fetch_error() -> Result<(), Box<dyn std::error::Error>> {
        let url = serve_once("404 Not Found", "{}").await?;
        match load(&url).await {
            Err(LoadError::Fetch { status }) => assert_eq!(status, StatusCode::NOT_FOUND),
            other => panic!("expected a fetch error, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_load_malformed_body_is_parse_error() -> Result<(), Box<dyn std::error::Error>> {
        let url = serve_once("200 OK", "{\"baseTemperature\": ").await?;
        assert!(matches!(load(&url).await, Err(LoadError::Parse(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport_error() -> Result<(), Box<dyn std::error::Error>> {
        // Grab a free port, then close it so nothing is listening.
        let addr = TcpListener::bind("127.0.0.1:0").await?.local_addr()?;
        let url = format!("http://{addr}/global-temperature.json");
        assert!(matches!(load(&url).await, Err(LoadError::Transport(_))));
        Ok(())
    }
}
