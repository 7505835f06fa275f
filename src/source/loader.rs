//! CSV loading from local files and remote URLs.

use crate::error::PipelineError;
use crate::models::{Dataset, Record};
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Columns every source table must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = ["name", "province", "latitude", "longitude", "address"];

/// Where the restaurant table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    LocalFile(PathBuf),
    RemoteUrl(String),
}

impl DataSource {
    /// Interprets `http://` and `https://` locations as URLs, anything else as a path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::RemoteUrl(location.to_string())
        } else {
            DataSource::LocalFile(PathBuf::from(location))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::LocalFile(path) => write!(f, "{}", path.display()),
            DataSource::RemoteUrl(url) => write!(f, "{}", url),
        }
    }
}

/// Options for fetching a remote source.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Whether to show a spinner while downloading.
    pub show_progress: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            show_progress: true,
        }
    }
}

/// Reads the source once and parses it into a dataset.
pub async fn load_dataset(
    source: &DataSource,
    options: &FetchOptions,
) -> Result<Dataset, PipelineError> {
    let result = match source {
        DataSource::LocalFile(path) => File::open(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))
            .and_then(parse_csv),
        DataSource::RemoteUrl(url) => match fetch_remote(url, options).await {
            Ok(bytes) => parse_csv(bytes.as_slice()),
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(dataset) => {
            info!("Loaded {} records from {}", dataset.len(), source);
            Ok(dataset)
        }
        Err(e) => Err(PipelineError::DataUnavailable {
            location: source.to_string(),
            reason: format!("{:#}", e),
        }),
    }
}

/// Downloads the raw bytes of a remote table.
async fn fetch_remote(url: &str, options: &FetchOptions) -> Result<Vec<u8>> {
    info!("Fetching dataset: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(options.timeout_seconds))
        .build()
        .context("Failed to build HTTP client")?;

    let spinner = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(format!("Downloading {}", url));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let outcome: Result<Vec<u8>> = async {
        let response = client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                anyhow!("Request timed out after {}s", options.timeout_seconds)
            } else {
                anyhow!("Failed to fetch {}: {}", url, e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Server returned {} for {}", status, url);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read response body")?;
        Ok::<_, anyhow::Error>(bytes.to_vec())
    }
    .await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if let Ok(ref bytes) = outcome {
        debug!("Downloaded {} bytes", bytes.len());
    }
    outcome
}

/// Parses a comma-separated restaurant table. Header labels are trimmed;
/// cells missing from short rows are null.
pub fn parse_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers().context("Failed to read CSV header")?.clone();
    let columns = ColumnIndex::locate(&headers)?;

    let mut records = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let row_data = result.with_context(|| format!("Malformed CSV row {}", row + 1))?;
        records.push(columns.record(&row_data));
    }

    debug!("Parsed {} rows", records.len());
    Ok(Dataset::new(records))
}

/// Positions of the required columns within a header row.
struct ColumnIndex {
    name: usize,
    province: usize,
    latitude: usize,
    longitude: usize,
    address: usize,
}

impl ColumnIndex {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let position = |column: &str| {
            headers.iter().position(|h| h == column).ok_or_else(|| {
                anyhow!(
                    "Missing required column '{}' (found: {})",
                    column,
                    headers.iter().collect::<Vec<_>>().join(", ")
                )
            })
        };

        Ok(Self {
            name: position(REQUIRED_COLUMNS[0])?,
            province: position(REQUIRED_COLUMNS[1])?,
            latitude: position(REQUIRED_COLUMNS[2])?,
            longitude: position(REQUIRED_COLUMNS[3])?,
            address: position(REQUIRED_COLUMNS[4])?,
        })
    }

    fn record(&self, row: &StringRecord) -> Record {
        Record {
            name: text_cell(row, self.name),
            province: text_cell(row, self.province),
            latitude: numeric_cell(row, self.latitude),
            longitude: numeric_cell(row, self.longitude),
            address: text_cell(row, self.address),
        }
    }
}

/// Empty and whitespace-only cells are null. Other values are kept verbatim.
fn text_cell(row: &StringRecord, idx: usize) -> Option<String> {
    row.get(idx)
        .filter(|v| !v.trim().is_empty())
        .map(String::from)
}

/// Unparsable, NaN and infinite cells are null.
fn numeric_cell(row: &StringRecord, idx: usize) -> Option<f64> {
    row.get(idx)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
address , name,latitude,longitude , province,city
1 Main St,McDonald's,34.05,-118.24,CA,Los Angeles
,Taco Bell,not-a-number,-95.36,TX,Houston
9 Elm Rd,  ,NaN,,FL,Miami
2 Oak Ave, KFC ,inf,-1e999,OH,Columbus
";

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.com/data.csv"),
            DataSource::RemoteUrl("https://example.com/data.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("FastFoodRestaurants.csv"),
            DataSource::LocalFile(PathBuf::from("FastFoodRestaurants.csv"))
        );
    }

    #[test]
    fn test_parse_csv_trims_headers_and_nulls() {
        let dataset = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 4);

        let first = &dataset.records()[0];
        assert_eq!(first.name.as_deref(), Some("McDonald's"));
        assert_eq!(first.province.as_deref(), Some("CA"));
        assert_eq!(first.latitude, Some(34.05));
        assert_eq!(first.longitude, Some(-118.24));
        assert_eq!(first.address.as_deref(), Some("1 Main St"));

        let second = &dataset.records()[1];
        assert!(second.address.is_none());
        assert!(second.latitude.is_none());

        let third = &dataset.records()[2];
        assert!(third.name.is_none());
        assert!(third.latitude.is_none());
        assert!(third.longitude.is_none());
        assert_eq!(third.missing_cells(), 3);

        let fourth = &dataset.records()[3];
        assert_eq!(fourth.name.as_deref(), Some(" KFC "));
        assert!(fourth.latitude.is_none());
        assert!(fourth.longitude.is_none());
    }

    #[test]
    fn test_parse_csv_short_rows_are_null_cells() {
        let csv = "name,province,latitude,longitude,address
\
                   KFC,OH,39.9,-82.9,1 High St
\
                   Subway,CA,34.0
";
        let dataset = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);

        let short = &dataset.records()[1];
        assert_eq!(short.name.as_deref(), Some("Subway"));
        assert_eq!(short.latitude, Some(34.0));
        assert!(short.longitude.is_none());
        assert!(short.address.is_none());
        assert_eq!(crate::analysis::summary_metrics(&dataset).missing_values, 2);
    }

    #[test]
    fn test_parse_csv_header_only() {
        let dataset = parse_csv("name,province,latitude,longitude,address\n".as_bytes()).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let err = parse_csv("name,latitude,longitude,address\nA,1,2,x\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("province"));
    }

    #[tokio::test]
    async fn test_load_dataset_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = DataSource::LocalFile(file.path().to_path_buf());
        let dataset = load_dataset(&source, &FetchOptions::default()).await.unwrap();
        assert_eq!(dataset.len(), 4);
    }

    #[tokio::test]
    async fn test_load_dataset_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::LocalFile(dir.path().join("absent.csv"));

        let err = load_dataset(&source, &FetchOptions::default())
            .await
            .unwrap_err();
        match err {
            PipelineError::DataUnavailable { location, reason } => {
                assert!(location.ends_with("absent.csv"));
                assert!(reason.contains("Failed to open CSV file"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_parse_csv_ignores_extra_columns() {
        let dataset = parse_csv(include_str!("../../fixtures/restaurants.csv").as_bytes()).unwrap();
        assert_eq!(dataset.len(), 10);

        let last = &dataset.records()[9];
        assert_eq!(last.name.as_deref(), Some("Taco Bell"));
        assert_eq!(last.province.as_deref(), Some("TX"));
        assert!(last.location().is_none());
        assert!(last.address.is_none());
    }

    /// Serves one HTTP response on a local port and returns its URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/FastFoodRestaurants.csv", addr)
    }

    fn quiet() -> FetchOptions {
        FetchOptions {
            timeout_seconds: 5,
            show_progress: false,
        }
    }

    #[tokio::test]
    async fn test_load_dataset_remote_url() {
        let url = serve_once("200 OK", SAMPLE).await;
        let source = DataSource::parse(&url);
        assert!(matches!(source, DataSource::RemoteUrl(_)));

        let dataset = load_dataset(&source, &quiet()).await.unwrap();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.records()[0].name.as_deref(), Some("McDonald's"));
    }

    #[tokio::test]
    async fn test_load_dataset_remote_not_found() {
        let url = serve_once("404 Not Found", "missing").await;
        let source = DataSource::RemoteUrl(url.clone());

        match load_dataset(&source, &quiet()).await {
            Err(PipelineError::DataUnavailable { location, reason }) => {
                assert_eq!(location, url);
                assert!(reason.contains("404"));
            }
            other => panic!("unexpected result: {:?}", other.map(|d| d.len())),
        }
    }

    #[tokio::test]
    async fn test_load_dataset_remote_refused() {
        let source = DataSource::RemoteUrl("http://127.0.0.1:1/x.csv".to_string());

        match load_dataset(&source, &quiet()).await {
            Err(PipelineError::DataUnavailable { location, reason }) => {
                assert_eq!(location, "http://127.0.0.1:1/x.csv");
                assert!(reason.contains("Failed to fetch"));
            }
            other => panic!("unexpected result: {:?}", other.map(|d| d.len())),
        }
    }
}
