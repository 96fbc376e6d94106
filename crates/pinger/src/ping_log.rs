//! Append-only CSV log with one row per completed ping attempt.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::ERROR_MARKER;
use crate::error::LogError;
use crate::monitoring::ProbeOutcome;

/// `Date` column format
pub const DATE_FORMAT: &str = "%d-%m-%Y";
/// `Time` column format
pub const TIME_FORMAT: &str = "%H:%M:%S";

const HEADER: [&str; 5] = ["Ping Count", "Date", "Time", "Status Code", "Duration (ms)"];
const URL_COLUMN: &str = "URL";

/// One completed attempt, immutable once written
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub url: String,
    /// The target's ping count right after this attempt
    pub sequence_number: u64,
    pub at: DateTime<Local>,
    pub outcome: ProbeOutcome,
    pub duration_ms: u64,
}

impl LogRecord {
    fn fields(&self, include_url: bool) -> Vec<String> {
        let outcome = match &self.outcome {
            ProbeOutcome::Success(code) => code.to_string(),
            ProbeOutcome::Failure(_) => ERROR_MARKER.to_string(),
        };

        let mut fields = Vec::with_capacity(HEADER.len() + 1);
        if include_url {
            fields.push(self.url.clone());
        }
        fields.push(self.sequence_number.to_string());
        fields.push(self.at.format(DATE_FORMAT).to_string());
        fields.push(self.at.format(TIME_FORMAT).to_string());
        fields.push(outcome);
        fields.push(self.duration_ms.to_string());
        fields
    }
}

/// Format a timestamp the way the log's date and time columns read together
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    format!("{} {}", at.format(DATE_FORMAT), at.format(TIME_FORMAT))
}

/// The ping log store. It is the only writer to its file.
#[derive(Debug)]
pub struct PingLog {
    path: PathBuf,
    include_url: bool,
    /// Serializes appends so rows never interleave
    write_lock: Mutex<()>,
}

impl PingLog {
    /// `include_url` adds a leading URL column, used when several targets share the log
    pub fn new(path: impl Into<PathBuf>, include_url: bool) -> Self {
        Self { path: path.into(), include_url, write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> Vec<&'static str> {
        let mut header = Vec::with_capacity(HEADER.len() + 1);
        if self.include_url {
            header.push(URL_COLUMN);
        }
        header.extend(HEADER);
        header
    }

    /// Write the header if the store is missing or empty
    pub async fn initialize(&self) -> Result<(), LogError> {
        let _guard = self.write_lock.lock().await;
        if self.needs_header().await? {
            let bytes = encode_rows([self.header()])?;
            self.write_bytes(&bytes).await?;
            debug!("Initialized ping log at {}", self.path.display());
        }
        Ok(())
    }

    /// Append exactly one row, plus the header on first use
    pub async fn append(&self, record: &LogRecord) -> Result<(), LogError> {
        let row = record.fields(self.include_url);

        let _guard = self.write_lock.lock().await;
        let bytes = if self.needs_header().await? {
            let header: Vec<String> = self.header().into_iter().map(String::from).collect();
            encode_rows([header, row])?
        } else {
            encode_rows([row])?
        };

        self.write_bytes(&bytes).await
    }

    /// Full contents of the store; a store that does not exist yet exports as its header
    pub async fn export(&self) -> Result<Vec<u8>, LogError> {
        let _guard = self.write_lock.lock().await;
        match fs::read(&self.path).await {
            Ok(bytes) if !bytes.is_empty() => Ok(bytes),
            Ok(_) => Ok(encode_rows([self.header()])?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(encode_rows([self.header()])?),
            Err(source) => Err(self.io_error(source)),
        }
    }

    async fn needs_header(&self) -> Result<bool, LogError> {
        match fs::metadata(&self.path).await {
            Ok(metadata) => Ok(metadata.len() == 0),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
            Err(source) => Err(self.io_error(source)),
        }
    }

    async fn write_bytes(&self, bytes: &[u8]) -> Result<(), LogError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        file.write_all(bytes).await.map_err(|e| self.io_error(e))?;
        file.sync_data().await.map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> LogError {
        LogError::Io { path: self.path.clone(), source }
    }
}

fn encode_rows<I, R, F>(rows: I) -> Result<Vec<u8>, csv::Error>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::new(e.error().kind(), e.error().to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn record(url: &str, sequence_number: u64, outcome: ProbeOutcome, duration_ms: u64) -> LogRecord {
        LogRecord {
            url: url.to_string(),
            sequence_number,
            at: Local.with_ymd_and_hms(2025, 3, 7, 9, 5, 1).unwrap(),
            outcome,
            duration_ms,
        }
    }

    fn parse(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(bytes);
        let header = reader.headers().unwrap().iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (header, rows)
    }

    #[tokio::test]
    async fn test_first_append_writes_header() {
        let dir = tempdir().unwrap();
        let log = PingLog::new(dir.path().join("ping_logs.csv"), false);

        log.append(&record("https://a.example", 1, ProbeOutcome::Success(200), 87)).await.unwrap();

        let contents = fs::read_to_string(log.path()).await.unwrap();
        assert_eq!(
            contents,
            "Ping Count,Date,Time,Status Code,Duration (ms)\n1,07-03-2025,09:05:01,200,87\n"
        );
    }

    #[tokio::test]
    async fn test_failures_use_error_marker() {
        let dir = tempdir().unwrap();
        let log = PingLog::new(dir.path().join("ping_logs.csv"), true);

        log.append(&record("https://a.example", 3, ProbeOutcome::Failure("refused".into()), 0))
            .await
            .unwrap();

        let (header, rows) = parse(&log.export().await.unwrap());
        assert_eq!(header, ["URL", "Ping Count", "Date", "Time", "Status Code", "Duration (ms)"]);
        assert_eq!(rows, [["https://a.example", "3", "07-03-2025", "09:05:01", "Error", "0"]]);
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent_and_keeps_rows() {
        let dir = tempdir().unwrap();
        let log = PingLog::new(dir.path().join("ping_logs.csv"), false);

        log.initialize().await.unwrap();
        log.append(&record("https://a.example", 1, ProbeOutcome::Success(200), 5)).await.unwrap();
        log.initialize().await.unwrap();

        let (_, rows) = parse(&log.export().await.unwrap());
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_existing_store_is_appended_to() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ping_logs.csv");
        PingLog::new(&path, false)
            .append(&record("https://a.example", 1, ProbeOutcome::Success(200), 5))
            .await
            .unwrap();

        let reopened = PingLog::new(&path, false);
        reopened.append(&record("https://a.example", 2, ProbeOutcome::Success(200), 6)).await.unwrap();

        let (_, rows) = parse(&reopened.export().await.unwrap());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "2");
    }

    #[tokio::test]
    async fn test_export_of_missing_store_is_header_only() {
        let dir = tempdir().unwrap();
        let log = PingLog::new(dir.path().join("never_written.csv"), false);

        let bytes = log.export().await.unwrap();
        assert_eq!(bytes, b"Ping Count,Date,Time,Status Code,Duration (ms)\n");
    }

    #[tokio::test]
    async fn test_concurrent_appends_never_interleave() {
        let dir = tempdir().unwrap();
        let log = Arc::new(PingLog::new(dir.path().join("ping_logs.csv"), true));

        let mut tasks = Vec::new();
        for writer in 0..8 {
            let log = Arc::clone(&log);
            tasks.push(tokio::spawn(async move {
                let url = format!("https://target-{writer}.example");
                for seq in 1..=25 {
                    log.append(&record(&url, seq, ProbeOutcome::Success(200), seq)).await.unwrap();
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let (_, rows) = parse(&log.export().await.unwrap());
        assert_eq!(rows.len(), 8 * 25);
        for writer in 0..8 {
            let url = format!("https://target-{writer}.example");
            let sequence: Vec<u64> =
                rows.iter().filter(|r| r[0] == url).map(|r| r[1].parse().unwrap()).collect();
            assert_eq!(sequence, (1..=25).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn test_unwritable_store_reports_io_error() {
        let dir = tempdir().unwrap();
        let log = PingLog::new(dir.path().join("missing-dir").join("ping_logs.csv"), false);

        let err = log
            .append(&record("https://a.example", 1, ProbeOutcome::Success(200), 5))
            .await
            .unwrap_err();
        assert!(matches!(err, LogError::Io { .. }));
    }

    #[test]
    fn test_format_timestamp() {
        let at = Local.with_ymd_and_hms(2025, 12, 31, 23, 59, 58).unwrap();
        assert_eq!(format_timestamp(&at), "31-12-2025 23:59:58");
    }
}
