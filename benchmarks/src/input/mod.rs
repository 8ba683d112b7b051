use crate::error::{BenchmarkError, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

const CSV_HOSTNAME_FIELD: usize = 0;
const CSV_START_FIELD: usize = 1;
const CSV_END_FIELD: usize = 2;
const CSV_FIELD_COUNT: usize = 3;

/// One query invocation: a partition key and the inclusive time range to
/// aggregate over. Range bounds are passed through to the store verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub partition_key: String,
    pub range_start: String,
    pub range_end: String,
}

impl Task {
    pub fn new(
        partition_key: impl Into<String>,
        range_start: impl Into<String>,
        range_end: impl Into<String>,
    ) -> Self {
        Self {
            partition_key: partition_key.into(),
            range_start: range_start.into(),
            range_end: range_end.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` selects standard input, anything else is a file path.
    pub fn parse(value: &str) -> Self {
        if value == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(value))
        }
    }

    pub fn open(&self) -> Result<Box<dyn Read + Send>> {
        match self {
            InputSource::Stdin => Ok(Box::new(io::stdin())),
            InputSource::File(path) => {
                let file = File::open(path).map_err(|e| {
                    BenchmarkError::Input(io::Error::new(
                        e.kind(),
                        format!("Error when opening file {}: {}", path.display(), e),
                    ))
                })?;
                Ok(Box::new(file))
            }
        }
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Stdin => write!(f, "<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Streams [`Task`]s out of CSV input in file order.
///
/// The header row is validated and discarded on construction. Any malformed
/// record is yielded as an error; callers treat it as fatal.
pub struct TaskReader<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
}

impl<R: Read> TaskReader<R> {
    pub fn new(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers().map_err(malformed)?;
        if headers.is_empty() {
            return Err(BenchmarkError::MissingHeader);
        }
        if headers.len() != CSV_FIELD_COUNT {
            return Err(BenchmarkError::MalformedRecord {
                line: 1,
                reason: format!(
                    "expected {} header fields, found {}",
                    CSV_FIELD_COUNT,
                    headers.len()
                ),
            });
        }

        Ok(Self {
            records: csv_reader.into_records(),
        })
    }
}

impl<R: Read> Iterator for TaskReader<R> {
    type Item = Result<Task>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(malformed(e))),
        };

        if record.len() != CSV_FIELD_COUNT {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Some(Err(BenchmarkError::MalformedRecord {
                line,
                reason: format!(
                    "expected {} fields, found {}",
                    CSV_FIELD_COUNT,
                    record.len()
                ),
            }));
        }

        Some(Ok(Task::new(
            &record[CSV_HOSTNAME_FIELD],
            &record[CSV_START_FIELD],
            &record[CSV_END_FIELD],
        )))
    }
}

fn malformed(e: csv::Error) -> BenchmarkError {
    let line = e.position().map(|p| p.line()).unwrap_or_default();
    match e.into_kind() {
        csv::ErrorKind::Io(io_err) => BenchmarkError::Input(io_err),
        kind => BenchmarkError::MalformedRecord {
            line,
            reason: format!("{:?}", kind),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "hostname,start_time,end_time\n";

    fn read_all(input: &str) -> Result<Vec<Task>> {
        TaskReader::new(input.as_bytes())?.collect()
    }

    #[test]
    fn test_reads_tasks_in_order_and_skips_header() {
        let input = format!(
            "{}host_000008,2017-01-01 08:59:22,2017-01-01 09:59:22\n\
             host_000001,2017-01-02 13:02:02,2017-01-02 14:02:02\n",
            HEADER
        );

        let tasks = read_all(&input).unwrap();

        assert_eq!(
            tasks,
            vec![
                Task::new("host_000008", "2017-01-01 08:59:22", "2017-01-01 09:59:22"),
                Task::new("host_000001", "2017-01-02 13:02:02", "2017-01-02 14:02:02"),
            ]
        );
    }

    #[test]
    fn test_header_only_yields_no_tasks() {
        assert!(read_all(HEADER).unwrap().is_empty());
    }

    #[test]
    fn test_empty_input_is_missing_header() {
        assert!(matches!(read_all(""), Err(BenchmarkError::MissingHeader)));
    }

    #[test]
    fn test_wrong_field_count_is_fatal() {
        let input = format!("{}host_a,2017-01-01 08:59:22\n", HEADER);
        match read_all(&input) {
            Err(BenchmarkError::MalformedRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed record, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_header_is_fatal() {
        assert!(matches!(
            read_all("hostname,start_time\n"),
            Err(BenchmarkError::MalformedRecord { line: 1, .. })
        ));
    }

    #[test]
    fn test_range_bounds_pass_through_verbatim() {
        let input = format!("{}host_a,not a date,  also not  \n", HEADER);
        let tasks = read_all(&input).unwrap();
        assert_eq!(tasks[0].range_start, "not a date");
        assert_eq!(tasks[0].range_end, "  also not  ");
    }

    #[test]
    fn test_input_source_parse() {
        assert_eq!(InputSource::parse("-"), InputSource::Stdin);
        assert_eq!(
            InputSource::parse("queries.csv"),
            InputSource::File(PathBuf::from("queries.csv"))
        );
    }

    #[test]
    fn test_missing_file_is_input_error() {
        let source = InputSource::parse("/nonexistent/queries.csv");
        assert!(matches!(source.open(), Err(BenchmarkError::Input(_))));
    }
}
