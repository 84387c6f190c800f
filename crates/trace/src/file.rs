use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::error::TraceError;
use crate::parser::{is_skippable, parse_line};
use crate::process::{BusinessProcess, OperationExecutor};
use crate::source::TraceSource;

/// Trace read lazily from a file, one business process per line.
///
/// One line is read ahead so exhaustion is known before the next pull.
/// Lines are read as raw bytes; a line that is not valid UTF-8 is skipped
/// like any other malformed line.
pub struct FileTraceSource {
    path: PathBuf,
    reader: BufReader<File>,
    lookahead: Option<Vec<u8>>,
    /// 1-based number of the line held in `lookahead`.
    line_no: usize,
    record_measurements: bool,
    executor: Arc<dyn OperationExecutor>,
}

impl FileTraceSource {
    pub fn open(
        path: impl AsRef<Path>,
        record_measurements: bool,
        executor: Arc<dyn OperationExecutor>,
    ) -> Result<Self, TraceError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| TraceError::Open {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "opened trace");

        let mut source = Self {
            path,
            reader: BufReader::new(file),
            lookahead: None,
            line_no: 0,
            record_measurements,
            executor,
        };
        source.advance();
        Ok(source)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the next line into `lookahead`. An I/O error ends the trace.
    fn advance(&mut self) {
        let mut buf = Vec::new();
        self.lookahead = match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line_no += 1;
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                Some(buf)
            }
            Err(e) => {
                error!(
                    path = %self.path.display(),
                    line = self.line_no + 1,
                    error = %e,
                    "trace read failed, treating as end of trace"
                );
                None
            }
        };
    }
}

impl fmt::Debug for FileTraceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTraceSource")
            .field("path", &self.path)
            .field("line_no", &self.line_no)
            .field("record_measurements", &self.record_measurements)
            .field("exhausted", &self.lookahead.is_none())
            .finish()
    }
}

impl TraceSource for FileTraceSource {
    type Item = BusinessProcess;

    fn is_exhausted(&self) -> bool {
        self.lookahead.is_none()
    }

    fn next_item(&mut self) -> Option<BusinessProcess> {
        let bytes = self.lookahead.take()?;
        let line_no = self.line_no;
        self.advance();

        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(e) => {
                warn!(path = %self.path.display(), line = line_no, error = %e, "skipping trace line that is not valid UTF-8");
                return None;
            }
        };

        if is_skippable(&line) {
            return None;
        }

        match parse_line(&line, line_no, Arc::clone(&self.executor)) {
            Ok(bp) => Some(bp.with_measurements(self.record_measurements)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "skipping malformed trace line");
                None
            }
        }
    }
}
