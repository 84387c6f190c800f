//! Parse trace lines into [`BusinessProcess`]es.
//!
//! Each non-blank line is a JSON object:
//!
//! ```text
//! {"id": "bp-1", "start": 1200, "ops": [{"name": "read", "latency_ms": 2}]}
//! ```

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::TraceError;
use crate::process::{BusinessProcess, Operation, OperationExecutor};

/// Raw shape of one trace line.
#[derive(Debug, Deserialize)]
struct TraceRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, alias = "start_ms", alias = "start_offset_ms")]
    start: i64,
    #[serde(default, alias = "operations")]
    ops: Vec<Operation>,
}

/// Whether a line carries no process (blank or `#` comment).
pub fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse one trace line. `line_no` is 1-based and only used in errors.
///
/// Missing ids are replaced by a generated UUID.
pub fn parse_line(
    line: &str,
    line_no: usize,
    executor: Arc<dyn OperationExecutor>,
) -> Result<BusinessProcess, TraceError> {
    let record: TraceRecord = serde_json::from_str(line.trim()).map_err(|e| TraceError::Parse {
        line: line_no,
        message: e.to_string(),
    })?;

    let id = record
        .id
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Ok(BusinessProcess::new(id, record.start, record.ops, executor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::SimulatedExecutor;
    use crate::work::WorkItem;

    fn executor() -> Arc<dyn OperationExecutor> {
        Arc::new(SimulatedExecutor)
    }

    #[test]
    fn parses_full_record() {
        let bp = parse_line(
            r#"{"id":"bp-7","start":1200,"ops":[{"name":"read","latency_ms":2},{"name":"write","params":{"key":"k1"}}]}"#,
            1,
            executor(),
        )
        .unwrap();

        assert_eq!(bp.id(), "bp-7");
        assert_eq!(bp.start_offset_ms(), 1200);
        assert_eq!(bp.operations().len(), 2);
        assert_eq!(bp.operations()[0].latency_ms, 2);
        assert_eq!(bp.operations()[1].params["key"], "k1");
    }

    #[test]
    fn accepts_aliases() {
        let bp = parse_line(
            r#"{"id":"a","start_ms":-5,"operations":[{"name":"scan"}]}"#,
            1,
            executor(),
        )
        .unwrap();
        assert_eq!(bp.start_offset_ms(), -5);
        assert_eq!(bp.operations()[0].name, "scan");
    }

    #[test]
    fn missing_id_gets_uuid() {
        let bp = parse_line(r#"{"ops":[]}"#, 1, executor()).unwrap();
        assert!(Uuid::parse_str(bp.id()).is_ok());
        assert!(bp.operations().is_empty());
    }

    #[test]
    fn invalid_json_reports_line_number() {
        let err = parse_line("{not json", 42, executor()).unwrap_err();
        match err {
            TraceError::Parse { line, .. } => assert_eq!(line, 42),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(parse_line(r#""just text""#, 3, executor()).is_err());
    }

    #[test]
    fn skippable_lines() {
        assert!(is_skippable(""));
        assert!(is_skippable("   "));
        assert!(is_skippable("# header"));
        assert!(!is_skippable(r#"{"id":"x"}"#));
    }
}
