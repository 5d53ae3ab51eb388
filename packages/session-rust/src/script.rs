//! JSON-lines action scripts.
//!
//! One [`EditorAction`] per line. Blank lines and lines starting with `#` are
//! ignored.

use std::io::BufRead;

use tracing::debug;

use crate::session::{EditorAction, EditorSession, SessionError};

/// A script failure, tagged with the 1-based line it occurred on.
#[derive(Debug, thiserror::Error)]
#[error("script line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: SessionError,
}

/// Parses one script line. Returns `None` for blank and comment lines.
///
/// # Errors
///
/// Returns [`SessionError::Json`] if the line is not a valid action.
pub fn parse_line(line: &str) -> Result<Option<EditorAction>, SessionError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

/// Applies every action read from `reader` to `session`, in order.
///
/// Stops at the first failing line. Returns the number of actions applied.
///
/// # Errors
///
/// Returns a [`ScriptError`] for read failures, malformed lines, and usage
/// errors raised by the session.
pub fn replay<R: BufRead>(session: &mut EditorSession, reader: R) -> Result<usize, ScriptError> {
    let mut applied = 0;
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let at_line = |source: SessionError| ScriptError {
            line: line_no,
            source,
        };

        let line = line.map_err(|err| at_line(err.into()))?;
        let Some(action) = parse_line(&line).map_err(at_line)? else {
            continue;
        };
        session.apply(action).map_err(at_line)?;
        applied += 1;
    }
    debug!(applied, "script replayed");
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use schema_builder_core::SchemaError;
    use serde_json::{json, Value};

    use super::*;

    const ADDRESS_SCRIPT: &str = r#"
# build an address block
{"action":"add_row"}
{"action":"set_name","path":[0],"name":"address"}
{"action":"set_type","path":[0],"type_id":"nested"}
{"action":"add_row","parent":[0]}
{"action":"set_name","path":[0,0],"name":"city"}
{"action":"set_type","path":[0,0],"type_id":"string"}
{"action":"set_required","path":[0,0],"required":true}
"#;

    #[test]
    fn parse_line_skips_blank_and_comments() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# note").unwrap(), None);
        assert_eq!(
            parse_line(r#"  {"action":"remove_row","path":[2]}  "#).unwrap(),
            Some(EditorAction::RemoveRow { path: vec![2] })
        );
    }

    #[test]
    fn replay_builds_preview() {
        let mut session = EditorSession::default();
        let applied = replay(&mut session, Cursor::new(ADDRESS_SCRIPT)).unwrap();

        assert_eq!(applied, 7);
        assert_eq!(
            Value::Object(session.preview().clone()),
            json!({ "address": { "city": "STRING" } })
        );
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let script = "{\"action\":\"add_row\"}\n\n{\"action\":\"explode\"}\n";
        let mut session = EditorSession::default();
        let err = replay(&mut session, Cursor::new(script)).unwrap_err();

        assert_eq!(err.line, 3);
        assert!(matches!(err.source, SessionError::Json(_)));
        assert_eq!(session.tree().len(), 1);
    }

    #[test]
    fn usage_error_reports_line_number() {
        let script = "{\"action\":\"add_row\",\"index\":1}\n";
        let mut session = EditorSession::default();
        let err = replay(&mut session, Cursor::new(script)).unwrap_err();

        assert_eq!(err.line, 1);
        assert!(matches!(
            err.source,
            SessionError::Schema(SchemaError::IndexOutOfBounds { index: 1, len: 0 })
        ));
        assert!(err.to_string().starts_with("script line 1: "));
    }

    #[test]
    fn replay_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ADDRESS_SCRIPT.as_bytes()).unwrap();
        file.write_all(b"{\"action\":\"set_type\",\"path\":[0],\"type_id\":\"boolean\"}\n")
            .unwrap();
        file.flush().unwrap();

        let reader = std::io::BufReader::new(std::fs::File::open(file.path()).unwrap());
        let mut session = EditorSession::default();
        assert_eq!(replay(&mut session, reader).unwrap(), 8);
        assert_eq!(
            Value::Object(session.preview().clone()),
            json!({ "address": "boolean" })
        );
        assert_eq!(session.tree().node_count(), 1);
    }
}
