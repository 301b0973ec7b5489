use std::fmt;

use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};
use wasm_bindgen::JsValue;

#[derive(Debug)]
pub enum BridgeError {
    /// A platform audio-graph call was rejected.
    Audio { op: &'static str, message: String },
    /// A snapshot or config value failed to deserialize.
    Decode(DecodeError),
    /// A required global (`window`, `document`, the `Elm` namespace, ...) is absent.
    MissingGlobal { name: String },
    /// The element the UI should mount on does not exist.
    MissingElement { id: String },
}

#[derive(Debug)]
pub struct DecodeError {
    pub what: &'static str,
    pub message: String,
    /// 1-based position, only known for JSON input.
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl BridgeError {
    /// Wrap a rejected JS call, keeping the thrown value's text.
    pub fn js(op: &'static str, value: &JsValue) -> Self {
        let message = value.as_string().unwrap_or_else(|| format!("{value:?}"));
        BridgeError::Audio { op, message }
    }

    pub fn decode_json(what: &'static str, err: serde_json::Error) -> Self {
        BridgeError::Decode(DecodeError {
            what,
            message: err.to_string(),
            line: Some(err.line()).filter(|&l| l > 0),
            column: Some(err.column()).filter(|&c| c > 0),
        })
    }

    pub fn decode_js(what: &'static str, err: serde_wasm_bindgen::Error) -> Self {
        BridgeError::Decode(DecodeError {
            what,
            message: err.to_string(),
            line: None,
            column: None,
        })
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Audio { op, message } => write!(f, "Audio error in {op}: {message}"),
            BridgeError::Decode(e) => write!(f, "Decode error: {e}"),
            BridgeError::MissingGlobal { name } => write!(f, "Global '{name}' is not available"),
            BridgeError::MissingElement { id } => write!(f, "No element with id '{id}'"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(col)) => {
                write!(f, "invalid {} at line {line} column {col}: {}", self.what, self.message)
            }
            _ => write!(f, "invalid {}: {}", self.what, self.message),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<DecodeError> for BridgeError {
    fn from(e: DecodeError) -> Self {
        BridgeError::Decode(e)
    }
}

impl From<BridgeError> for JsValue {
    fn from(e: BridgeError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

/// Render a decode error as a diagnostic pointing into the JSON `source`.
///
/// Errors without a position (or non-decode errors) fall back to their
/// `Display` text.
pub fn render_report(source: &str, err: &BridgeError) -> String {
    let BridgeError::Decode(decode) = err else {
        return err.to_string();
    };
    let Some(offset) = byte_offset(source, decode.line, decode.column) else {
        return err.to_string();
    };
    let span = offset..(offset + 1).min(source.len()).max(offset);

    let mut buf = Vec::new();
    let written = Report::build(ReportKind::Error, span.clone())
        .with_config(
            Config::default()
                .with_color(false)
                .with_index_type(IndexType::Byte),
        )
        .with_message(format!("invalid {}", decode.what))
        .with_label(Label::new(span).with_message(&decode.message))
        .finish()
        .write(Source::from(source), &mut buf);

    match written {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => err.to_string(),
    }
}

/// Convert serde_json's 1-based line/column into a byte offset.
fn byte_offset(source: &str, line: Option<usize>, column: Option<usize>) -> Option<usize> {
    let (line, column) = (line?, column?);
    let mut offset = 0;
    for (i, text) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let col = column.saturating_sub(1).min(text.len());
            return Some(offset + col);
        }
        offset += text.len();
    }
    // serde_json reports EOF errors one line past the last newline
    Some(source.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_of_first_line() {
        assert_eq!(byte_offset("[1, 2]", Some(1), Some(3)), Some(2));
    }

    #[test]
    fn offset_of_later_line() {
        let src = "[\n  {\"id\": 1}\n]";
        // line 2, column 3 is the opening brace
        assert_eq!(byte_offset(src, Some(2), Some(3)), Some(4));
        assert_eq!(&src[4..5], "{");
    }

    #[test]
    fn offset_with_zero_column() {
        assert_eq!(byte_offset("[1]\n[2]", Some(2), Some(0)), Some(4));
    }

    #[test]
    fn report_with_zero_column() {
        let err = BridgeError::Decode(DecodeError {
            what: "snapshot",
            message: "trailing comma".into(),
            line: Some(1),
            column: Some(0),
        });
        let text = render_report("[1,]", &err);
        assert!(text.contains("invalid snapshot"), "got: {text}");
    }

    #[test]
    fn offset_without_position() {
        assert_eq!(byte_offset("[]", None, Some(1)), None);
    }

    #[test]
    fn report_mentions_message() {
        let src = "{\"id\": }";
        let err = serde_json::from_str::<serde_json::Value>(src)
            .map_err(|e| BridgeError::decode_json("snapshot", e))
            .unwrap_err();
        let text = render_report(src, &err);
        assert!(text.contains("invalid snapshot"), "got: {text}");
        assert!(text.contains("expected value"), "got: {text}");
    }

    #[test]
    fn report_falls_back_for_non_decode_errors() {
        let err = BridgeError::MissingElement { id: "app".into() };
        assert_eq!(render_report("", &err), "No element with id 'app'");
    }

    #[test]
    fn display_includes_position() {
        let err = BridgeError::Decode(DecodeError {
            what: "config",
            message: "expected `,`".into(),
            line: Some(2),
            column: Some(5),
        });
        assert_eq!(
            err.to_string(),
            "Decode error: invalid config at line 2 column 5: expected `,`"
        );
    }
}
