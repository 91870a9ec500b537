// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Detection of function log lines the SDK has already reported.
//!
//! When the SDK is active it captures warnings and errors itself. Forwarding
//! the matching stdout line as well would show them twice, so those lines are
//! recognised here and left out of the log payload.
//!
//! Without an active SDK nothing is captured. Otherwise two checks run in
//! order:
//!
//! 1. The runtime's default log layout (tab separated date, request id and
//!    level) with a warning or error level.
//! 2. A structured JSON logger line with a warning or error `level`. Only for
//!    runtimes whose layout opts in.
//!
//! Anything that fails to parse counts as not captured.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde_json::Value;

use crate::instrumentation::{Instrumentation, Runtime};
use crate::timestamp::parse_platform_time;

const MIN_COLUMNS: usize = 4;

/// Columns of a runtime's default log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumns<'a> {
    pub date: &'a str,
    pub request_id: &'a str,
    pub level: &'a str,
}

/// Parser for one runtime's default log line layout.
pub trait LineLayout: Send + Sync {
    /// `columns` always holds at least four tab separated fields.
    fn columns<'a>(&self, columns: &[&'a str]) -> LineColumns<'a>;

    /// Whether JSON logger output of this runtime can carry SDK-captured levels.
    fn supports_structured_logger(&self) -> bool {
        false
    }
}

/// `2024-01-01T00:00:00.000Z\t<request id>\tWARN\tmessage`
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeLayout;

impl LineLayout for NodeLayout {
    fn columns<'a>(&self, columns: &[&'a str]) -> LineColumns<'a> {
        LineColumns {
            date: columns[0],
            request_id: columns[1],
            level: columns[2],
        }
    }

    fn supports_structured_logger(&self) -> bool {
        true
    }
}

/// `[WARNING]\t2024-01-01T00:00:00.000Z\t<request id>\tmessage`
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonLayout;

impl LineLayout for PythonLayout {
    fn columns<'a>(&self, columns: &[&'a str]) -> LineColumns<'a> {
        let level = columns[0];
        let level = level.strip_prefix('[').unwrap_or(level);
        let level = level.strip_suffix(']').unwrap_or(level);
        LineColumns {
            date: columns[1],
            request_id: columns[2],
            level,
        }
    }
}

/// Runtime to layout lookup. Runtimes without an entry never match.
#[derive(Clone)]
pub struct LayoutRegistry {
    layouts: HashMap<Runtime, Arc<dyn LineLayout>>,
}

impl LayoutRegistry {
    pub fn empty() -> Self {
        LayoutRegistry {
            layouts: HashMap::new(),
        }
    }

    pub fn register(&mut self, runtime: Runtime, layout: Arc<dyn LineLayout>) {
        self.layouts.insert(runtime, layout);
    }

    pub fn get(&self, runtime: Runtime) -> Option<&dyn LineLayout> {
        self.layouts.get(&runtime).map(|layout| layout.as_ref())
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        let mut registry = LayoutRegistry::empty();
        registry.register(Runtime::Node, Arc::new(NodeLayout));
        registry.register(Runtime::Python, Arc::new(PythonLayout));
        registry
    }
}

impl std::fmt::Debug for LayoutRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutRegistry")
            .field("runtimes", &self.layouts.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    instrumentation: Instrumentation,
    registry: LayoutRegistry,
}

impl Classifier {
    pub fn new(instrumentation: Instrumentation, registry: LayoutRegistry) -> Self {
        Classifier {
            instrumentation,
            registry,
        }
    }

    /// Whether the SDK already reported this function log line.
    pub fn is_captured(&self, line: &str) -> bool {
        // nothing captures lines without an SDK
        if !self.instrumentation.is_active() {
            return false;
        }
        if let Some(columns) = self.default_columns(line) {
            if is_valid_date(columns.date)
                && is_valid_uuid(columns.request_id)
                && is_warn_or_error(columns.level)
            {
                return true;
            }
        }
        self.is_logger_warning_or_error(line)
    }

    fn layout(&self) -> Option<&dyn LineLayout> {
        self.registry.get(self.instrumentation.runtime())
    }

    fn default_columns<'a>(&self, line: &'a str) -> Option<LineColumns<'a>> {
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < MIN_COLUMNS {
            return None;
        }
        self.layout().map(|layout| layout.columns(&columns))
    }

    fn is_logger_warning_or_error(&self, line: &str) -> bool {
        if !self
            .layout()
            .is_some_and(|layout| layout.supports_structured_logger())
        {
            return false;
        }
        let Ok(Value::Object(object)) = serde_json::from_str::<Value>(line) else {
            return false;
        };
        match object.get("level") {
            None | Some(Value::Null) => false,
            Some(level) => is_warn_or_error(&logger_level(level)),
        }
    }
}

/// Maps a structured logger `level` onto the text levels used by log lines.
///
/// Numeric levels follow the pino scale: up to 30 is informational, up to 40
/// a warning, anything above an error.
pub fn logger_level(level: &Value) -> String {
    match level {
        Value::Number(number) => match number.as_f64() {
            Some(n) if n <= 30.0 => String::new(),
            Some(n) if n <= 40.0 => "WARN".to_string(),
            Some(_) => "ERROR".to_string(),
            None => number.to_string(),
        },
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn is_warn_or_error(level: &str) -> bool {
    matches!(level, "WARN" | "WARNING" | "ERROR")
}

/// Millisecond precision UTC timestamp, e.g. `2024-01-01T00:00:00.000Z`.
pub fn is_valid_date(date: &str) -> bool {
    parse_platform_time(date).is_some()
}

pub fn is_valid_uuid(value: &str) -> bool {
    static UUID_V4: OnceLock<Option<Regex>> = OnceLock::new();
    UUID_V4
        .get_or_init(|| {
            Regex::new(
                "^[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-4[a-fA-F0-9]{3}-[89aAbB][a-fA-F0-9]{3}-[a-fA-F0-9]{12}$",
            )
            .ok()
        })
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

#[cfg(test)]
mod tests {
    use duplicate::duplicate_item;
    use serde_json::json;

    use super::*;

    const REQUEST_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn classifier(active: bool, runtime: Runtime) -> Classifier {
        Classifier::new(
            Instrumentation::new(active, runtime),
            LayoutRegistry::default(),
        )
    }

    #[test]
    fn test_node_warning_is_captured() {
        let line = format!("2024-01-01T00:00:00.000Z\t{REQUEST_ID}\tWARN\tmessage");
        assert!(classifier(true, Runtime::Node).is_captured(&line));
    }

    #[test]
    fn test_node_info_is_not_captured() {
        let line = format!("2024-01-01T00:00:00.000Z\t{REQUEST_ID}\tINFO\tmessage");
        assert!(!classifier(true, Runtime::Node).is_captured(&line));
    }

    #[test]
    fn test_node_warning_without_sdk_is_not_captured() {
        let line = format!("2024-01-01T00:00:00.000Z\t{REQUEST_ID}\tERROR\tmessage");
        assert!(!classifier(false, Runtime::Node).is_captured(&line));
    }

    #[test]
    fn test_python_warning_is_captured() {
        let line = format!("[WARNING]\t2024-01-01T00:00:00.000Z\t{REQUEST_ID}\tmessage");
        assert!(classifier(true, Runtime::Python).is_captured(&line));
    }

    #[test]
    fn test_python_layout_on_node_line_is_not_captured() {
        let line = format!("2024-01-01T00:00:00.000Z\t{REQUEST_ID}\tWARN\tmessage");
        assert!(!classifier(true, Runtime::Python).is_captured(&line));
    }

    #[test]
    fn test_unknown_runtime_never_matches() {
        let line = format!("2024-01-01T00:00:00.000Z\t{REQUEST_ID}\tWARN\tmessage");
        assert!(!classifier(true, Runtime::Unknown).is_captured(&line));
        assert!(!classifier(true, Runtime::Unknown).is_captured(r#"{"level":"ERROR"}"#));
    }

    #[test]
    fn test_too_few_columns() {
        let line = format!("2024-01-01T00:00:00.000Z\t{REQUEST_ID}\tWARN");
        assert!(!classifier(true, Runtime::Node).is_captured(&line));
    }

    #[test]
    fn test_invalid_request_id() {
        let line = "2024-01-01T00:00:00.000Z\tnot-a-uuid\tWARN\tmessage";
        assert!(!classifier(true, Runtime::Node).is_captured(line));
    }

    #[duplicate_item(
        test_name                          line                                  expected;
        [test_logger_numeric_info]         [r#"{"level":30,"msg":"x"}"#]         [false];
        [test_logger_numeric_warn]         [r#"{"level":40,"msg":"x"}"#]         [true];
        [test_logger_numeric_error]        [r#"{"level":50,"msg":"x"}"#]         [true];
        [test_logger_float_warn]           [r#"{"level":35.5}"#]                 [true];
        [test_logger_string_warning]       [r#"{"level":"WARNING"}"#]            [true];
        [test_logger_string_debug]         [r#"{"level":"debug"}"#]              [false];
        [test_logger_null_level]           [r#"{"level":null}"#]                 [false];
        [test_logger_missing_level]        [r#"{"msg":"ERROR"}"#]                [false];
        [test_logger_not_json]             ["plain ERROR text"]                  [false];
        [test_logger_json_array]           [r#"[{"level":50}]"#]                 [false];
    )]
    #[test]
    fn test_name() {
        assert_eq!(classifier(true, Runtime::Node).is_captured(line), expected);
    }

    #[duplicate_item(
        test_name                                 line;
        [test_no_sdk_logger_error_not_captured]   [r#"{"level":50,"msg":"boom"}"#];
        [test_no_sdk_logger_warn_not_captured]    [r#"{"level":"WARN"}"#];
        [test_no_sdk_logger_string_not_captured]  [r#"{"level":"ERROR"}"#];
    )]
    #[test]
    fn test_name() {
        assert!(!classifier(false, Runtime::Node).is_captured(line));
        assert!(!classifier(false, Runtime::Python).is_captured(line));
    }

    #[test]
    fn test_logger_unsupported_for_python() {
        assert!(!classifier(true, Runtime::Python).is_captured(r#"{"level":50}"#));
    }

    #[test]
    fn test_logger_level_mapping() {
        assert_eq!(logger_level(&json!(10)), "");
        assert_eq!(logger_level(&json!(30)), "");
        assert_eq!(logger_level(&json!(31)), "WARN");
        assert_eq!(logger_level(&json!(40)), "WARN");
        assert_eq!(logger_level(&json!(60)), "ERROR");
        assert_eq!(logger_level(&json!("ERROR")), "ERROR");
        assert_eq!(logger_level(&json!(true)), "true");
    }

    #[test]
    fn test_is_valid_date() {
        assert!(is_valid_date("2024-01-01T00:00:00.000Z"));
        assert!(!is_valid_date("2024-01-01T00:00:00Z"));
        assert!(!is_valid_date("2024-01-01T00:00:00.000000Z"));
        assert!(!is_valid_date("2024-13-01T00:00:00.000Z"));
        assert!(!is_valid_date("yesterday"));
    }

    #[test]
    fn test_is_valid_uuid() {
        assert!(is_valid_uuid(REQUEST_ID));
        assert!(is_valid_uuid(&REQUEST_ID.to_uppercase()));
        // version nibble must be 4
        assert!(!is_valid_uuid("3fa85f64-5717-1562-b3fc-2c963f66afa6"));
        // variant nibble must be 8, 9, a or b
        assert!(!is_valid_uuid("3fa85f64-5717-4562-c3fc-2c963f66afa6"));
        assert!(!is_valid_uuid(""));
    }

    #[test]
    fn test_custom_layout_registration() {
        struct PipeLayout;
        impl LineLayout for PipeLayout {
            fn columns<'a>(&self, columns: &[&'a str]) -> LineColumns<'a> {
                LineColumns {
                    date: columns[3],
                    request_id: columns[2],
                    level: columns[1],
                }
            }
        }

        let mut registry = LayoutRegistry::empty();
        registry.register(Runtime::Unknown, Arc::new(PipeLayout));
        let classifier = Classifier::new(Instrumentation::new(true, Runtime::Unknown), registry);
        let line = format!("msg\tERROR\t{REQUEST_ID}\t2024-01-01T00:00:00.000Z");
        assert!(classifier.is_captured(&line));
    }
}
