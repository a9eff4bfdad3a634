use crate::es_error::{ElasticsearchError, TraceParser};
use crate::filter::{DEFAULT_BULK_ENDPOINT, ErrorReport};
use crate::http::{count_ndjson_operations, split_slugs};
use crate::sink::{Reporter, Sink, SinkError};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::{BTreeMap, BTreeSet};

/// Exception type used when the error text does not follow the trace grammar.
pub const UNPARSED_EXCEPTION: &str = "ElasticsearchError";

const ERROR_FIELD: &str = "error";
const ERROR_TYPE_FIELD: &str = "type";
const ERROR_REASON_FIELD: &str = "reason";
const ENDPOINT_MARKER: char = '_';

/// What gets sent to the error tracker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEvent {
    pub exception_type: String,
    pub description: String,
    pub timestamp: String,
    pub tags: BTreeMap<String, String>,
    pub extra: BTreeMap<String, Value>,
}

/// Turns [`ErrorReport`]s into [`ErrorEvent`]s for a [`Reporter`].
pub struct ErrorReportSink<R> {
    reporter: R,
    parser: TraceParser,
    bulk_endpoint: String,
}

impl<R: Reporter> ErrorReportSink<R> {
    pub fn new(reporter: R, parser: TraceParser) -> Self {
        Self {
            reporter,
            parser,
            bulk_endpoint: DEFAULT_BULK_ENDPOINT.to_string(),
        }
    }

    pub fn with_bulk_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.bulk_endpoint = endpoint.into();
        self
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn build_event(&self, report: &ErrorReport) -> ErrorEvent {
        let mut extra = BTreeMap::new();
        let mut indices = path_indices(&report.request.path);

        let (exception_type, description) = match &report.response_json {
            Ok(body) => match body.get(ERROR_FIELD) {
                Some(Value::String(raw)) => match self.parser.parse(raw) {
                    Ok(parsed) => {
                        indices.extend(parsed.indices());
                        describe_parsed(parsed, &mut extra)
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "error text kept raw");
                        extra.insert("error".to_string(), json!(raw));
                        (UNPARSED_EXCEPTION.to_string(), raw.clone())
                    }
                },
                Some(Value::Object(error)) => {
                    extra.insert("error".to_string(), Value::Object(error.clone()));
                    (
                        string_or(error.get(ERROR_TYPE_FIELD), UNPARSED_EXCEPTION),
                        string_or(error.get(ERROR_REASON_FIELD), ""),
                    )
                }
                other => {
                    if let Some(other) = other {
                        extra.insert("error".to_string(), other.clone());
                    }
                    (format!("HTTP {}", report.code), String::new())
                }
            },
            Err(e) => {
                extra.insert("response_error".to_string(), json!(e.to_string()));
                (format!("HTTP {}", report.code), String::new())
            }
        };

        match &report.request_json {
            Ok(body) => {
                extra.insert("request_json".to_string(), body.clone());
            }
            // NDJSON is never one document; ship the raw body instead.
            Err(_) if report.request.path.ends_with(self.bulk_endpoint.as_str()) => {
                extra.insert(
                    "bulk_operations".to_string(),
                    json!(count_ndjson_operations(&report.request_body)),
                );
                extra.insert("request_body".to_string(), json!(report.request_body));
            }
            Err(_) if !report.request_body.is_empty() => {
                extra.insert("request_body".to_string(), json!(report.request_body));
            }
            Err(_) => {}
        }

        extra.insert("indices".to_string(), json!(indices));
        extra.insert("source_ip".to_string(), json!(report.source_ip));
        extra.insert("url".to_string(), json!(report.request.url));
        extra.insert("query_string".to_string(), json!(report.request.query_string));
        extra.insert("response_time_ms".to_string(), json!(report.response_time_ms));

        let tags = BTreeMap::from([
            ("method".to_string(), report.request.method.clone()),
            ("status".to_string(), report.code.to_string()),
            ("agent".to_string(), report.agent.clone()),
        ]);

        ErrorEvent {
            exception_type,
            description,
            timestamp: report.timestamp.clone(),
            tags,
            extra,
        }
    }
}

impl<R: Reporter> Sink<ErrorReport> for ErrorReportSink<R> {
    fn emit(&mut self, report: &ErrorReport) -> Result<(), SinkError> {
        let event = self.build_event(report);
        self.reporter.report(&event)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.reporter.flush()
    }
}

fn describe_parsed(
    parsed: ElasticsearchError,
    extra: &mut BTreeMap<String, Value>,
) -> (String, String) {
    let description = match parsed.detail {
        Some(detail) if parsed.description.is_empty() => detail,
        Some(detail) => {
            extra.insert("detail".to_string(), json!(detail));
            parsed.description
        }
        None => parsed.description,
    };

    if !parsed.exceptions.is_empty() {
        extra.insert("exceptions".to_string(), json!(parsed.exceptions));
    }

    (parsed.name, description)
}

/// Indices named by the request path: the first slug, unless it is an
/// endpoint, split on commas.
fn path_indices(path: &str) -> BTreeSet<String> {
    split_slugs(path)
        .first()
        .filter(|slug| !slug.starts_with(ENDPOINT_MARKER))
        .map(|slug| {
            slug.split(',')
                .filter(|index| !index.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn string_or(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}
