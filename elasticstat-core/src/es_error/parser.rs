use crate::es_error::{ElasticsearchError, ExceptionNode, TraceParseError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

pub const SEARCH_PHASE_EXCEPTION: &str = "SearchPhaseExecutionException";

/// Wrapper types that only re-throw their nested cause.
pub const DEFAULT_BORING_EXCEPTIONS: &[&str] =
    &["ElasticsearchException", "UncheckedExecutionException"];

const NESTED_SEPARATOR: &str = "; nested: ";

static SEARCH_PHASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<description>.*?); shardFailures (?P<details>.*)\]")
        .expect("search phase regex")
});

static SHARD_DETAILS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(?P<shard>\[.+?\]\[.+?\]\[.+?\]): (?P<detail>.*?); \}")
        .expect("shard details regex")
});

static DEFAULT_PARSER: Lazy<TraceParser> = Lazy::new(TraceParser::default);

/// Parses with the default boring set.
pub fn parse_elasticsearch_error(raw: &str) -> Result<ElasticsearchError, TraceParseError> {
    DEFAULT_PARSER.parse(raw)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceParser {
    boring: BTreeSet<String>,
}

impl Default for TraceParser {
    fn default() -> Self {
        Self::new(DEFAULT_BORING_EXCEPTIONS.iter().copied())
    }
}

impl TraceParser {
    pub fn new<I, S>(boring: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            boring: boring.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_boring(&self, name: &str) -> bool {
        self.boring.contains(name)
    }

    pub fn parse(&self, raw: &str) -> Result<ElasticsearchError, TraceParseError> {
        let (name, blob) = raw.split_once('[').ok_or(TraceParseError::MissingBracket)?;

        let mut error = ElasticsearchError {
            name: name.to_string(),
            ..ElasticsearchError::default()
        };

        if name != SEARCH_PHASE_EXCEPTION {
            error.detail = Some(strip_closing_bracket(blob).to_string());
            return Ok(error);
        }

        let captures =
            SEARCH_PHASE
                .captures(blob)
                .ok_or_else(|| TraceParseError::UnrecognizedFormat {
                    name: name.to_string(),
                })?;
        error.description = captures["description"].to_string();

        for shard in SHARD_DETAILS.captures_iter(&captures["details"]) {
            let chain = self.parse_chain(&shard["detail"])?;
            error.exceptions.insert(shard["shard"].to_string(), chain);
        }

        Ok(error)
    }

    /// Splits one shard's `Cause[..]; nested: Cause[..]` text into nodes,
    /// skipping boring wrappers.
    fn parse_chain(&self, detail: &str) -> Result<Vec<ExceptionNode>, TraceParseError> {
        let mut chain = Vec::new();

        for cause in detail.split(NESTED_SEPARATOR) {
            let (name, rest) =
                cause
                    .split_once('[')
                    .ok_or_else(|| TraceParseError::MalformedCause {
                        cause: cause.to_string(),
                    })?;

            if self.is_boring(name) {
                continue;
            }

            chain.push(ExceptionNode::new(name, strip_closing_bracket(rest)));
        }

        Ok(chain)
    }
}

fn strip_closing_bracket(text: &str) -> &str {
    text.strip_suffix(']').unwrap_or(text)
}
