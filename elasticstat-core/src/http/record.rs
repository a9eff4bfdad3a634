use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// One transaction as published by the capture agent.
///
/// Field names follow the agent's wire format bit-for-bit. `http` is absent
/// (or `null`) for non-HTTP transactions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CapturedRecord {
    #[serde(rename = "@timestamp")]
    pub timestamp: String,

    /// Agents report fractional milliseconds; rounded to the nearest one.
    #[serde(rename = "responsetime", default, deserialize_with = "millis")]
    pub response_time_ms: u64,

    #[serde(default)]
    pub src_ip: String,

    #[serde(default)]
    pub src_port: u16,

    #[serde(default)]
    pub dst_ip: String,

    #[serde(default)]
    pub dst_port: u16,

    #[serde(default)]
    pub agent: String,

    #[serde(default)]
    pub http: Option<HttpMeta>,

    /// Full captured request, header block and body.
    #[serde(default)]
    pub request_raw: String,

    /// Full captured response, header block and body.
    #[serde(default)]
    pub response_raw: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HttpMeta {
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub content_length: Option<u64>,

    pub request: RequestMeta,

    pub response: ResponseMeta,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestMeta {
    pub uri: String,
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseMeta {
    pub code: u16,
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let ms = f64::deserialize(deserializer)?;
    if !ms.is_finite() || ms < 0.0 {
        return Err(D::Error::custom(format!("invalid responsetime {ms}")));
    }

    Ok(ms.round() as u64)
}
