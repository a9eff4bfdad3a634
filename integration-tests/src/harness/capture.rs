use serde_json::{Value, json};

pub const TIMESTAMP: &str = "2014-11-21T10:15:00.000Z";
pub const AGENT: &str = "es-node-1";

/// Builder for one captured transaction, as the capture agent publishes it.
#[derive(Debug, Clone)]
pub struct Capture {
    method: String,
    uri: String,
    timestamp: String,
    agent: String,
    response_time_ms: u64,
    headers: Vec<(String, String)>,
    request_body: String,
    code: u16,
    response_body: String,
}

impl Capture {
    pub fn new(method: &str, uri: &str) -> Self {
        Self {
            method: method.to_string(),
            uri: uri.to_string(),
            timestamp: TIMESTAMP.to_string(),
            agent: AGENT.to_string(),
            response_time_ms: 42,
            headers: vec![
                ("Host".to_string(), "search.local:9200".to_string()),
                ("User-Agent".to_string(), "curl/8.4.0".to_string()),
            ],
            request_body: String::new(),
            code: 200,
            response_body: "{}".to_string(),
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new("GET", uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new("POST", uri)
    }

    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = timestamp.to_string();
        self
    }

    pub fn agent(mut self, agent: &str) -> Self {
        self.agent = agent.to_string();
        self
    }

    pub fn response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = ms;
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.request_body = body.into();
        self
    }

    pub fn respond(mut self, code: u16, body: impl Into<String>) -> Self {
        self.code = code;
        self.response_body = body.into();
        self
    }

    pub fn request_raw(&self) -> String {
        let mut raw = format!("{} {} HTTP/1.1\r\n", self.method, self.uri);
        for (name, value) in &self.headers {
            raw.push_str(&format!("{name}: {value}\r\n"));
        }
        raw.push_str("\r\n");
        raw.push_str(&self.request_body);
        raw
    }

    pub fn response_raw(&self) -> String {
        format!(
            "HTTP/1.1 {} OK\r\nContent-Type: application/json; charset=UTF-8\r\nContent-Length: {}\r\n\r\n{}",
            self.code,
            self.response_body.len(),
            self.response_body
        )
    }

    pub fn to_json(&self) -> Value {
        json!({
            "@timestamp": self.timestamp,
            "responsetime": self.response_time_ms,
            "src_ip": "10.0.0.7",
            "src_port": 53122,
            "dst_ip": "10.0.0.1",
            "dst_port": 9200,
            "agent": self.agent,
            "http": {
                "host": "search.local:9200",
                "content_length": self.response_body.len(),
                "request": { "uri": self.uri, "method": self.method },
                "response": { "code": self.code }
            },
            "request_raw": self.request_raw(),
            "response_raw": self.response_raw()
        })
    }

    /// The record as bytes on the feed.
    pub fn payload(&self) -> Vec<u8> {
        self.to_json().to_string().into_bytes()
    }
}

/// NDJSON body with one index action per document.
pub fn bulk_request(index: &str, documents: usize) -> String {
    let mut body = String::new();
    for id in 0..documents {
        let action = json!({ "index": { "_index": index, "_id": id.to_string() } });
        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&json!({ "message": format!("line {id}") }).to_string());
        body.push('\n');
    }
    body
}

/// Bulk response with one item per `(index, error)` pair.
pub fn bulk_response(items: &[(&str, Option<&str>)]) -> String {
    let items: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(id, (index, error))| {
            let mut result = json!({ "_index": index, "_id": id.to_string(), "status": 201 });
            if let Some(error) = error {
                result["status"] = json!(400);
                result["error"] = json!(error);
            }
            json!({ "index": result })
        })
        .collect();

    let errors = items.iter().any(|item| item["index"].get("error").is_some());

    json!({ "took": 7, "errors": errors, "items": items }).to_string()
}
