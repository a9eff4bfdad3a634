use crate::filter::{UNKNOWN_ACTION, UserActivity};
use crate::sink::{Sink, SinkError};
use serde::Deserialize;
use std::io::Write;
use std::net::{TcpStream, UdpSocket};

const METRIC_NAMESPACE: &str = "action";
const UNKNOWN_METRIC: &str = "unknown";

/// Statsite speaks the statsd line protocol over TCP; plain statsd uses UDP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsdProtocol {
    #[default]
    Tcp,
    Udp,
}

/// A record carrying one timing sample.
pub trait Timed {
    fn metric_name(&self) -> &str;

    fn duration_ms(&self) -> u64;
}

impl Timed for UserActivity {
    fn metric_name(&self) -> &str {
        &self.action
    }

    fn duration_ms(&self) -> u64 {
        self.response_time_ms
    }
}

/// `action.<name>:<ms>|ms\n`
///
/// Characters the line protocol reserves are replaced, and the unknown
/// action becomes `unknown`.
pub fn timing_line(name: &str, duration_ms: u64) -> String {
    let name = if name == UNKNOWN_ACTION || name.is_empty() {
        UNKNOWN_METRIC.to_string()
    } else {
        name.chars()
            .map(|c| match c {
                ':' | '|' | '@' => '_',
                c if c.is_whitespace() => '_',
                c => c,
            })
            .collect()
    };

    format!("{METRIC_NAMESPACE}.{name}:{duration_ms}|ms\n")
}

enum Connection {
    Tcp(TcpStream),
    Udp(UdpSocket),
}

impl Connection {
    fn open(addr: &str, protocol: StatsdProtocol) -> std::io::Result<Self> {
        match protocol {
            StatsdProtocol::Tcp => TcpStream::connect(addr).map(Self::Tcp),
            StatsdProtocol::Udp => {
                let socket = UdpSocket::bind(("0.0.0.0", 0))?;
                socket.connect(addr)?;
                Ok(Self::Udp(socket))
            }
        }
    }

    fn send(&mut self, line: &str) -> std::io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.write_all(line.as_bytes()),
            Self::Udp(socket) => socket.send(line.as_bytes()).map(|_| ()),
        }
    }
}

/// Sends one timing per record to a statsd-compatible aggregator.
///
/// The connection is opened on first use and dropped after a failed send,
/// so the next record reconnects.
pub struct StatsdSink {
    addr: String,
    protocol: StatsdProtocol,
    conn: Option<Connection>,
}

impl StatsdSink {
    pub fn new(addr: impl Into<String>, protocol: StatsdProtocol) -> Self {
        Self {
            addr: addr.into(),
            protocol,
            conn: None,
        }
    }

    pub fn send_timing(&mut self, name: &str, duration_ms: u64) -> Result<(), SinkError> {
        let line = timing_line(name, duration_ms);

        let conn = match &mut self.conn {
            Some(conn) => conn,
            slot => {
                let conn = Connection::open(&self.addr, self.protocol).map_err(SinkError::io)?;
                tracing::debug!(
                    addr = %self.addr,
                    protocol = ?self.protocol,
                    "connected to statsd"
                );
                slot.insert(conn)
            }
        };

        if let Err(e) = conn.send(&line) {
            self.conn = None;
            return Err(SinkError::io(e));
        }

        Ok(())
    }
}

impl<R: Timed> Sink<R> for StatsdSink {
    fn emit(&mut self, record: &R) -> Result<(), SinkError> {
        self.send_timing(record.metric_name(), record.duration_ms())
    }
}
