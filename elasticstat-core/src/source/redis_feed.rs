use crate::shutdown::Shutdown;
use crate::source::{Feed, FeedError, Publisher};
use redis::{Client, Connection, ErrorKind, PubSub, RedisError, RedisResult};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long one `BLPOP` blocks before shutdown is checked again.
pub const DEFAULT_POP_TIMEOUT: Duration = Duration::from_secs(1);

/// Consumer sleep when the subscription has nothing buffered.
pub const DEFAULT_IDLE_BACKOFF: Duration = Duration::from_millis(25);

/// Read timeout on the subscriber socket, so the reader thread notices
/// shutdown while the channel is quiet.
const SUBSCRIBER_READ_TIMEOUT: Duration = Duration::from_secs(1);

fn open_client(url: &str) -> Result<Client, FeedError> {
    Client::open(url).map_err(|e| FeedError::connect(url, e))
}

//-----------------------------------------------------------------------------
// List feed
//-----------------------------------------------------------------------------

/// Pops records off a Redis list with `BLPOP`.
pub struct RedisQueueFeed {
    client: Client,
    queue: String,
    pop_timeout: Duration,
    conn: Option<Connection>,
    shutdown: Shutdown,
}

impl RedisQueueFeed {
    /// Connects eagerly; failure here is fatal for the caller.
    pub fn connect(
        url: &str,
        queue: impl Into<String>,
        pop_timeout: Duration,
        shutdown: Shutdown,
    ) -> Result<Self, FeedError> {
        let client = open_client(url)?;
        let conn = client
            .get_connection()
            .map_err(|e| FeedError::connect(url, e))?;
        let queue = queue.into();

        tracing::info!(url, queue = %queue, "connected to queue feed");

        Ok(Self {
            client,
            queue,
            pop_timeout,
            conn: Some(conn),
            shutdown,
        })
    }

    /// `BLPOP` takes whole seconds and treats 0 as "forever".
    fn timeout_secs(&self) -> u64 {
        self.pop_timeout.as_secs().max(1)
    }
}

impl Feed for RedisQueueFeed {
    fn next_payload(&mut self) -> Result<Option<Vec<u8>>, FeedError> {
        let timeout = self.timeout_secs();
        let Self {
            client,
            queue,
            conn,
            shutdown,
            ..
        } = self;

        pop_next(
            conn,
            shutdown,
            || {
                let conn = client.get_connection()?;
                tracing::info!(queue = %queue, "reconnected to queue feed");
                Ok(conn)
            },
            |conn| {
                redis::cmd("BLPOP")
                    .arg(queue.as_str())
                    .arg(timeout)
                    .query::<Option<(String, Vec<u8>)>>(conn)
                    .map(|popped| popped.map(|(_, payload)| payload))
            },
        )
    }
}

/// Pops until a payload arrives or shutdown is requested.
///
/// A missing connection is reopened first. A failed pop drops the
/// connection, so the next call starts with a fresh one.
pub(crate) fn pop_next<C, O, P>(
    conn: &mut Option<C>,
    shutdown: &Shutdown,
    mut open: O,
    mut pop: P,
) -> Result<Option<Vec<u8>>, FeedError>
where
    O: FnMut() -> RedisResult<C>,
    P: FnMut(&mut C) -> RedisResult<Option<Vec<u8>>>,
{
    while !shutdown.is_requested() {
        if conn.is_none() {
            *conn = Some(open().map_err(FeedError::transport)?);
        }
        let Some(current) = conn.as_mut() else {
            continue;
        };

        match pop(current) {
            Ok(Some(payload)) => return Ok(Some(payload)),
            Ok(None) => continue,
            Err(e) => {
                *conn = None;
                return Err(FeedError::transport(e));
            }
        }
    }

    Ok(None)
}

//-----------------------------------------------------------------------------
// Pattern feed
//-----------------------------------------------------------------------------

pub(crate) type Delivery = RedisResult<Vec<u8>>;

/// Receives records published on every channel matching a glob pattern.
///
/// A dedicated thread owns the subscriber connection and forwards payloads
/// over a channel; [`Feed::next_payload`] polls it and sleeps
/// `idle_backoff` whenever nothing is buffered. If the reader thread dies,
/// the next poll resubscribes.
pub struct RedisPatternFeed {
    client: Client,
    pattern: String,
    idle_backoff: Duration,
    shutdown: Shutdown,
    deliveries: Receiver<Delivery>,
    reader: Option<JoinHandle<()>>,
}

impl RedisPatternFeed {
    /// Subscribes eagerly; failure here is fatal for the caller.
    pub fn connect(
        url: &str,
        pattern: impl Into<String>,
        idle_backoff: Duration,
        shutdown: Shutdown,
    ) -> Result<Self, FeedError> {
        let client = open_client(url)?;
        let pattern = pattern.into();
        let (deliveries, reader) =
            spawn_reader(&client, &pattern, &shutdown).map_err(|e| FeedError::connect(url, e))?;

        tracing::info!(url, pattern = %pattern, "subscribed to pattern feed");

        Ok(Self {
            client,
            pattern,
            idle_backoff,
            shutdown,
            deliveries,
            reader: Some(reader),
        })
    }
}

impl Feed for RedisPatternFeed {
    fn next_payload(&mut self) -> Result<Option<Vec<u8>>, FeedError> {
        let Self {
            client,
            pattern,
            idle_backoff,
            shutdown,
            deliveries,
            reader,
        } = self;

        poll_deliveries(deliveries, *idle_backoff, shutdown, || {
            resubscribe(client, pattern, shutdown, reader)
        })
    }
}

/// Drains `deliveries` until a payload arrives or shutdown is requested.
///
/// Sleeps `idle_backoff` while nothing is buffered. Once the reader side is
/// gone, `resubscribe` supplies a fresh receiver.
pub(crate) fn poll_deliveries<S>(
    deliveries: &mut Receiver<Delivery>,
    idle_backoff: Duration,
    shutdown: &Shutdown,
    mut resubscribe: S,
) -> Result<Option<Vec<u8>>, FeedError>
where
    S: FnMut() -> Result<Receiver<Delivery>, FeedError>,
{
    while !shutdown.is_requested() {
        match deliveries.try_recv() {
            Ok(Ok(payload)) => return Ok(Some(payload)),
            Ok(Err(e)) => return Err(FeedError::transport(e)),
            Err(TryRecvError::Empty) => {
                shutdown.sleep(idle_backoff);
            }
            Err(TryRecvError::Disconnected) => *deliveries = resubscribe()?,
        }
    }

    Ok(None)
}

fn resubscribe(
    client: &Client,
    pattern: &str,
    shutdown: &Shutdown,
    reader: &mut Option<JoinHandle<()>>,
) -> Result<Receiver<Delivery>, FeedError> {
    if let Some(previous) = reader.take() {
        let _ = previous.join();
    }

    let (deliveries, handle) =
        spawn_reader(client, pattern, shutdown).map_err(FeedError::transport)?;

    *reader = Some(handle);
    tracing::info!(pattern, "resubscribed to pattern feed");
    Ok(deliveries)
}

/// Starts a subscriber thread and waits until its `PSUBSCRIBE` succeeded.
fn spawn_reader(
    client: &Client,
    pattern: &str,
    shutdown: &Shutdown,
) -> RedisResult<(Receiver<Delivery>, JoinHandle<()>)> {
    let (tx, rx) = mpsc::channel::<Delivery>();
    let (ready_tx, ready_rx) = mpsc::sync_channel::<RedisResult<()>>(1);

    let client = client.clone();
    let pattern = pattern.to_string();
    let shutdown = shutdown.clone();

    let handle = thread::spawn(move || read_pattern(client, pattern, shutdown, tx, ready_tx));

    match ready_rx.recv() {
        Ok(Ok(())) => Ok((rx, handle)),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(RedisError::from((
            ErrorKind::IoError,
            "pattern reader exited before subscribing",
        ))),
    }
}

fn subscribe(pubsub: &mut PubSub<'_>, pattern: &str) -> RedisResult<()> {
    pubsub.psubscribe(pattern)?;
    pubsub.set_read_timeout(Some(SUBSCRIBER_READ_TIMEOUT))
}

fn read_pattern(
    client: Client,
    pattern: String,
    shutdown: Shutdown,
    tx: Sender<Delivery>,
    ready: SyncSender<RedisResult<()>>,
) {
    let mut conn = match client.get_connection() {
        Ok(conn) => conn,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    let mut pubsub = conn.as_pubsub();
    if let Err(e) = subscribe(&mut pubsub, &pattern) {
        let _ = ready.send(Err(e));
        return;
    }
    let _ = ready.send(Ok(()));

    while !shutdown.is_requested() {
        match pubsub.get_message() {
            Ok(msg) => {
                tracing::trace!(channel = msg.get_channel_name(), "message received");

                // Consumer gone: stop reading.
                if tx.send(Ok(msg.get_payload_bytes().to_vec())).is_err() {
                    break;
                }
            }
            Err(e) if e.is_timeout() => continue,
            Err(e) => {
                let _ = tx.send(Err(e));
                break;
            }
        }
    }
}

//-----------------------------------------------------------------------------
// Publisher
//-----------------------------------------------------------------------------

/// `PUBLISH`es payloads; reconnects lazily after a failure.
pub struct RedisPublisher {
    client: Client,
    conn: Option<Connection>,
}

impl RedisPublisher {
    pub fn connect(url: &str) -> Result<Self, FeedError> {
        let client = open_client(url)?;
        let conn = client
            .get_connection()
            .map_err(|e| FeedError::connect(url, e))?;

        Ok(Self {
            client,
            conn: Some(conn),
        })
    }
}

impl Publisher for RedisPublisher {
    fn publish(&mut self, channel: &str, payload: &[u8]) -> Result<(), FeedError> {
        if self.conn.is_none() {
            self.conn = Some(self.client.get_connection().map_err(FeedError::transport)?);
        }
        let Some(conn) = self.conn.as_mut() else {
            return Ok(());
        };

        let published = redis::cmd("PUBLISH")
            .arg(channel)
            .arg(payload)
            .query::<i64>(conn);

        match published {
            Ok(receivers) => {
                tracing::trace!(channel, receivers, "published");
                Ok(())
            }
            Err(e) => {
                self.conn = None;
                Err(FeedError::transport(e))
            }
        }
    }
}
