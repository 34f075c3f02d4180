//! Client Session
//!
//! One connection, two threads:
//!
//! - the **sender** (the calling thread) writes `request_count` Submits,
//!   pacing them, then shuts the session down;
//! - the **receiver** reads SubmitAcks with a bounded read deadline and
//!   reports each one to the session's observer.
//!
//! ## Lifecycle
//! ```text
//!   Running ──(quota sent or send failed)──▶ ShuttingDown ──(ack seen)──▶ Closed
//! ```
//!
//! The sender owns the connection. It never releases it before the receiver
//! has acknowledged the shutdown signal (or has provably exited), so no
//! read can run on a closed socket.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use crossbeam::channel::Sender;

use super::shutdown::{shutdown_pair, ShutdownListener};
use crate::config::Config;
use crate::error::{AckwireError, Result};
use crate::frame::FrameCodec;
use crate::packet::{decode_packet, encode_packet, format_id, Packet, Submit, SubmitAck};
use crate::payload::{PayloadSource, RandomWords};

/// Receives every SubmitAck the session reads
pub trait AckObserver: Send + 'static {
    fn on_ack(&mut self, ack: &SubmitAck);
}

/// Forwards acks to a channel; a closed channel is ignored
impl AckObserver for Sender<SubmitAck> {
    fn on_ack(&mut self, ack: &SubmitAck) {
        let _ = self.send(ack.clone());
    }
}

/// Logs each ack at info level
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    session: usize,
}

impl LogObserver {
    pub fn new(session: usize) -> Self {
        Self { session }
    }
}

impl AckObserver for LogObserver {
    fn on_ack(&mut self, ack: &SubmitAck) {
        tracing::info!(
            "[client {}]: the result of submit ack[{}] is {}",
            self.session,
            ack.id_str(),
            ack.result
        );
    }
}

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Both threads active
    Running,

    /// Sender has signaled, waiting for the receiver's ack
    ShuttingDown,

    /// Receiver acknowledged, connection released
    Closed,
}

/// Outcome of a session that shut down cleanly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    /// Session number, used in logs
    pub session: usize,

    /// Submits written
    pub sent: u64,

    /// SubmitAcks received before shutdown
    pub acked: u64,

    /// Always `Closed` for a report; kept so callers can assert it
    pub state: SessionState,
}

/// A client connection running the send/receive pair
pub struct ClientSession<P = RandomWords, O = LogObserver> {
    session: usize,
    stream: TcpStream,
    codec: FrameCodec,
    request_count: u64,
    pacing: Duration,
    read_timeout: Duration,
    payloads: P,
    observer: O,
}

impl ClientSession {
    /// Connect to `config.server_addr`
    pub fn connect(config: &Config, session: usize) -> Result<Self> {
        let stream = TcpStream::connect(&config.server_addr)?;
        tracing::debug!("[client {}]: dial ok", session);
        Self::from_stream(stream, config, session)
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream, config: &Config, session: usize) -> Result<Self> {
        config.validate()?;
        stream.set_nodelay(true)?;

        Ok(Self {
            session,
            stream,
            codec: FrameCodec::new(config.max_frame_size),
            request_count: config.request_count,
            pacing: config.pacing_interval(),
            read_timeout: config.read_timeout(),
            payloads: RandomWords::default(),
            observer: LogObserver::new(session),
        })
    }
}

impl<P, O> ClientSession<P, O> {
    /// Replace the payload source
    pub fn with_payloads<Q: PayloadSource>(self, payloads: Q) -> ClientSession<Q, O> {
        ClientSession {
            session: self.session,
            stream: self.stream,
            codec: self.codec,
            request_count: self.request_count,
            pacing: self.pacing,
            read_timeout: self.read_timeout,
            payloads,
            observer: self.observer,
        }
    }

    /// Replace the ack observer
    pub fn with_observer<T: AckObserver>(self, observer: T) -> ClientSession<P, T> {
        ClientSession {
            session: self.session,
            stream: self.stream,
            codec: self.codec,
            request_count: self.request_count,
            pacing: self.pacing,
            read_timeout: self.read_timeout,
            payloads: self.payloads,
            observer,
        }
    }
}

impl<P: PayloadSource, O: AckObserver> ClientSession<P, O> {
    /// Run the session to completion (blocking)
    ///
    /// Returns the first fatal error in this order of precedence: a send
    /// failure, a receiver failure, a missing shutdown acknowledgment.
    pub fn run(self) -> Result<SessionReport> {
        let ClientSession {
            session,
            stream,
            codec,
            request_count,
            pacing,
            read_timeout,
            mut payloads,
            observer,
        } = self;

        let read_stream = stream.try_clone()?;
        // Bounded deadline: the receiver's only chance to see the cancel signal
        read_stream.set_read_timeout(Some(read_timeout))?;

        let (trigger, listener) = shutdown_pair();
        let receiver = thread::Builder::new()
            .name(format!("session-{}-recv", session))
            .spawn(move || receive_loop(session, read_stream, codec, observer, listener))?;

        let mut writer = BufWriter::new(stream);
        let mut state = SessionState::Running;
        let mut sent = 0;
        let send_result = send_loop(
            session,
            &mut writer,
            &codec,
            request_count,
            pacing,
            &mut payloads,
            &mut sent,
        );

        transition(session, &mut state, SessionState::ShuttingDown);
        let handshake = trigger.signal_and_wait();

        // The receiver has acknowledged (or its half is gone); joining makes
        // sure it has fully returned before the socket is closed.
        let received = receiver.join().unwrap_or_else(|_| {
            tracing::error!("[client {}]: receiver thread panicked", session);
            Err(AckwireError::SessionAborted)
        });

        drop(writer);
        if handshake.is_ok() {
            transition(session, &mut state, SessionState::Closed);
        }

        send_result?;
        let acked = received?;
        handshake?;

        tracing::info!("[client {}] exit ok ({} sent, {} acked)", session, sent, acked);
        Ok(SessionReport {
            session,
            sent,
            acked,
            state,
        })
    }
}

fn transition(session: usize, state: &mut SessionState, next: SessionState) {
    tracing::debug!("[client {}]: {:?} -> {:?}", session, state, next);
    *state = next;
}

/// Write `request_count` Submits with IDs 00000001, 00000002, ...
fn send_loop<P: PayloadSource>(
    session: usize,
    writer: &mut BufWriter<TcpStream>,
    codec: &FrameCodec,
    request_count: u64,
    pacing: Duration,
    payloads: &mut P,
    sent: &mut u64,
) -> Result<()> {
    for counter in 1..=request_count {
        let submit = Submit::new(format_id(counter), payloads.next_payload());
        let packet = encode_packet(&Packet::Submit(submit.clone()))?;

        tracing::debug!(
            "[client {}]: send submit id = {}, payload = {}, frame length = {}",
            session,
            submit.id_str(),
            String::from_utf8_lossy(&submit.payload),
            packet.len() + 4
        );

        if let Err(e) = codec.encode(writer, &packet) {
            tracing::error!("[client {}]: send failed: {}", session, e);
            return Err(e);
        }
        *sent = counter;

        thread::sleep(pacing);
    }
    Ok(())
}

/// Read acks until the shutdown signal is seen or the connection breaks
///
/// Acknowledges shutdown only on the clean path. On error the listener is
/// dropped instead, which the sender sees as `SessionAborted`.
fn receive_loop<O: AckObserver>(
    session: usize,
    stream: TcpStream,
    codec: FrameCodec,
    mut observer: O,
    listener: ShutdownListener,
) -> Result<u64> {
    let mut reader = BufReader::new(stream);
    let mut acked = 0;

    loop {
        if listener.is_requested() {
            tracing::debug!("[client {}]: receiver stopping after {} acks", session, acked);
            drop(reader);
            listener.acknowledge();
            return Ok(acked);
        }

        // A peer stalled mid-frame must not hold the receiver past shutdown
        let payload = match codec.decode_until(&mut reader, || listener.is_requested()) {
            Ok(payload) => payload,
            Err(e) if e.is_timeout() => continue,
            Err(AckwireError::Cancelled { consumed }) => {
                tracing::debug!(
                    "[client {}]: abandoned partial frame after {} bytes",
                    session,
                    consumed
                );
                continue;
            }
            Err(e) => {
                tracing::error!("[client {}]: receive failed: {}", session, e);
                return Err(e);
            }
        };

        match decode_packet(&payload) {
            Ok(Some(Packet::SubmitAck(ack))) => {
                observer.on_ack(&ack);
                acked += 1;
            }
            Ok(other) => {
                let e = AckwireError::UnexpectedPacket(format!(
                    "expected SubmitAck, got {:?}",
                    other.map(|p| p.command_id())
                ));
                tracing::error!("[client {}]: {}", session, e);
                return Err(e);
            }
            Err(e) => {
                tracing::error!("[client {}]: bad ack: {}", session, e);
                return Err(e);
            }
        }
    }
}
