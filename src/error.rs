use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error for the library. Each sub-taxonomy is produced by exactly
/// one layer: `AuthError` by the directory client, `ProtocolError` by the wire
/// codec, `TransportError` by the session transport and `ValidationError` by
/// the command builders. Nothing is retried; every error propagates to the
/// caller with enough context to reproduce the failure.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Failures from the cloud login / gateway enumeration call.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("login details incorrect; note these are case-sensitive")]
    InvalidCredentials,

    #[error("account is already signed in elsewhere")]
    IdInUse,

    #[error("service is under maintenance, try again later")]
    UnderMaintenance,

    #[error("client version no longer accepted by the service")]
    VersionTooOld,

    #[error("service asked us to retry later")]
    TryLater,

    #[error("service error (http status {status}): {msg}")]
    Service { status: u16, msg: String },

    #[error("unexpected gateway list envelope: {0}")]
    BadEnvelope(String),

    #[error("cloud request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Failures decoding an inbound frame. Unrecognized *enumeration* values
/// inside an otherwise well-formed payload are not errors; they decode to a
/// catch-all variant so the caller can still inspect the rest of the frame.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("server reported an unknown control type; restart the session to retry")]
    UnknownControlType,

    #[error("malformed response header (control type {tag})")]
    MalformedHeader { tag: u8 },

    #[error("response truncated: needed {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("malformed payload: {reason}")]
    MalformedPayload { reason: String },

    #[error("gateway reports no serial channels in use")]
    ChannelsUnavailable,

    #[error("{what} is not supported by this client yet")]
    NotYetSupported { what: &'static str },
}

/// Failures on the raw TCP session.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        source: std::io::Error,
    },

    #[error("{op} timed out after {secs}s")]
    Timeout { op: &'static str, secs: u64 },

    #[error("connection closed by server")]
    ConnectionClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures validating a control request before any frame is encoded.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("setpoint {requested} outside the advertised range [{min}, {max}]")]
    SetpointOutOfRange {
        requested: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid schedule time {hour:02}:{minute:02}")]
    BadScheduleTime { hour: u8, minute: u8 },

    #[error("day schedule already holds the maximum of {max} entries")]
    ScheduleFull { max: usize },

    #[error("channel does not advertise recirculation temperature limits")]
    RecirculationUnsupported,
}
