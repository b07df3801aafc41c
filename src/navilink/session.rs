use crate::prelude::*;
use crate::navilink::packet::{Command, CommandFrame, Parser, Response};

use {
    net2::TcpStreamExt,
    std::time::Duration,
    tokio::io::{AsyncReadExt, AsyncWriteExt},
    tokio::net::TcpStream,
};

/// Default binary API endpoint; gateway records may advertise their own.
pub const SERVER_HOST: &str = "uscv2.naviensmartcontrol.com";
pub const SERVER_PORT: u16 = 6001;

/// Client tag the vendor app sends in the identity line.
const CLIENT_TAG: &str = "iPhone1.0";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const WRITE_TIMEOUT_SECS: u64 = 5;
const READ_TIMEOUT_SECS: u64 = 10;
const TCP_KEEPALIVE_SECS: u64 = 60;

/// The server answers each request with exactly one frame, well under this.
const RESPONSE_BUFFER_SIZE: usize = 1024;

// GatewayId {{{

/// The cloud hands out the gateway identifier as a hex string; the binary
/// protocol wants the same eight bytes raw at the head of every frame.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GatewayId([u8; 8]);

impl GatewayId {
    pub fn data(&self) -> [u8; 8] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl From<[u8; 8]> for GatewayId {
    fn from(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }
}

impl std::str::FromStr for GatewayId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| ProtocolError::MalformedPayload {
            reason: format!("gateway id {s:?} is not a hex string"),
        })?;
        let raw: [u8; 8] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ProtocolError::MalformedPayload {
                reason: format!("gateway id {s:?} must be exactly 8 bytes"),
            })?;
        Ok(Self(raw))
    }
}

impl std::fmt::Display for GatewayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for GatewayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

// }}}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
    Sending,
    AwaitingResponse,
}

/// One TCP connection to one gateway. Opened with an identity line, then
/// strictly one write / one bounded read per exchange; the server returns a
/// single frame per request and the codec infers its shape from content.
/// The socket closes when the session drops.
pub struct Session {
    stream: TcpStream,
    gateway: GatewayId,
    state: SessionState,
}

impl Session {
    /// Connect, announce ourselves and decode the greeting (normally the
    /// channel information frame).
    pub async fn connect(
        user_id: &str,
        gateway_hex: &str,
        host: &str,
        port: u16,
    ) -> Result<(Self, Response)> {
        let gateway: GatewayId = gateway_hex.parse()?;

        info!("gateway {gateway}: connecting to {host}:{port}");
        let stream = match tokio::time::timeout(
            Duration::from_secs(CONNECT_TIMEOUT_SECS),
            TcpStream::connect((host, port)),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(TransportError::Connect {
                    host: host.to_string(),
                    port,
                    source,
                }
                .into())
            }
            Err(_) => {
                return Err(TransportError::Timeout {
                    op: "connect",
                    secs: CONNECT_TIMEOUT_SECS,
                }
                .into())
            }
        };

        let std_stream = stream.into_std().map_err(TransportError::Io)?;
        if let Err(e) = std_stream.set_keepalive(Some(Duration::new(TCP_KEEPALIVE_SECS, 0))) {
            warn!("gateway {gateway}: failed to set TCP keepalive: {e}");
        }
        let stream = TcpStream::from_std(std_stream).map_err(TransportError::Io)?;

        let mut session = Self {
            stream,
            gateway,
            state: SessionState::Connecting,
        };

        let identity = format!("{user_id}${CLIENT_TAG}${gateway_hex}");
        session.send(identity.as_bytes()).await?;

        let greeting = session.read_frame().await?;
        session.state = SessionState::Connected;
        info!("gateway {gateway}: connected, {} byte greeting", greeting.len());

        let response = Parser::parse(&greeting)?;
        Ok((session, response))
    }

    pub fn gateway(&self) -> GatewayId {
        self.gateway
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// One full exchange: encode, send, block for the single response frame,
    /// decode. No pipelining, no retries.
    pub async fn request(&mut self, command: &Command) -> Result<Response> {
        let frame = command.bytes();
        debug!(
            "gateway {}: TX {} byte command frame",
            self.gateway,
            frame.len()
        );

        self.state = SessionState::Sending;
        self.send(&frame).await?;

        self.state = SessionState::AwaitingResponse;
        let reply = self.read_frame().await?;
        self.state = SessionState::Connected;
        debug!("gateway {}: RX {} bytes", self.gateway, reply.len());

        Ok(Parser::parse(&reply)?)
    }

    /// Fire-and-forget dispatch. The legacy dialect acknowledges nothing on
    /// operation-mode changes, so there is no frame to read back.
    pub async fn send_command(&mut self, command: &Command) -> Result<()> {
        let frame = command.bytes();
        debug!(
            "gateway {}: TX {} byte one-way frame",
            self.gateway,
            frame.len()
        );
        self.state = SessionState::Sending;
        self.send(&frame).await?;
        self.state = SessionState::Connected;
        Ok(())
    }

    async fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        match tokio::time::timeout(
            Duration::from_secs(WRITE_TIMEOUT_SECS),
            self.stream.write_all(bytes),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(TransportError::Io(e)),
            Err(_) => {
                return Err(TransportError::Timeout {
                    op: "send",
                    secs: WRITE_TIMEOUT_SECS,
                })
            }
        }
        self.stream.flush().await.map_err(TransportError::Io)
    }

    async fn read_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut buf = [0u8; RESPONSE_BUFFER_SIZE];
        let read = match tokio::time::timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            self.stream.read(&mut buf),
        )
        .await
        {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(TransportError::Io(e)),
            Err(_) => {
                return Err(TransportError::Timeout {
                    op: "recv",
                    secs: READ_TIMEOUT_SECS,
                })
            }
        };

        if read == 0 {
            self.state = SessionState::Disconnected;
            return Err(TransportError::ConnectionClosed);
        }

        Ok(buf[..read].to_vec())
    }
}
