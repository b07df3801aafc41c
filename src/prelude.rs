pub use crate::config::Credentials;
pub use crate::error::{
    AuthError, Error, ProtocolError, Result, TransportError, ValidationError,
};
pub use crate::navilink::session::GatewayId;
pub use crate::options::Options;

pub use log::{debug, error, info, trace, warn};
