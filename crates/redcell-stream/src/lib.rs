//! Connection manager for redcell push streams.
//!
//! One logical stream per tracked resource id: opened by `connect`, closed by
//! `disconnect`, dispatching decoded envelopes to a single subscriber in
//! arrival order. Messages lost while disconnected are gone; nothing here
//! replays.

pub mod connection;
pub mod http;
pub mod transport;

pub use connection::{
    StreamConnection, StreamConnectionConfig, StreamDispatch, DEFAULT_RECONNECT_ATTEMPTS,
    DEFAULT_RECONNECT_DELAY,
};
pub use http::HttpStreamTransport;
pub use transport::{BoxedStreamSource, StreamSource, StreamTransport};
