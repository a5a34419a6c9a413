//! Ghostwriter engine: HTTP backend, polling and effect execution.
mod client;
mod decode;
mod engine;
mod poll;
mod routes;
mod types;

pub use client::{ApiSettings, Backend, ReqwestBackend, DEFAULT_BASE_URL};
pub use decode::{decode_json, decode_list, DecodeError};
pub use engine::{ChannelEventSink, EngineEvents, EngineHandle, EventSink};
pub use poll::{PollHandle, PollScheduler};
pub use routes::{action_route, list_route, list_shape, ListShape, Route, ToggleBody};
pub use types::{EngineEvent, FailureKind, FetchError};
