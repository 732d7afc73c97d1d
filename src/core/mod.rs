pub mod cancel_signal;
pub mod config;
pub mod http_client;
pub mod runtime_context;

pub use cancel_signal::CancelSignal;
pub use config::{ConfigError, EngineConfig, PollPolicy, DEFAULT_NODE_NORMALIZER_URL};
pub use http_client::{build_http_client, HttpPoolConfig};
pub use runtime_context::{
    FakeIdGenerator, FakeTimeProvider, IdGenerator, RealIdGenerator, RealTimeProvider,
    RuntimeContext, TimeProvider,
};
