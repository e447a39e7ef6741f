pub mod backoff;
pub mod client;
pub mod credentials;
pub mod error;
pub mod stream;

pub use backoff::ReconnectBackoff;
pub use client::{ApiClient, ClientOptions};
pub use credentials::{CredentialStore, MemoryCredentials, PersistentCredentials, Tokens};
pub use error::ApiError;
pub use stream::{EventStream, SseDecoder, StreamSignal};
pub use workdeck_api;
