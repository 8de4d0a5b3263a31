//! Case store adapters: the production HTTP client and an in-memory mock.

pub mod http;
pub mod mock;
pub mod retry;

pub use http::HttpCaseStore;
pub use mock::MockCaseStore;
pub use retry::RetryPolicy;
