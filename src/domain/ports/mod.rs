pub mod case_store;
pub mod credentials;
pub mod errors;

pub use case_store::RemoteCaseStore;
pub use credentials::{Credentials, CredentialsProvider};
pub use errors::CaseStoreError;
