pub mod backend;
pub mod images;

pub use backend::{HttpBackend, HttpBackendConfig, SearchBackend};
pub use images::ImageLocationResolver;
