pub mod file_store;
pub mod http;

pub use file_store::FileSessionStorage;
pub use http::HttpApiAdapter;
