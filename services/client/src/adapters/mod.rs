pub mod http;
pub mod storage;

pub use http::HttpAdapter;
pub use storage::{FileStorage, MemoryStorage};
