pub mod bytes;

pub use bytes::format_bytes;
