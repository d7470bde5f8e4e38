//! In-process clients built on the failover router.

pub mod page;

pub use page::{FetchError, PageClient};
