pub mod client;
pub mod lookups;
pub mod records;

pub use client::{DownstreamClient, DownstreamError, ForwardedResponse, Service, ServiceUrls};
pub use lookups::HttpLookups;
