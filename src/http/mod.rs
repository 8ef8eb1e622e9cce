pub mod interceptor;
pub mod orderedheaders;
pub mod request;
pub mod response;

// Re-exports for convenience
pub use interceptor::{interceptors, RequestInterceptor, ResponseInterceptor};
pub use orderedheaders::OrderedHeaderMap;
pub use request::{OutgoingRequest, PendingRequest};
pub use response::{IncomingResponse, ReceivedResponse};
