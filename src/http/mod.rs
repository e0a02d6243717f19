pub mod contentcoding;
pub mod headerparser;
pub mod hostspec;
pub mod orderedheaders;
pub mod request;
pub mod response;
pub mod responsebody;
pub mod transaction;

// Re-exports for convenience
pub use contentcoding::{compress, decompress, ContentCoding};
pub use headerparser::HeaderParser;
pub use hostspec::HostSpec;
pub use orderedheaders::OrderedHeaderMap;
pub use request::HttpRequest;
pub use response::HttpResponse;
pub use responsebody::{BodyReader, FramingMode};
pub use transaction::HttpTransaction;
