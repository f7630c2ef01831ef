mod couch;
mod error;
mod http;
mod shard_doc;

pub use couch::*;
pub use error::*;
pub use http::*;
pub use shard_doc::*;
