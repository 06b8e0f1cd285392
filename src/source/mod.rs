// Remote resource access — the HTTP backend and the trait the pipeline talks to.

pub mod http_source;
pub mod traits;
