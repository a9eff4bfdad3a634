pub mod cli;
pub mod conf;
pub mod es_error;
pub mod filter;
pub mod http;
pub mod logging;
pub mod shutdown;
pub mod sink;
pub mod source;
