pub mod attr;
pub mod record;
pub mod context;
pub mod extractor;
pub mod handler;
pub mod context_handler;

pub mod text;
#[cfg(feature = "json")]
pub mod json;

pub mod logger;
pub mod layer;
pub mod config;
pub mod env;
pub mod init;
pub mod noop;

#[cfg(test)]
mod test_util;
