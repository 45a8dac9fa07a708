pub mod ast;
pub mod callsite;
pub mod comments;
pub mod config;
pub mod context;
pub mod emitter;
pub mod error;
pub mod extract;
pub mod hyphenate;
pub mod imports;
pub mod log;
pub mod migrate;
pub mod source;
pub mod units;

pub use config::Config;
pub use error::{MigrateError, Result};
pub use migrate::{Migration, Migrator, Stylesheet};
