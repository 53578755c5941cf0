pub mod compiler;
pub mod config;
pub mod error;
pub mod query;

pub use compiler::{CompiledQuery, ParseEvent, QueryCompiler};
pub use config::{CompileProfile, CompilerConfig, FilterPolicy};
pub use error::{CompileError, ErrorKind, Result};
pub use query::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
