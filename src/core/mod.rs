//! The flag-to-document compiler: tokenizer, flag registry, document
//! builder, and the ulimit sub-parser.

pub mod compiler;
pub mod document;
pub mod error;
pub mod registry;
pub mod scanner;
pub mod ulimit;

pub use compiler::{Compiler, DEFAULT_COMPOSE_VERSION, DEFAULT_SERVICE_NAME};
pub use error::CompileError;
pub use registry::{FlagKind, FlagRegistry};
pub use ulimit::Ulimit;
