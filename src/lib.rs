//! Recompose turns an ad-hoc `docker run` invocation into a declarative
//! docker-compose manifest.
//!
//! ```
//! use recompose::core::{Compiler, FlagRegistry};
//!
//! let registry = FlagRegistry::new();
//! let compiler = Compiler::new(&registry, "docker run -p 80:80 nginx").unwrap();
//! let yaml = compiler.compile().unwrap();
//! assert!(yaml.contains("80:80"));
//! ```

pub mod cli;
pub mod core;
