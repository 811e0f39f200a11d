//! Provides for the compilation of a POSIX extended regular expression into
//! it's corresponding runtime program.
//!
//! # Example
//!
//! ```rust
//! // Compilation of a pattern into a runnable program is accomplished by a
//! // single function exposed in the `ere_compiler` crate.
//! use ere_compiler::compile;
//!
//! // Evaluating a given input against a program is exposed by the
//! // `ere_runtime` crate.
//! use ere_runtime::find;
//!
//! // Alternatives are matched leftmost-longest, rather than by the order
//! // they are written.
//! let program = compile("a|ab").expect("failed to compile");
//!
//! let found = find(&program, "xaby")
//!     .expect("runtime error")
//!     .expect("no match");
//!
//! // A match exposes the text and byte offsets of the matched input,
//! // `ab` covering bytes 1 and 2.
//! assert_eq!(("ab", 1, 3), (found.as_str(), found.start(), found.end()));
//! ```

mod bracket;
pub mod compiler;
pub mod error;
mod repetition;

pub use compiler::compile;
pub use error::CompileError;
