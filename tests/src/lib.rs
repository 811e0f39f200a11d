//! Integration tests exercising compiled patterns through the runtime.

#[cfg(test)]
mod errors;
#[cfg(test)]
mod matching;
