//! Atomic CSS generation.
//!
//! Turns raw CSS text blocks into one rule per declaration, each addressed
//! by a content-hashed class name, plus the helpers that normalise style
//! object keys and values into CSS (kebab-casing, the px auto-suffix
//! policy). The compiler pass in `kiln` feeds it the CSS text produced by
//! the style evaluator; it knows nothing about the source language.

pub mod atomic;
pub mod naming;
pub mod props;

pub use atomic::{AtomizeResult, atomize, atomize_with};
pub use naming::ClassNames;
