//! Utility functions for common operations.
//!
//! Home of the sanitization pass every generated text field goes through
//! before it is length-checked and stored.

mod text;

pub use text::{sanitize_fragment, strip_control_chars, strip_markup};
