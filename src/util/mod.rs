//! Text helpers for rendering feed content in diagnostics.
//!
//! # Examples
//!
//! ```
//! use feedgate::util::{context_window, escape_newlines};
//!
//! let chars: Vec<char> = "line one\nline\x07two".chars().collect();
//! let context = context_window(&chars, 13, 20);
//! assert_eq!(context, "...line one\\nline\x07two...");
//! assert_eq!(escape_newlines("a\nb"), "a\\nb");
//! ```

mod text;

pub use text::{context_window, escape_newlines};
