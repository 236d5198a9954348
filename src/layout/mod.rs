//! Constrained-width text layout for the card canvas.
//!
//! This module provides the engine that wraps and positions text against a
//! maximum line width, driven entirely by a caller-supplied measurement
//! capability. The engine holds no state of its own; a layout call either
//! runs to completion or fails at the first invalid input.
//!
//! # Placement modes
//!
//! One shared line-breaking loop drives two mutually exclusive placement
//! modes, selected once per call by the letter spacing:
//!
//! - **block** (`letter_spacing == 0`) places each completed line as a whole
//!   string, leaving intra-string glyph spacing to the draw primitive
//! - **loose** (`letter_spacing > 0`) places one character at a time with an
//!   explicit additive gap between successive characters
//!
//! # Entry points
//!
//! - [`draw_wrapped`](crate::layout::draw_wrapped) - block mode wrapping
//! - [`draw_loose`](crate::layout::draw_loose) - spaced placement, bounded by the surface width
//! - [`draw_flexible`](crate::layout::draw_flexible) - every parameter exposed
//! - [`wrap_lines`](crate::layout::wrap_lines) - non-drawing variant returning the placed line segments
//!
//! # Example
//!
//! ```
//! use card_gen::layout::{wrap_lines, LayoutParams};
//! use card_gen::{CardError, Px};
//!
//! // a synthetic measurer: ten pixels per character
//! let measure = |text: &str| -> Result<Px, CardError> {
//!     Ok(Px(text.chars().count() as f32 * 10.0))
//! };
//!
//! let params = LayoutParams {
//!     max_width: Some(Px(30.0)),
//!     ..LayoutParams::default()
//! };
//! let lines = wrap_lines("abcdefg", (Px(0.0), Px(0.0)), &params, measure).unwrap();
//! assert_eq!(lines.len(), 3);
//! assert_eq!(lines[0].text, "abc");
//! ```

mod text;

pub use text::*;
