//! Core de-identification logic.
//!
//! - [`selection`]: which columns are hashed and which one identifies the participant
//! - [`pipeline`]: deterministic SHA-1 digests per row
//! - [`session`]: workbook, sheet, selection and output held as one explicit context

pub mod error;
pub mod pipeline;
pub mod selection;
pub mod session;

pub use error::{Result, SessionError};
pub use pipeline::{
    DigestOptions, EMPTY_INPUT_DIGEST, compute_digests, compute_digests_with, row_digest_input,
    sha1_hex,
};
pub use selection::Selection;
pub use session::Session;
