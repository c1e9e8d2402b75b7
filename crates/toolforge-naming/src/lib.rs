//! Operation naming.
//!
//! - [`identifier`]: reversible `METHOD::path` identifiers for operations.
//! - [`abbreviate`]: short, charset-restricted display names derived from
//!   arbitrary text.

pub mod abbreviate;
pub mod dictionary;
pub mod error;
pub mod identifier;

pub use abbreviate::{abbreviate, abbreviate_with, content_hash, NamingOptions, MAX_NAME_LEN};
pub use error::{IdentifierFormatError, NamingError};
pub use identifier::{decode, encode, is_valid, DecodedIdentifier, ToolIdentifier};
