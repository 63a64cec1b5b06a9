pub mod types;

pub use types::{CardKind, ParseCardKindError};
