//! Session-scoped conversation state: one append-only history per mode, an
//! at-most-one cached rules document, and the turn logic that ties them to a
//! chat model.

mod error;
mod history;
mod session;

pub use error::SessionError;
pub use history::History;
pub use session::{DocumentContext, GENERAL_PRIMER, Gate, Mode, RULES_PRIMER_PREFIX, Session};
