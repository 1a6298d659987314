//! Remember-me session persistence.
//!
//! Login itself is a backend call; this module only remembers who signed in
//! with "remember me" so the next start can sign in again without asking.

pub mod session;

pub use session::{Session, SessionData};
