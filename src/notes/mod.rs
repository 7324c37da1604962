//! Note lifecycle: the service enforcing the one-way lock and its errors.

pub mod error;
pub mod service;

pub use error::NoteError;
pub use service::NoteService;
