//! Data models for the department library

pub mod archive;
pub mod book;
pub mod borrow;
pub mod periodical;
pub mod profile;
pub mod session;

// Re-export commonly used types
pub use archive::ProjectArchive;
pub use book::{Book, BookShort};
pub use borrow::{BorrowDetails, BorrowRecord, BorrowStatus};
pub use periodical::{Journal, Magazine};
pub use profile::{Profile, ProfileStatus, Role};
pub use session::{Account, Session};
