//! Library-wide operations: browsing, multi-select move, and the trash.

pub mod listing;
pub mod selection;
pub mod transfer;

pub use listing::{LibraryListing, LibraryQuery, ListingService};
pub use selection::{SelectionOutcome, SelectionService};
pub use transfer::{MoveOutcome, TransferService};
