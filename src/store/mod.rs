//! Append-only record store, "sheet as database".
//!
//! Submissions land in per-form-kind tables as rows of string values in a
//! fixed column order. The interface is the minimum the handlers need, so
//! any backing (file, table, key-value) can satisfy it.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::AppError;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Table receiving registration rows.
pub const REGISTRATIONS_TABLE: &str = "Registrations";

/// Table receiving contact-message rows.
pub const CONTACT_TABLE: &str = "Contact Messages";

/// Column order for [`REGISTRATIONS_TABLE`].
pub const REGISTRATION_HEADER: &[&str] = &[
    "Timestamp",
    "Team ID",
    "Team Name",
    "Event",
    "Team Size",
    "Leader/Solo Name",
    "Mate Name",
    "College",
    "Department",
    "Year",
    "Phone",
    "Email",
    "Payment Status",
    "User Agent",
];

/// Column order for [`CONTACT_TABLE`].
pub const CONTACT_HEADER: &[&str] = &[
    "Timestamp",
    "Ticket ID",
    "Name",
    "Email",
    "Phone",
    "Subject",
    "Message",
    "Status",
    "User Agent",
];

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create `table` with its header if it does not exist yet.
    async fn ensure_table(&self, table: &str, header: &[&str]) -> Result<(), AppError>;

    /// Append one record to `table`. Values are stored verbatim in the
    /// given column order.
    async fn append(&self, table: &str, record: &[String]) -> Result<(), AppError>;

    /// Number of data rows in `table` (zero for an unknown table).
    async fn count_rows(&self, table: &str) -> Result<u64, AppError>;
}
