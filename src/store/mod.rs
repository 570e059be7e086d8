//! Data store subsystem.
//!
//! # Data Flow
//! ```text
//! startup:
//!     connect (sqlx pool) → create table if absent → seed default record
//!
//! per request:
//!     fetch_name(id) → Ok(name) | NotFound | Database
//! ```
//!
//! # Design Decisions
//! - One pooled handle shared by all requests; the pool serializes nothing
//!   beyond what SQLite requires
//! - Seeding is best-effort: a duplicate record is logged, never fatal
//! - A miss is a distinct error so callers can answer "not found"

pub mod users;

pub use users::{StoreError, UserStore, SELECT_NAME_BY_ID};
