//! Business logic subsystem.
//!
//! # Data Flow
//! ```text
//! handler span context
//!     → users.rs fetch_user_by_id (lookup span, simulated work)
//!     → users.rs query_name (query span, duration histogram)
//!     → store::UserStore::fetch_name
//! ```
//!
//! # Design Decisions
//! - Each level opens its span as a child of the context it was given
//! - Errors travel up one level at a time, each span closing on the way

pub mod users;

pub use users::UserService;
