//! Row-mapped access to the application tables.

mod client;
mod commission;
mod identity;

pub use client::ClientStore;
pub use commission::{CommissionStore, CommissionWithClient};
pub use identity::IdentityStore;

// SQLite takes signed limits; anything larger means "everything".
pub(crate) fn clamp(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
