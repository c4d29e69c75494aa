//! Chart-of-accounts domain.

mod types;

pub use types::{Account, AccountFilter, AccountType, NormalBalance};
