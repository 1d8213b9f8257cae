#[cfg(test)]
pub mod memory;
pub mod repo;
pub mod repo_types;

pub use repo::{PgUserStore, UserStore};
pub use repo_types::{Debit, NewUser, User};

/// Balance every account starts with.
pub const STARTING_ENERGY: i32 = 100;

/// Energy debited per successful generation.
pub const GENERATION_COST: i32 = 20;
