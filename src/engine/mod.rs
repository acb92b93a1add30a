pub mod lifecycle;
pub mod revert;
pub mod settlement;
pub mod submit;
pub mod sweeper;

pub use lifecycle::{confirm, reject};
pub use revert::revert;
pub use settlement::settle;
pub use submit::{submit, SubmitParams};
pub use sweeper::{sweep, SweepReport};

/// Identity handed in by the authentication layer. The engine never
/// resolves identities itself; it only checks them against match rosters.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub id: i64,
    pub is_admin: bool,
}

impl Caller {
    pub fn player(id: i64) -> Self {
        Self {
            id,
            is_admin: false,
        }
    }

    pub fn admin(id: i64) -> Self {
        Self { id, is_admin: true }
    }
}
