//! `ems-policy` — pluggable dispatch and move-up decisions.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`context`]  | `PolicyContext<'a>`: read-only state at one decision point    |
//! | [`dispatch`] | `DispatchPolicy` trait, `NearestDispatch`                     |
//! | [`move_up`]  | `MoveUpPolicy` trait, `MoveUpTriggers`, reference strategies  |
//! | [`registry`] | `dispatch_policy_by_name`, `MoveUpConfig`                     |
//! | [`error`]    | `PolicyError`, `PolicyResult<T>`                              |
//!
//! # Design notes
//!
//! Policies only *decide*.  They receive `&PolicyContext` and return ids;
//! the handler in `ems-sim` validates the answer and performs every state
//! change.  This keeps policies free of mutable state and lets the same
//! policy object serve every replication.

pub mod context;
pub mod dispatch;
pub mod error;
pub mod move_up;
pub mod registry;


pub use context::PolicyContext;
pub use dispatch::{DispatchPolicy, NearestDispatch};
pub use error::{PolicyError, PolicyResult};
pub use move_up::{CompTableMoveUp, MoveUpPolicy, MoveUpTriggers, NoMoveUp, ReturnHomeMoveUp};
pub use registry::{dispatch_policy_by_name, MoveUpConfig, DISPATCH_POLICIES};
