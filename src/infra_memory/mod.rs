//! `DashMap`-backed repositories for the `memory` storage backend and for
//! tests. Each map entry is locked for the duration of a write, which gives
//! the same per-key atomicity the SQL unique indexes provide.

mod blog_repo_memory;
mod revocation_store_memory;
mod user_repo_memory;

pub use blog_repo_memory::*;
pub use revocation_store_memory::*;
pub use user_repo_memory::*;
