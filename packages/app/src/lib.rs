//! # StudyFlow client core
//!
//! Everything a StudyFlow front end binds to, without any rendering:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`mode`] | Resolve signed-in / guest / redirect once per page load |
//! | [`active`] | [`ActiveStore`], the single store a resolved page uses |
//! | [`timer`] | Countdown state machine producing study sessions |
//! | [`work_types`] | Work-type list, selection and create-or-resolve |
//! | [`tasks`] | Task panel with optimistic toggle and delete |
//! | [`optimistic`] | Apply-then-confirm helper with rollback |
//! | [`stats`] | Chart rows, breakdowns and summary figures |
//! | [`dashboard`] | The page: all of the above over one store |

pub mod active;
pub mod dashboard;
pub mod mode;
pub mod optimistic;
pub mod stats;
pub mod tasks;
pub mod timer;
pub mod work_types;

mod repo;
#[cfg(any(not(target_arch = "wasm32"), feature = "web"))]
pub use repo::default_storage;

pub use active::ActiveStore;
pub use dashboard::{open, Dashboard, Page};
pub use mode::{Identity, Mode, SessionStatus};
pub use tasks::TaskPanel;
pub use timer::Timer;
pub use work_types::WorkTypeRegistry;
