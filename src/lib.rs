//! Pantry core: product filtering and expiration reminders.
//!
//! [`FilterEngine`] narrows the product list through independently toggled
//! criteria, [`NotificationScheduler`] keeps one reminder per product in the
//! timer service, and [`SelectionSet`] tracks products marked for bulk
//! actions. [`Pantry`] ties them to a [`ProductStore`].

pub mod config;
pub mod error;
pub mod filter;
pub mod notification;
pub mod pantry;
pub mod preferences;
pub mod product;
pub mod selection;
pub mod storage;

pub use error::{AppError, AppResult};
pub use filter::{Criterion, DateRange, FilterCriteria, FilterEngine, FilterKind, Requirement, ValueRange};
pub use notification::{
    trigger_time, Clock, FixedClock, LocalTimer, ManualClock, NotificationScheduler, Notifier,
    ScheduledTrigger, SystemClock, TimerService,
};
pub use pantry::Pantry;
pub use preferences::{load_preferences, save_preferences, Preferences};
pub use product::{Product, ProductId};
pub use selection::SelectionSet;
pub use storage::{JsonProductStore, MemoryProductStore, ProductStore};

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber for `tracing` output.
///
/// Honours `RUST_LOG`, defaulting to `info`. Calling it again, or after the
/// host installed its own subscriber, does nothing.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
