//! The control surface: user input, persisted preferences, readiness
//! polling, and the rolling activity log.

pub mod controller;
pub mod poller;
pub mod preferences;
pub mod store;
pub mod view;

pub use controller::Controller;
pub use poller::{PollEvent, ReadinessProbe, ReadyPoller};
pub use preferences::{PreferenceValue, Preferences};
pub use store::{FileStore, MemoryStore, PreferenceStore};
pub use view::{Indicator, PopupView};
