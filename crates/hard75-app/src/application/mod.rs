pub mod controller;
pub mod dtos;
pub mod events;
pub mod presenter;
pub mod queries;
pub mod services;
pub mod state;

pub use controller::{TrackerController, TrackerDeps};
pub use events::{AppEvent, FormEdit};
pub use presenter::Presenter;
