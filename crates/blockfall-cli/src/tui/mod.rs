//! Minimal terminal runtime: a fixed-rate clock, throttled rendering and
//! crossterm input, driving a single [`App`].

pub use self::{app::App, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
