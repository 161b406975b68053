//! Shared types: page-view events. Use chrono types for timestamps and dates.

pub mod page_view;

pub use page_view::{NewPageView, PageViewEvent};
