//! UI layer for the desktop app: app shell, contact list, and modal form.

pub mod app;

pub use app::ContactDeskApp;
