//! UI layer for the gallery desktop client: app shell, catalog view, and
//! modal dialogs.

pub mod app;

pub use app::GalleryApp;
