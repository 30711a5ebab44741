//! UI layer: customer grid window, forms and modal dialogs.

pub mod app;
pub mod forms;

pub use app::CustomerListApp;
