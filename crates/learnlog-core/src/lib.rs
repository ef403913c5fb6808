//! Browser-independent logic for the
//! learnlog page scripts.
//!
//! Everything here runs natively so the
//! behaviour of each page component can
//! be tested without a browser; the web
//! crate only translates DOM events into
//! calls on these types and applies the
//! results back to the page.

pub mod autosave;
pub mod calendar;
pub mod config;
pub mod cropper;
pub mod error;
pub mod generation;
pub mod modal;
pub mod reschedule;
pub mod theme;

pub use error::ClientError;
