//! HTML pages rendered with Askama, progressively enhanced with htmx.

pub mod handlers;
pub mod markdown;
