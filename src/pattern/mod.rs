//! Destination patterns.
//!
//! A pattern such as `{PatientName}/{SeriesNumber}/{InstanceNumber ?? SOPInstanceUID}.dcm`
//! is parsed once per run into a [`Template`] and expanded per file against that
//! file's [`TagStore`](crate::dataset::TagStore).

mod sanitize;
mod tag;
mod template;

pub use sanitize::clean;
pub use tag::parse_tag;
pub use template::{FRESH_ID, SEPARATOR, Template, apply};
