//! Single-machine instance data.
//!
//! An [`Instance`] is an ordered list of [`Job`]s, each with a processing
//! time and a due date. Instances are validated on construction and
//! immutable afterwards; the index of a job is its position in the list.
//!
//! Instances can be read from the flat project file format with
//! [`InstanceLoader`], written back with [`Instance::write_to`], or drawn
//! at random with [`InstanceGenerator`].

mod err;
mod generator;
mod loader;
mod types;

pub use err::{InstanceError, LoaderError};
pub use generator::InstanceGenerator;
pub use loader::InstanceLoader;
pub use types::{Instance, Job, MAX_JOBS};
