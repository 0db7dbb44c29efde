mod copy_job;

pub use copy_job::{CopyError, CopyJob};
