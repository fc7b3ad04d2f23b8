//! Background job scheduler and job implementations.

mod recording;
mod scheduler;

pub use recording::{RecordingJob, RecordingSettings};
pub use scheduler::{Job, JobFrequency, JobScheduler};
