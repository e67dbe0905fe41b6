//! Resume and job description texts shared by the integration tests.

pub const RESUME_TEXT: &str =
    "Experienced backend engineer, 5 years Go and distributed systems";

pub const JOB_DESCRIPTION: &str =
    "Seeking Go backend engineer with distributed systems experience";

/// A resume long enough to span several chunks and exceed the reasoning prefix.
pub fn long_resume(chars: usize) -> String {
    let line = "Built fault-tolerant Go services for payments and search. ";
    line.chars().cycle().take(chars).collect()
}
