//! Adapter implementations for the port traits.
//!
//! - `gemini` — synchronous backend: one blocking call, inline results
//! - `qwen` — task-based backend: submit a job, poll it to completion

pub mod gemini;
pub mod qwen;
