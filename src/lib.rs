//! Boardgen — sketch-to-storyboard generation service.
//!
//! Takes a rough sketch, a scene description and a style block, and returns
//! AI-generated monochrome storyboard frames, with vary and edit follow-ups
//! on individual results. One stable contract is presented over two
//! structurally different backend protocols: a synchronous single-call
//! model (Gemini) and an asynchronous submit/poll task model (Qwen via
//! `DashScope`).

pub mod adapters;
pub mod api;
pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod poller;
pub mod ports;
pub mod prompt;
pub mod server;
