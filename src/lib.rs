//! Erasmus Architect - Erasmus+ proposal drafting pipeline
//!
//! This crate turns a project idea into a draft Erasmus+ cooperation
//! partnership proposal. A six-step concept session goes from idea to
//! concept to objectives and work packages. Each step is backed by a
//! Gemini model call whose output is normalized into typed values. Around
//! the session sit translation with id-based merge, reviewer-style
//! evaluation, partner extraction from websites and a compliance rules
//! engine.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
