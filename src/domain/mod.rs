//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `budget` - Lump-sum budget table, country cost levels and budget checks
//! - `foundation` - Shared primitives (ids, timestamps, action types, steps, errors)
//! - `normalizer` - Recovery of JSON values from model output
//! - `proposal` - Stored project aggregate, translation merge, entity rules
//! - `pipeline` - Proposal-writing session: answers, form structure, document assembly
//! - `concept` - Six-step concept development state and step functions
//! - `prompts` - Prompt templates for every generation task
//! - `validation` - Compliance rules engine and traffic-light summary

pub mod budget;
pub mod concept;
pub mod foundation;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;
pub mod proposal;
pub mod validation;
