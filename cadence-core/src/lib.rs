//! Cadence Core
//!
//! This crate provides the per-frame task scheduling engine for the Cadence
//! rendering framework. It implements:
//!
//! - Named tasks with `before`/`after` dependency constraints
//! - Stages (ordered pipeline phases) that own and order their tasks
//! - A scheduler that orders stages and drives one full frame at a time
//! - Gated execution, so a stage can skip its tasks on frames where
//!   nothing needs to happen (demand-driven rendering)
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `key`: symbolic identifiers for stages and tasks
//! - `order`: the shared dependency-resolution primitive (stable
//!   topological ordering with cycle detection)
//! - `pipeline`: tasks, stages, the scheduler, and per-frame reports
//! - `render`: frame invalidation flags and the render gate
//!
//! # Example
//!
//! ```rust
//! use cadence_core::pipeline::{Scheduler, StageOptions, TaskOptions};
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.add_stage("update", StageOptions::new()).unwrap();
//!
//! let stage = scheduler.stage_mut("update").unwrap();
//! stage
//!     .add_task("physics", Box::new(|_dt| Ok(())), TaskOptions::new())
//!     .unwrap();
//! stage
//!     .add_task(
//!         "animation",
//!         Box::new(|_dt| Ok(())),
//!         TaskOptions::new().after(["physics"]),
//!     )
//!     .unwrap();
//!
//! // The external frame driver calls this once per frame.
//! let report = scheduler.run_frame(1.0 / 60.0).unwrap();
//! assert!(report.is_clean());
//! ```

pub mod error;
pub mod key;
pub mod order;
pub mod pipeline;
pub mod render;
