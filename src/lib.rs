//! Gantt planning core for the DataSight dashboard.
//!
//! The crate turns a flat task list into what a Gantt renderer needs:
//!
//! - [`graph`]: critical path extraction and hierarchical display ordering
//! - [`timeline`]: axis bounds, header buckets, bar positions and dependency
//!   edges for day, week and month views
//! - [`schedule`]: five-day work-week scheduling of plan outlines
//! - [`io`]: project files, AI task lists and CSV import/export
//!
//! All computations are pure functions of the tasks passed in.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use datasight_gantt::model::{Project, Task};
//! use datasight_gantt::timeline::ViewMode;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
//! let project = Project::with_tasks(
//!     "Demo",
//!     vec![
//!         Task::new(1, "Design", day(6), day(10)),
//!         Task::new(2, "Build", day(13), day(24)).with_dependencies([1]),
//!     ],
//! );
//!
//! let frame = project.gantt_frame(ViewMode::Week, true)?;
//! assert!(frame.critical.contains(&2));
//! assert!(frame.edges[0].critical);
//! # Ok::<(), datasight_gantt::GanttError>(())
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod io;
pub mod model;
pub mod schedule;
pub mod timeline;

pub use error::{GanttError, Result};
