//! Temporal clustering and geometric partitioning for streaming 2D points.
//!
//! `parcel` maintains two pieces of evolving state over a live feed of
//! normalized 2D samples:
//!
//! - a decaying, deduplicated set of **tracked centroids**, extracted by
//!   re-running seeded k-means over a bounded sample buffer every tick and
//!   merging the results by proximity (see [`tracker`]);
//! - a persistent planar **divided area** of boundary segments, with
//!   unconstrained divider lines regenerated from the long-lived centroids
//!   and constrained divider lines grown from ad-hoc point pairs and clipped
//!   against existing geometry (see [`divided`]).
//!
//! The [`Engine`] wires the pipeline together in the mandated per-tick order
//! (buffer → clusterer → tracker update → decay → divider refresh) and is
//! the intended entry point; the individual components are public for
//! callers that want to drive them directly.
//!
//! ```rust
//! use parcel::{Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! engine.push_sample(0.3, 0.4);
//! engine.tick();
//!
//! // Ad-hoc boundary from a point pair, extended to existing geometry.
//! let line = engine.add_constrained_line((0.2, 0.2), (0.6, 0.7)).unwrap();
//! assert!(line.length() > 0.0);
//! ```

#![forbid(unsafe_code)]

pub mod buffer;
pub mod cluster;
pub mod config;
pub mod divided;
pub mod engine;
pub mod error;
pub mod geom;
pub mod tracker;

pub use buffer::SampleBuffer;
pub use cluster::{Clustering, Kmeans, KmeansFit};
pub use config::EngineConfig;
pub use divided::DividedArea;
pub use engine::{Engine, TickOutcome};
pub use error::{Error, Result};
pub use geom::{DividerLine, Point, Rect};
pub use tracker::{CentroidTracker, TrackedCentroid};
