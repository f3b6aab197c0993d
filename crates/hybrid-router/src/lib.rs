//! Hybrid Router - the shadow router: produces a routing decision from a
//! prompt by sanitizing it, classifying its complexity and intent, and
//! gating on policy, thermal state, and available VRAM.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod analysis;
mod context;
mod gates;
mod heuristic;
mod router;

pub use context::RouterContext;
pub use gates::{decide, select_local_model};
pub use heuristic::heuristic_complexity;
pub use router::ShadowRouter;
