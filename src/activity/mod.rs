mod tracker;

pub use tracker::{ActivityMap, ActivityTracker};
