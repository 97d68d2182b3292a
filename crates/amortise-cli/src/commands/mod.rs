pub mod reconcile;
pub mod schedule;
