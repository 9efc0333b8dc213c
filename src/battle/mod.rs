pub mod ai;
pub mod calculators;
pub mod engine;
pub mod events;
pub mod runner;
pub mod state;

#[cfg(test)]
pub(crate) mod tests;
