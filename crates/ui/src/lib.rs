pub mod views;
pub mod vm;

#[cfg(test)]
mod test_harness;

pub use views::{Screen, render_timer_notice};
