pub mod accumulator;
pub mod reducer;
