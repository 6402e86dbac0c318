pub mod benchmarks;
pub mod deal;
pub mod diligence;
pub mod extraction;
pub mod financing;
