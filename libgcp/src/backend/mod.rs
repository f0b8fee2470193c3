//! Concrete [`crate::compute::ComputeService`] implementations.
//!
//! The only shipped backend talks REST to the provider; tests use in-memory
//! fakes defined next to the code they exercise.

pub mod rest;
