//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one subsystem of
//! `BusService` against the shared mock host.  All tests run on the host
//! with no bus hardware required.

mod control_tests;
mod discovery_tests;
