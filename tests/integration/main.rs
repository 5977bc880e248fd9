//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with no network
//! access required.

mod mock_feeder;
mod poller_tests;
mod preference_store_tests;
