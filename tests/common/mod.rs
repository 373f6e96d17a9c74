// Shared helpers; not every test binary uses all of them
#![allow(dead_code)]

pub mod harness;
pub mod mock_server;
pub mod tracing;
