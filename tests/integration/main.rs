//! Integration test harness for the termcanvas binary.

mod helpers;

mod cli_test;
mod config_test;
