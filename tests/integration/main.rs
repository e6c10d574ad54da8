mod cli_tests;
mod common;
mod configuration_tests;
