pub mod fake;

mod state_tests;
