//! Scenario tests for the research-then-write pipeline

mod helpers;

mod failure_handling;
mod research_chain;
mod run_logging;
mod state_merge;
