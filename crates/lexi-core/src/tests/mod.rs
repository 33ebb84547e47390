mod cache_tests;
mod key_tests;
mod orchestrator_tests;
mod support;
