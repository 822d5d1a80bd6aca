// Single integration test binary; each module covers one route group.

mod common;

mod area_tests;
mod quiz_tests;
