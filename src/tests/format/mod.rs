//! Line codec tests.

mod decode_tests;
