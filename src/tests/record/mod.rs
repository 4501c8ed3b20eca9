//! Record and record type tests.
