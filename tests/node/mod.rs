//! Tests for trajectory nodes and ledgers

mod ledger_tests;
