//! Shared fixtures for unit tests.

// Test RSA key - FOR TESTING ONLY
pub const TEST_PRIVATE_KEY: &str = include_str!("../tests/fixtures/service_account_key.pem");
