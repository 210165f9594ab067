//! Shared setup for workflow tests.

use bugtrack_client::session::Credentials;
use secrecy::Secret;
use workflow_tests::{TestBackend, TEST_PASSWORD, TEST_USERNAME};

pub async fn setup() -> TestBackend {
    TestBackend::spawn().await
}

pub fn credentials() -> Credentials {
    Credentials {
        username: TEST_USERNAME.to_string(),
        password: Secret::new(TEST_PASSWORD.to_string()),
    }
}
