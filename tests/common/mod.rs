use formbind::{FieldConfig, FormSession, FormSettings};
use serde_json::Value;

/// Route engine logs to the test output. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn field(path: &str) -> FieldConfig {
    FieldConfig::parse(path).unwrap()
}

pub fn session(item: Value) -> FormSession {
    init_tracing();
    FormSession::new(item, &FormSettings::default())
}
