#![allow(dead_code)]

use girder::AppContext;
use girder_config::ConfigStore;
use girder_testing::TestClient;
use std::sync::Arc;

/// Nothing listens on the discard port, so upstream calls fail fast.
pub const UNREACHABLE_UPSTREAM: &str = "http://127.0.0.1:9";

/// Context over a private in-memory database; `overrides` are `section.key`
/// pairs applied on top of the defaults.
pub fn context(overrides: &[(&str, &str)]) -> AppContext {
    let builder = ConfigStore::builder()
        .set("database.driver", "sqlite")
        .set("database.database", ":memory:")
        .set("services.jsonplaceholder_url", UNREACHABLE_UPSTREAM)
        .set("log.level", "warn");
    let config = overrides
        .iter()
        .fold(builder, |builder, (key, value)| builder.set(*key, *value))
        .build()
        .unwrap();
    AppContext::new(config).unwrap()
}

pub fn client(context: &AppContext) -> TestClient {
    TestClient::new(Arc::new(context.dispatcher()))
}
