//! Process-wide facade. The global state is shared by every test in this
//! binary, so the whole lifecycle runs as one ordered test.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use log_relay::config::ConfigError;
use log_relay::relay::RelayError;
use log_relay::{facade, HttpError, LogError};
use serde_json::json;

mod common;

const FLUSH: Duration = Duration::from_secs(10);

#[test]
fn test_global_facade_lifecycle() {
    // Nothing is delivered before the application label is set.
    assert!(matches!(facade::log_info("too early"), Err(LogError::ApplicationNotSet)));
    assert!(matches!(facade::global(), Err(LogError::ApplicationNotSet)));
    assert!(facade::application().is_none());

    assert!(matches!(
        facade::set_application("  "),
        Err(ConfigError::MissingApplication)
    ));
    facade::set_application("facade-test").unwrap();
    assert!(matches!(
        facade::set_application("other"),
        Err(ConfigError::ApplicationAlreadySet(name)) if name == "facade-test"
    ));

    let collector = common::start_collector();
    assert!(matches!(
        facade::set_collector_url("not a url"),
        Err(ConfigError::InvalidCollectorUrl(_))
    ));
    facade::set_collector_url(&collector.url()).unwrap();

    facade::log_info(json!({"step": "info"})).unwrap();
    facade::log_warning(json!({"step": "warning"})).unwrap();
    facade::log_error(json!({"step": "error"})).unwrap();
    assert!(facade::flush(FLUSH));

    let bodies = collector.bodies();
    assert_eq!(bodies.len(), 3);
    assert!(bodies.iter().all(|b| b["application"] == "facade-test"));

    // Handlers returning HttpError log through the facade.
    let response = HttpError::not_found("gone").into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(facade::flush(FLUSH));

    let last = collector.bodies().pop().unwrap();
    assert_eq!(last["severity"], "w");
    assert_eq!(last["content"], "status 404 occurred with message gone");

    facade::shutdown();
    assert!(matches!(
        facade::log_info("after shutdown"),
        Err(LogError::Relay(RelayError::Closed))
    ));
}
