//! One-step global initialisation from a config section.

use log_relay::config::{ConfigError, ConsoleMode, LoggerConfig};
use log_relay::{facade, LogError};

mod common;

#[test]
fn test_init_installs_configured_logger() {
    // A rejected config must not leave the label behind.
    let mut bad_url = LoggerConfig::new("init-test");
    bad_url.collector_url = Some("not a url".to_string());
    bad_url.queue_capacity = 7;
    assert!(matches!(
        facade::init(bad_url),
        Err(LogError::Config(ConfigError::Validation(_)))
    ));

    let mut no_capacity = LoggerConfig::new("init-test");
    no_capacity.queue_capacity = 0;
    assert!(matches!(
        facade::init(no_capacity),
        Err(LogError::Config(ConfigError::Validation(_)))
    ));

    assert!(facade::application().is_none());
    assert!(matches!(facade::log_info("x"), Err(LogError::ApplicationNotSet)));

    let collector = common::start_collector();
    let mut config = LoggerConfig::new("init-test");
    config.collector_url = Some(collector.url());
    config.console = ConsoleMode::DebugOnly;
    config.queue_capacity = 3;

    let logger = facade::init(config.clone()).unwrap();
    assert_eq!(logger.application(), "init-test");
    assert_eq!(facade::application().as_deref(), Some("init-test"));
    assert_eq!(logger.collector_url().unwrap().as_str(), collector.url());

    facade::log_error("configured").unwrap();
    assert!(facade::flush(std::time::Duration::from_secs(10)));
    assert_eq!(collector.bodies()[0]["application"], "init-test");

    assert!(matches!(
        facade::init(config),
        Err(LogError::Config(ConfigError::ApplicationAlreadySet(_)))
    ));
}
