use crate::queue::codel::{CoDelConfig, ConfigError};
use crate::queue::{CoDelQueue, QueueSize, QueueSizeUnit};
use crate::sim::SimTime;

#[test]
fn default_config_is_valid_with_standard_parameters() {
    let cfg = CoDelConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.target, SimTime::from_millis(5));
    assert_eq!(cfg.interval, SimTime::from_millis(100));
    assert_eq!(cfg.max_size, QueueSize::packets(1000));
    assert_eq!(cfg.min_bytes, 1500);
    assert!(!cfg.use_ecn);
    assert!(!cfg.use_l4s);
    assert_eq!(cfg.ce_threshold, None);
}

#[test]
fn rejects_target_not_below_interval() {
    let cfg = CoDelConfig {
        target: SimTime::from_millis(100),
        ..CoDelConfig::default()
    };
    assert_eq!(
        cfg.validate(),
        Err(ConfigError::TargetNotBelowInterval {
            target: SimTime::from_millis(100),
            interval: SimTime::from_millis(100),
        })
    );
    assert!(CoDelQueue::new(cfg).is_err());
}

#[test]
fn rejects_zero_sizes_and_target() {
    let cfg = CoDelConfig {
        max_size: QueueSize::bytes(0),
        ..CoDelConfig::default()
    };
    assert_eq!(cfg.validate(), Err(ConfigError::ZeroMaxSize));

    let cfg = CoDelConfig {
        target: SimTime::ZERO,
        ..CoDelConfig::default()
    };
    assert_eq!(cfg.validate(), Err(ConfigError::ZeroTarget));
}

#[test]
fn rejects_interval_beyond_codel_clock() {
    let cfg = CoDelConfig {
        interval: SimTime::from_secs(10_000),
        ..CoDelConfig::default()
    };
    assert_eq!(
        cfg.validate(),
        Err(ConfigError::IntervalTooLarge(SimTime::from_secs(10_000)))
    );
}

#[test]
fn ce_threshold_requires_l4s_and_l4s_requires_ecn() {
    let cfg = CoDelConfig {
        use_ecn: true,
        ce_threshold: Some(SimTime::from_millis(1)),
        ..CoDelConfig::default()
    };
    assert_eq!(cfg.validate(), Err(ConfigError::CeThresholdWithoutL4s));

    let cfg = CoDelConfig {
        use_l4s: true,
        ..CoDelConfig::default()
    };
    assert_eq!(cfg.validate(), Err(ConfigError::L4sWithoutEcn));

    let cfg = CoDelConfig {
        use_ecn: true,
        use_l4s: true,
        ce_threshold: Some(SimTime::from_millis(1)),
        ..CoDelConfig::default()
    };
    assert!(cfg.validate().is_ok());
}

#[test]
fn config_parses_from_json_with_defaults() {
    let raw = r#"
{
    "max_size": { "unit": "bytes", "value": 30000 },
    "target_ns": 2000000,
    "use_ecn": true
}
    "#;
    let cfg: CoDelConfig = serde_json::from_str(raw).expect("parse config");
    assert_eq!(cfg.max_size.unit, QueueSizeUnit::Bytes);
    assert_eq!(cfg.max_size.value, 30_000);
    assert_eq!(cfg.target, SimTime::from_millis(2));
    assert_eq!(cfg.interval, SimTime::from_millis(100));
    assert!(cfg.use_ecn);
}

#[test]
fn config_rejects_unknown_fields() {
    let raw = r#"{ "target": 5 }"#;
    assert!(serde_json::from_str::<CoDelConfig>(raw).is_err());
}
