use super::*;

#[test]
fn missing_port_uses_default() {
    let cfg = ServerConfig::from_port_var(None).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
}

#[test]
fn port_is_parsed_and_trimmed() {
    let cfg = ServerConfig::from_port_var(Some(" 8080 ")).unwrap();
    assert_eq!(cfg.port, 8080);
}

#[test]
fn invalid_port_is_rejected() {
    let err = ServerConfig::from_port_var(Some("http")).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPort { ref value, .. } if value == "http"));
    assert!(ServerConfig::from_port_var(Some("70000")).is_err());
}
