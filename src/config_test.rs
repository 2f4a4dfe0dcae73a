use super::*;
use std::collections::HashMap;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_target_local_frontend() {
    let config = ServerConfig::from_lookup(lookup(&[])).expect("defaults");
    assert_eq!(config, ServerConfig::default());
    assert_eq!(config.port, 3001);
    assert_eq!(config.listen_addr(), "0.0.0.0:3001");
    assert_eq!(
        config.frontend_origin,
        AllowedOrigin::Exact(HeaderValue::from_static("http://localhost:5173"))
    );
}

#[test]
fn overrides_are_applied() {
    let config = ServerConfig::from_lookup(lookup(&[
        ("PORT", "8080"),
        ("BIND_ADDR", "127.0.0.1"),
        ("FRONTEND_URL", "https://draw.example.com/"),
    ]))
    .expect("overrides");
    assert_eq!(config.listen_addr(), "127.0.0.1:8080");
    assert_eq!(
        config.frontend_origin,
        AllowedOrigin::Exact(HeaderValue::from_static("https://draw.example.com"))
    );
}

#[test]
fn wildcard_origin_admits_any() {
    let config = ServerConfig::from_lookup(lookup(&[("FRONTEND_URL", "*")])).expect("wildcard");
    assert_eq!(config.frontend_origin, AllowedOrigin::Any);
}

#[test]
fn invalid_port_is_rejected() {
    let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).expect_err("bad port");
    assert!(matches!(err, ConfigError::InvalidPort(raw) if raw == "eighty"));

    assert!(ServerConfig::from_lookup(lookup(&[("PORT", "70000")])).is_err());
}

#[test]
fn invalid_origin_is_rejected() {
    let err = ServerConfig::from_lookup(lookup(&[("FRONTEND_URL", "http://bad\nhost")])).expect_err("bad origin");
    assert!(matches!(err, ConfigError::InvalidOrigin(_)));
}
