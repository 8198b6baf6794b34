use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// parse_bool
// =============================================================================

#[test]
fn parse_bool_variants() {
    for val in ["1", "true", "YES", " on "] {
        assert_eq!(parse_bool(val), Some(true), "{val:?}");
    }
    for val in ["0", "False", "no", "off"] {
        assert_eq!(parse_bool(val), Some(false), "{val:?}");
    }
    assert_eq!(parse_bool("maybe"), None);
    assert_eq!(parse_bool(""), None);
}

// =============================================================================
// from_lookup
// =============================================================================

#[test]
fn defaults_when_unset() {
    let cfg = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0");
    assert_eq!(cfg.static_dir, PathBuf::from("public"));
    assert!(cfg.guard.login_referer_bypass);
}

#[test]
fn explicit_values() {
    let cfg = ServerConfig::from_lookup(lookup_from(&[
        ("PORT", "8080"),
        ("BIND_ADDR", "127.0.0.1"),
        ("STATIC_DIR", "/srv/app"),
        ("GUARD_LOGIN_REFERER_BYPASS", "false"),
    ]))
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1");
    assert_eq!(cfg.static_dir, PathBuf::from("/srv/app"));
    assert!(!cfg.guard.login_referer_bypass);
}

#[test]
fn invalid_port_is_an_error() {
    let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPort(ref raw) if raw == "eighty"));
}

#[test]
fn invalid_bind_addr_is_an_error() {
    let err = ServerConfig::from_lookup(lookup_from(&[("BIND_ADDR", "localhost")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBindAddr(_)));
}

#[test]
fn invalid_bypass_flag_is_an_error() {
    let err = ServerConfig::from_lookup(lookup_from(&[("GUARD_LOGIN_REFERER_BYPASS", "sometimes")])).unwrap_err();
    assert_eq!(err.to_string(), "invalid boolean for GUARD_LOGIN_REFERER_BYPASS: sometimes");
}
