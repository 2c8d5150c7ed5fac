use super::*;

#[test]
fn defaults_point_at_local_relay() {
    let cfg = Config::try_parse_from(["wschat"]).expect("parse");
    assert_eq!(cfg.page_url, DEFAULT_PAGE_URL);
    assert!(!cfg.connect);
    assert_eq!(cfg.output_format(), OutputFormat::Text);
}

#[test]
fn flags_override_defaults() {
    let cfg = Config::try_parse_from([
        "wschat",
        "--page-url",
        "https://chat.example.com/room",
        "--connect",
        "--json",
    ])
    .expect("parse");
    assert_eq!(cfg.page_url, "https://chat.example.com/room");
    assert!(cfg.connect);
    assert_eq!(cfg.output_format(), OutputFormat::Json);
}

#[test]
fn unknown_flag_is_rejected() {
    assert!(Config::try_parse_from(["wschat", "--retry"]).is_err());
}
