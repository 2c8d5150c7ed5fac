use super::*;

#[test]
fn https_page_maps_to_wss() {
    let page = PageLocation::parse("https://chat.example.com/recipes/12").expect("parse");
    assert!(page.is_secure());
    assert_eq!(page.ws_endpoint(), "wss://chat.example.com/recipes/12");
}

#[test]
fn http_page_maps_to_ws_and_keeps_port() {
    let page = PageLocation::parse("http://127.0.0.1:3000/room").expect("parse");
    assert_eq!(page.host, "127.0.0.1:3000");
    assert_eq!(page.ws_endpoint(), "ws://127.0.0.1:3000/room");
}

#[test]
fn websocket_urls_are_their_own_endpoint() {
    let plain = PageLocation::parse("ws://localhost:3000/room").expect("parse");
    assert_eq!(plain.ws_endpoint(), "ws://localhost:3000/room");
    let secure = PageLocation::parse("wss://chat.example.com/").expect("parse");
    assert!(secure.is_secure());
    assert_eq!(secure.ws_endpoint(), "wss://chat.example.com/");
}

#[test]
fn rejects_schemes_without_websocket_counterpart() {
    let err = PageLocation::parse("file://localhost/index.html").expect_err("should fail");
    assert!(matches!(err, EndpointError::UnsupportedScheme(ref scheme) if scheme == "file"));
}

#[test]
fn scheme_match_is_case_insensitive() {
    let page = PageLocation::parse("HTTPS://Example.com/").expect("parse");
    assert_eq!(page.ws_endpoint(), "wss://Example.com/");
}

#[test]
fn query_and_fragment_are_dropped() {
    let page = PageLocation::parse("https://example.com/chat?token=abc#bottom").expect("parse");
    assert_eq!(page.path, "/chat");
    assert_eq!(page.ws_endpoint(), "wss://example.com/chat");
}

#[test]
fn missing_path_defaults_to_root() {
    let page = PageLocation::parse("http://example.com?x=1").expect("parse");
    assert_eq!(page.path, "/");
    assert_eq!(page.ws_endpoint(), "ws://example.com/");
}

#[test]
fn rejects_url_without_scheme() {
    let err = PageLocation::parse("example.com/chat").expect_err("should fail");
    assert!(matches!(err, EndpointError::InvalidPageUrl(_)));
}

#[test]
fn rejects_url_without_host() {
    let err = PageLocation::parse("http:///chat").expect_err("should fail");
    assert!(matches!(err, EndpointError::InvalidPageUrl(_)));
}
