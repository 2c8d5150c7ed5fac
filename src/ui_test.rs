use super::*;
use time::macros::datetime;

#[test]
fn parse_input_maps_slash_commands() {
    assert_eq!(parse_input("/connect"), Some(Input::Command(Command::Connect)));
    assert_eq!(parse_input("/disconnect\n"), Some(Input::Command(Command::Disconnect)));
    assert_eq!(parse_input("  /toggle "), Some(Input::Toggle));
    assert_eq!(parse_input("/status"), Some(Input::Status));
    assert_eq!(parse_input("/quit"), Some(Input::Quit));
    assert_eq!(parse_input("/exit"), Some(Input::Quit));
}

#[test]
fn parse_input_keeps_chat_text_verbatim() {
    assert_eq!(
        parse_input("  hello there \r\n"),
        Some(Input::Command(Command::SendText("  hello there ".to_owned())))
    );
    assert_eq!(
        parse_input("/shrug"),
        Some(Input::Command(Command::SendText("/shrug".to_owned())))
    );
}

#[test]
fn parse_input_skips_blank_lines() {
    assert_eq!(parse_input(""), None);
    assert_eq!(parse_input("   \n"), None);
}

#[test]
fn event_lines_match_log_format() {
    assert_eq!(
        event_line(&DomainEvent::Connected { name: "Brave Otter".to_owned() }),
        "Connected as Brave Otter"
    );
    assert_eq!(
        event_line(&DomainEvent::Disconnected { name: "Brave Otter".to_owned() }),
        "Disconnected Brave Otter"
    );
    assert_eq!(event_line(&DomainEvent::TransportClosed), "Disconnected.");
    assert_eq!(event_line(&DomainEvent::PeerJoined { name: "bob".to_owned() }), "Joined bob");
    assert_eq!(
        event_line(&DomainEvent::MessageReceived { name: "alice".to_owned(), text: "hi".to_owned() }),
        "alice: hi"
    );
}

#[test]
fn status_line_shows_identity_only_when_connected() {
    assert_eq!(status_line(ConnectionStatus::Disconnected, "UNKNOWN"), "disconnected");
    assert_eq!(status_line(ConnectionStatus::Connecting, "UNKNOWN"), "connecting");
    assert_eq!(status_line(ConnectionStatus::Connected, "alice"), "connected (alice)");
}

#[test]
fn timestamp_prefix_is_zero_padded() {
    assert_eq!(timestamp_prefix(datetime!(2024-03-05 07:08:09 UTC)), "(07:08:09) ");
}

#[test]
fn text_view_writes_timestamped_lines() {
    let mut view = ChatView::new(Vec::new(), OutputFormat::Text);
    view.render_event_at(
        &DomainEvent::PeerJoined { name: "bob".to_owned() },
        datetime!(2024-03-05 23:59:01 UTC),
    )
    .expect("render");

    let out = String::from_utf8(view.into_inner()).expect("utf8");
    assert_eq!(out, "(23:59:01) Joined bob\n");
}

#[test]
fn json_view_writes_tagged_events() {
    let mut view = ChatView::new(Vec::new(), OutputFormat::Json);
    view.render_event(&DomainEvent::MessageReceived { name: "alice".to_owned(), text: "hi".to_owned() })
        .expect("render");
    view.render_event(&DomainEvent::TransportClosed).expect("render");

    let out = String::from_utf8(view.into_inner()).expect("utf8");
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(
        lines,
        vec![
            serde_json::json!({"event": "message_received", "name": "alice", "text": "hi"}),
            serde_json::json!({"event": "transport_closed"}),
        ]
    );
}

#[test]
fn error_rendering_names_the_status() {
    let mut view = ChatView::new(Vec::new(), OutputFormat::Text);
    view.render_error(&SessionError::NotConnected(ConnectionStatus::Disconnected))
        .expect("render");

    let out = String::from_utf8(view.into_inner()).expect("utf8");
    assert!(out.ends_with("error: cannot send while disconnected\n"), "got {out:?}");
}

#[test]
fn status_rendering_is_bracketed_in_text_mode() {
    let mut view = ChatView::new(Vec::new(), OutputFormat::Text);
    view.render_status(ConnectionStatus::Connected, "alice").expect("render");

    let out = String::from_utf8(view.into_inner()).expect("utf8");
    assert!(out.ends_with("[connected (alice)]\n"), "got {out:?}");
}
