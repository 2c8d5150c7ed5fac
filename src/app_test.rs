use super::*;

fn config(page_url: &str) -> Config {
    Config { page_url: page_url.to_owned(), connect: false, json: false }
}

fn strip_timestamps(out: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(out)
        .lines()
        .map(|line| line.split_once(") ").map_or(line, |(_, rest)| rest).to_owned())
        .collect()
}

#[tokio::test]
async fn scripted_session_without_connection() {
    let mut out = Vec::new();
    let input: &[u8] = b"/status\n\nhello\n/disconnect\n/quit\nnever read\n";

    run_with(config("http://127.0.0.1:9/"), input, &mut out).await.expect("run");

    assert_eq!(
        strip_timestamps(&out),
        vec![
            "[disconnected]",
            "[disconnected]",
            "error: cannot send while disconnected",
        ]
    );
}

#[tokio::test]
async fn end_of_input_stops_the_loop() {
    let mut out = Vec::new();
    let input: &[u8] = b"";

    run_with(config("http://127.0.0.1:9/"), input, &mut out).await.expect("run");
    assert_eq!(strip_timestamps(&out), vec!["[disconnected]"]);
}

#[tokio::test]
async fn invalid_page_url_is_rejected_before_io() {
    let mut out = Vec::new();
    let input: &[u8] = b"/quit\n";

    let err = run_with(config("not a url"), input, &mut out).await.expect_err("should fail");
    assert!(matches!(err, AppError::Endpoint(EndpointError::InvalidPageUrl(_))));
    assert!(out.is_empty());
}
