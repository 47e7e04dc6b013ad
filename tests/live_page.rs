use std::time::{Duration, Instant};
use yen_to_euro::rate::{FixedRate, RateResolver, RateStore, STORAGE_KEY};
use yen_to_euro::{BrowserSession, ConversionContext, LaunchOptions, Orchestrator, Page, RateSource, Trigger};

fn data_url(html: &str) -> String {
    format!("data:text/html;charset=utf-8,{}", urlencoding::encode(html))
}

fn context() -> ConversionContext {
    ConversionContext::new(0.00577, RateSource::Override).unwrap()
}

fn body_text(session: &BrowserSession) -> String {
    let value = session
        .tab()
        .unwrap()
        .evaluate("document.body.innerText", false)
        .unwrap()
        .value
        .unwrap();
    value.as_str().unwrap().to_string()
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_live_page_annotation() {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true))
        .expect("Failed to launch browser");

    session
        .navigate(&data_url("<html><body><p>Price: <span>¥</span><b>5,000</b> per night</p><script>var x = '¥999';</script></body></html>"))
        .expect("Failed to navigate");

    let mut page = session.page(true).expect("Failed to get page");
    let mut orchestrator = Orchestrator::new().with_context(context());
    orchestrator.enqueue(Trigger::Load);
    orchestrator.process_pending(&mut page);

    let text = body_text(&session);
    assert!(text.contains("(28,85\u{a0}€) ¥"), "unexpected body text: {}", text);

    // script content is not rendered and stays untouched
    let script = session
        .tab()
        .unwrap()
        .evaluate("document.querySelector('script').textContent", false)
        .unwrap()
        .value
        .unwrap();
    assert_eq!(script.as_str(), Some("var x = '¥999';"));
}

#[test]
#[ignore]
fn test_snapshot_contains_marker_after_pass() {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true))
        .expect("Failed to launch browser");
    session
        .navigate(&data_url("<html><body><div id='price'>¥1,234</div></body></html>"))
        .expect("Failed to navigate");

    let mut page = session.page(true).expect("Failed to get page");
    let orchestrator = Orchestrator::new().with_context(context());
    orchestrator.run_pass(Trigger::Load, &mut page).expect("pass failed");

    let doc = page.snapshot().expect("Failed to snapshot");
    let json = doc.to_json().unwrap();
    assert!(json.contains("data-yen-to-euro-converted"));
    assert!(json.contains("(7,12\u{a0}€) ¥1,234"));

    // second pass changes nothing
    let report = orchestrator.run_pass(Trigger::Click, &mut page).unwrap().unwrap();
    assert_eq!(report.annotated, 0);
    assert_eq!(report.already_marked, 1);
}

#[test]
#[ignore]
fn test_click_trigger_converts_revealed_price() {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true))
        .expect("Failed to launch browser");
    session
        .navigate(&data_url(
            "<html><body><button id='show' onclick=\"document.getElementById('out').textContent = '¥ 12 345'\">Show</button><p id='out'></p></body></html>",
        ))
        .expect("Failed to navigate");

    let mut page = session.page(false).expect("Failed to get page");
    page.install_triggers().expect("Failed to install triggers");
    let mut orchestrator = Orchestrator::new().observe_mutations(false).with_context(context());

    session
        .tab()
        .unwrap()
        .evaluate("document.getElementById('show').click()", false)
        .expect("Failed to click");

    let deadline = Instant::now() + Duration::from_millis(500);
    orchestrator.run(&mut page, Duration::from_millis(50), Some(deadline));

    assert!(body_text(&session).contains("(71,23\u{a0}€) ¥ 12 345"));
}

#[test]
#[ignore]
fn test_local_storage_rate_cache() {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true))
        .expect("Failed to launch browser");
    // localStorage needs a real origin
    session.navigate("https://example.com").expect("Failed to navigate");

    let store = session.local_storage().expect("Failed to get storage");
    let context = RateResolver::new(&FixedRate(0.0061), &store).resolve("2026-10-19");
    assert_eq!(context.rate(), 0.0061);

    let cached = store.get(STORAGE_KEY).unwrap().expect("rate not cached");
    assert!(cached.contains("2026-10-19"));
}
