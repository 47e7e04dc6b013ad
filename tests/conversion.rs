use yen_to_euro::dom::MARKER_ATTRIBUTE;
use yen_to_euro::rate::{DEFAULT_RATE, MemoryStore, RateProvider, RateResolver};
use yen_to_euro::{ConversionContext, Converter, ConverterError, Document, DocumentPage, Orchestrator, RateSource, Trigger};

fn converter(rate: f64) -> Converter {
    Converter::new(ConversionContext::new(rate, RateSource::Override).unwrap())
}

struct OfflineProvider;

impl RateProvider for OfflineProvider {
    fn fetch_rate(&self) -> yen_to_euro::Result<f64> {
        Err(ConverterError::RateFetchFailed("network unreachable".to_string()))
    }
}

#[test]
fn test_single_node_amount_is_prefixed() {
    let mut doc = Document::new("body");
    let root = doc.root();
    let p = doc.append_element(root, "p");
    let price = doc.append_text(p, "¥1,234");

    converter(0.00577).run_pass(&mut doc);

    assert_eq!(doc.text(price), Some("(7,12\u{a0}€) ¥1,234"));
}

#[test]
fn test_symbol_and_amount_in_sibling_nodes() {
    let mut doc = Document::new("body");
    let root = doc.root();
    let p = doc.append_element(root, "p");
    let a = doc.append_text(p, "Price: ¥");
    let b = doc.append_text(p, "5,000 per night");

    let report = converter(0.00577).run_pass(&mut doc);

    // 5000 * 0.00577 = 28.85
    assert_eq!(doc.text(a), Some("(28,85\u{a0}€) Price: ¥"));
    assert_eq!(doc.text(b), Some("5,000 per night"));
    assert_eq!(report.annotated, 1);
}

#[test]
fn test_amount_across_element_boundary() {
    // <div><span>¥</span><span><b>12,000</b></span></div>
    let mut doc = Document::new("body");
    let root = doc.root();
    let div = doc.append_element(root, "div");
    let symbol_span = doc.append_element(div, "span");
    let symbol = doc.append_text(symbol_span, "¥");
    let amount_span = doc.append_element(div, "span");
    doc.append_element_with_text(amount_span, "b", "12,000");

    converter(0.006).run_pass(&mut doc);

    assert_eq!(doc.text(symbol), Some("(72,00\u{a0}€) ¥"));
    assert_eq!(doc.get_attribute(symbol_span, MARKER_ATTRIBUTE), Some("true"));
}

#[test]
fn test_non_numeric_neighbour_leaves_text_alone() {
    let mut doc = Document::new("body");
    let root = doc.root();
    let p = doc.append_element(root, "p");
    let text = doc.append_text(p, "¥N/A");

    converter(0.00577).run_pass(&mut doc);

    assert_eq!(doc.text(text), Some("¥N/A"));
}

#[test]
fn test_two_passes_annotate_once() {
    let mut doc = Document::new("body");
    let root = doc.root();
    let first = doc.append_element_with_text(root, "p", "¥1,234");
    doc.append_element_with_text(root, "p", "Total: 2,000 ¥");

    let converter = converter(0.00577);
    let first_report = converter.run_pass(&mut doc);
    let after_first = doc.text_content(root);
    let second_report = converter.run_pass(&mut doc);

    assert_eq!(first_report.annotated, 2);
    assert_eq!(second_report.annotated, 0);
    assert_eq!(second_report.already_marked, 2);
    assert_eq!(doc.text_content(root), after_first);
    assert_eq!(doc.text_content(first), "(7,12\u{a0}€) ¥1,234");
    assert_eq!(after_first.matches('€').count(), 2);
}

#[test]
fn test_space_grouped_amount() {
    let mut doc = Document::new("body");
    let root = doc.root();
    let p = doc.append_element(root, "p");
    let text = doc.append_text(p, "¥ 12 345");

    converter(0.00577).run_pass(&mut doc);

    assert_eq!(doc.text(text), Some("(71,23\u{a0}€) ¥ 12 345"));
}

#[test]
fn test_script_content_is_never_touched() {
    let mut doc = Document::new("body");
    let root = doc.root();
    let script = doc.append_element(root, "script");
    let code = doc.append_text(script, "var price = '¥999';");

    let report = converter(0.00577).run_pass(&mut doc);

    assert_eq!(doc.text(code), Some("var price = '¥999';"));
    assert_eq!(doc.get_attribute(script, MARKER_ATTRIBUTE), None);
    assert_eq!(report.skipped_non_visible, 1);
    assert!(doc.changes().is_empty());
}

#[test]
fn test_failed_rate_fetch_uses_default_and_completes() {
    let store = MemoryStore::new();
    let context = RateResolver::new(&OfflineProvider, &store).resolve("2026-10-19");
    assert_eq!(context.rate(), DEFAULT_RATE);

    let mut doc = Document::new("body");
    let root = doc.root();
    let a = doc.append_element_with_text(root, "p", "¥1,234");
    let b = doc.append_element_with_text(root, "p", "¥ 12 345");

    let report = Converter::new(context).run_pass(&mut doc);

    assert_eq!(report.annotated, 2);
    assert_eq!(doc.text_content(a), "(7,12\u{a0}€) ¥1,234");
    assert_eq!(doc.text_content(b), "(71,23\u{a0}€) ¥ 12 345");
}

#[test]
fn test_backward_search_only_without_forward_match() {
    let mut doc = Document::new("body");
    let root = doc.root();
    let p = doc.append_element(root, "p");
    // forward finds 300 after the sign, the 100 before it is ignored
    let text = doc.append_text(p, "100 ¥300");

    converter(0.01).run_pass(&mut doc);

    assert_eq!(doc.text(text), Some("(3,00\u{a0}€) 100 ¥300"));
}

#[test]
fn test_parent_scoped_marker_skips_second_mention() {
    let mut doc = Document::new("body");
    let root = doc.root();
    let p = doc.append_element(root, "p");
    let first = doc.append_text(p, "¥100");
    doc.append_element(p, "br");
    let second = doc.append_text(p, "¥200");

    let report = converter(0.01).run_pass(&mut doc);

    assert_eq!(doc.text(first), Some("(1,00\u{a0}€) ¥100"));
    assert_eq!(doc.text(second), Some("¥200"));
    assert_eq!(report.already_marked, 1);
}

#[test]
fn test_unresolved_symbol_reaches_top() {
    let mut doc = Document::new("body");
    let root = doc.root();
    let p = doc.append_element(root, "p");
    let text = doc.append_text(p, "¥");

    let report = converter(0.01).run_pass(&mut doc);

    assert_eq!(doc.text(text), Some("¥"));
    assert_eq!(report.unmatched, 1);
}

#[test]
fn test_snapshot_file_round_trip_through_orchestrator() {
    let snapshot = r#"[
        {"type": "element", "id": 0, "tag": "html"},
        {"type": "element", "id": 1, "parent": 0, "tag": "head"},
        {"type": "element", "id": 2, "parent": 1, "tag": "title"},
        {"type": "text", "id": 3, "parent": 2, "text": "¥ shop"},
        {"type": "element", "id": 4, "parent": 0, "tag": "body"},
        {"type": "element", "id": 5, "parent": 4, "tag": "span"},
        {"type": "text", "id": 6, "parent": 5, "text": "¥"},
        {"type": "text", "id": 7, "parent": 4, "text": " 3,980"}
    ]"#;
    let doc = Document::from_json(snapshot).unwrap();
    let mut page = DocumentPage::new(doc);
    let mut orchestrator = Orchestrator::new()
        .with_context(ConversionContext::new(0.00577, RateSource::Override).unwrap());

    orchestrator.enqueue(Trigger::Load);
    orchestrator.enqueue(Trigger::Click);
    orchestrator.process_pending(&mut page);

    let json: serde_json::Value = serde_json::from_str(&page.document().to_json().unwrap()).unwrap();
    // 3980 * 0.00577 = 22.9646
    assert_eq!(json[6]["text"], "(22,96\u{a0}€) ¥");
    assert_eq!(json[5]["attributes"][MARKER_ATTRIBUTE], "true");
    // the head is outside the body and never scanned
    assert_eq!(json[3]["text"], "¥ shop");
}

#[test]
fn test_deeply_nested_price_is_converted() {
    let mut entries = vec![r#"{"type":"element","id":0,"tag":"body"}"#.to_string()];
    for depth in 1..=250 {
        entries.push(format!(r#"{{"type":"element","id":{depth},"parent":{},"tag":"div"}}"#, depth - 1));
    }
    entries.push(r#"{"type":"text","id":251,"parent":250,"text":"¥1,000"}"#.to_string());

    let mut doc = Document::from_json(&format!("[{}]", entries.join(","))).unwrap();
    let report = converter(0.00577).run_pass(&mut doc);

    assert_eq!(report.annotated, 1);
    assert_eq!(doc.text_content(doc.root()), "(5,77\u{a0}€) ¥1,000");
}

#[test]
fn test_amount_split_after_grouping_comma() {
    let mut doc = Document::new("body");
    let root = doc.root();
    let p = doc.append_element(root, "p");
    let head = doc.append_text(p, "¥1,");
    doc.append_text(p, "234");

    converter(0.01).run_pass(&mut doc);

    assert_eq!(doc.text(head), Some("(12,34\u{a0}€) ¥1,"));
}

#[test]
fn test_huge_amount_is_formatted_in_full() {
    let mut doc = Document::new("body");
    let root = doc.root();
    let p = doc.append_element(root, "p");
    let text = doc.append_text(p, "¥100,000,000,000,000,000,000");

    converter(0.5).run_pass(&mut doc);

    assert_eq!(
        doc.text(text),
        Some("(50.000.000.000.000.000.000,00\u{a0}€) ¥100,000,000,000,000,000,000")
    );
}

#[test]
fn test_overflowing_amount_is_left_alone() {
    let digits = "9".repeat(400);
    let mut doc = Document::new("body");
    let root = doc.root();
    let p = doc.append_element(root, "p");
    let text = doc.append_text(p, format!("¥{digits}"));

    let report = converter(0.00577).run_pass(&mut doc);

    assert_eq!(doc.text(text), Some(format!("¥{digits}").as_str()));
    assert_eq!(report.unmatched, 1);
}
