use summa_core::errors::FormatError;
use summa_core::ledger::{
    Calculation, Denomination, ExtendedItem, LedgerItem, LineItem, LsdStrings, SubtotalItem,
};
use summa_core::persist;
use summa_core::storage::CalculationStore;
use tempfile::TempDir;
use uuid::Uuid;

fn sample_forest() -> Calculation {
    // Three levels of nesting with mixed line and extended children.
    let deep_line = LineItem::from_parts(Uuid::new_v4(), "Candles", LsdStrings::new("", "", "ix"));
    let deep = SubtotalItem::from_parts(
        Uuid::new_v4(),
        "Sundries",
        vec![
            LedgerItem::Line(deep_line),
            LedgerItem::Line(LineItem::empty()),
        ],
    );
    let extended = ExtendedItem::empty()
        .with_field(Denomination::Shillings, "ij")
        .with_quantity("iij");
    let middle = SubtotalItem::from_parts(
        Uuid::new_v4(),
        "Kitchen",
        vec![LedgerItem::Subtotal(deep), LedgerItem::Extended(extended)],
    );
    let outer = SubtotalItem::from_parts(
        Uuid::new_v4(),
        "Michaelmas quarter",
        vec![
            LedgerItem::Subtotal(middle),
            LedgerItem::Line(LineItem::empty().with_field(Denomination::Pounds, "i")),
        ],
    );
    Calculation::from_lines(vec![
        LedgerItem::Subtotal(outer),
        LedgerItem::Line(LineItem::empty().with_field(Denomination::Pence, "v")),
    ])
}

#[test]
fn nested_forest_round_trips_field_for_field() {
    let original = sample_forest();
    let json = persist::to_json(&original).expect("serialize");
    let restored = persist::parse(&json).expect("parse");
    assert_eq!(restored, original);
}

#[test]
fn envelope_carries_app_tag_and_version() {
    let document = persist::to_document(&Calculation::new());
    assert_eq!(document.metadata.app_name, "summa");
    assert_eq!(document.metadata.version, env!("CARGO_PKG_VERSION"));

    let json = serde_json::to_value(&document).expect("serializable");
    assert!(json["metadata"]["savedAt"].is_string());
    assert!(json["lines"].is_array());
}

#[test]
fn saved_records_match_the_wire_shapes() {
    let json = persist::to_json(&sample_forest()).expect("serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("json");

    let outer = &value["lines"][0];
    assert_eq!(outer["itemType"], "SUBTOTAL_ITEM");
    assert_eq!(outer["title"], "Michaelmas quarter");
    assert!(outer.get("totalPence").is_none());
    assert!(outer.get("totalDisplay").is_none());

    let middle = &outer["lines"][0];
    let extended = &middle["lines"][1];
    assert_eq!(extended["itemType"], "EXTENDED_ITEM");
    assert_eq!(extended["literals"]["s"], "ij");
    assert_eq!(extended["quantity"], "iij");
    assert!(extended.get("basePence").is_none());
    assert!(extended.get("quantityError").is_none());
}

#[test]
fn derived_totals_are_recomputed_on_load() {
    let original = sample_forest();
    let json = persist::to_json(&original).expect("serialize");
    let restored = persist::parse(&json).expect("parse");

    // 9d + (2s × 3 = 72d) + 240d + 5d
    assert_eq!(restored.total_pence, 326);
    let LedgerItem::Subtotal(outer) = &restored.lines[0] else {
        panic!("expected the outer subtotal");
    };
    assert_eq!(outer.total_pence, 321);
    assert!(!outer.error);
}

#[test]
fn stored_literals_are_revalidated_rather_than_trusted() {
    let id = Uuid::new_v4();
    let json = format!(
        r#"{{
            "metadata": {{ "appName": "summa", "version": "0.9.0", "savedAt": "2026-02-03T10:00:00.000Z" }},
            "lines": [
                {{ "id": "{id}", "itemType": "LINE_ITEM", "title": "", "literals": {{ "l": "", "s": "", "d": "vv" }} }}
            ]
        }}"#
    );
    let restored = persist::parse(&json).expect("parse");
    assert!(restored.has_error);
    assert_eq!(restored.total_pence, 0);
    let LedgerItem::Line(line) = &restored.lines[0] else {
        panic!("expected a line item");
    };
    assert!(line.field_errors.d);
    // The bad literal survives verbatim so the user can correct it.
    assert_eq!(line.literals.d, "vv");
}

#[test]
fn format_errors_name_their_cause() {
    assert_eq!(
        persist::parse("<html>").expect_err("not json").to_string(),
        "Not a valid JSON file"
    );
    assert_eq!(
        persist::parse(r#"{ "metadata": { "appName": "ledgerly" }, "lines": [] }"#)
            .expect_err("wrong app")
            .to_string(),
        "Not a Summa file"
    );
    assert_eq!(
        persist::parse(r#"{ "metadata": { "appName": "summa" } }"#)
            .expect_err("no lines")
            .to_string(),
        "Invalid file format: missing lines"
    );

    let id = Uuid::new_v4();
    let json = format!(
        r#"{{
            "metadata": {{ "appName": "summa" }},
            "lines": [ {{ "id": "{id}", "itemType": "SUBTOTAL_ITEM", "title": "x" }} ]
        }}"#
    );
    assert_eq!(
        persist::parse(&json).expect_err("no children").to_string(),
        "Invalid subtotal item: missing lines"
    );

    let json = r#"{
        "metadata": { "appName": "summa" },
        "lines": [ { "id": "not-a-uuid", "itemType": "LINE_ITEM", "literals": { "l": "", "s": "", "d": "" } } ]
    }"#;
    assert!(matches!(
        persist::parse(json).expect_err("bad id"),
        FormatError::MalformedId { kind: "line", .. }
    ));
}

#[test]
fn a_failed_parse_leaves_the_caller_state_untouched() {
    let current = sample_forest();
    let before = current.clone();
    assert!(persist::parse("{ broken").is_err());
    assert_eq!(current, before);
}

#[test]
fn store_round_trips_named_calculations() {
    let temp = TempDir::new().expect("temp dir");
    let store = CalculationStore::new(Some(temp.path().to_path_buf())).expect("store");

    let original = sample_forest();
    let path = store.save_named(&original, "Quarter Day").expect("save");
    assert!(path.ends_with("quarter_day.json"));

    let loaded = store.load_named("Quarter Day").expect("load");
    assert_eq!(loaded, original);
    assert_eq!(store.list_saved().expect("list"), vec!["quarter_day"]);
}
