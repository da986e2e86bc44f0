use std::path::PathBuf;

use waybill_linkage::config::LinkConfig;
use waybill_linkage::engine::{load_table, run};
use waybill_linkage::model::{LinkInput, LinkResult, Outcome};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_and_run(config_toml: &str) -> LinkResult {
    let dir = fixtures_dir();
    let config = LinkConfig::from_toml(config_toml).unwrap();

    let read = |file: &str| {
        let path = dir.join(file);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
    };
    let input = LinkInput {
        destination: load_table("destination", &read(&config.destination.file)).unwrap(),
        source: load_table("source", &read(&config.source.file)).unwrap(),
    };

    run(&config, &input).unwrap()
}

fn run_inline(config_toml: &str, dest_csv: &str, source_csv: &str) -> LinkResult {
    let config = LinkConfig::from_toml(config_toml).unwrap();
    let input = LinkInput {
        destination: load_table("destination", dest_csv).unwrap(),
        source: load_table("source", source_csv).unwrap(),
    };
    run(&config, &input).unwrap()
}

// -------------------------------------------------------------------------
// Full-pass tests over the shipment fixtures
// -------------------------------------------------------------------------

#[test]
fn shipment_pass_links_by_strongest_evidence() {
    let toml = std::fs::read_to_string(fixtures_dir().join("shipment.link.toml")).unwrap();
    let result = load_and_run(&toml);

    assert_eq!(result.summary.total_rows, 5);
    assert_eq!(result.summary.phone_matched, 3);
    assert_eq!(result.summary.address_matched, 1);
    assert_eq!(result.summary.fallback, 0);
    assert_eq!(result.summary.unmatched, 1);
    assert_eq!(result.summary.duplicate_destination_names, 1);
    assert_eq!(result.summary.duplicate_source_names, 1);

    assert_eq!(
        result.headers,
        vec!["订单号", "收件人", "收件人电话", "收货地址", "商品名称", "运单号", "物流公司", "商品明细"]
    );
}

#[test]
fn shipment_pass_keeps_destination_order() {
    let toml = std::fs::read_to_string(fixtures_dir().join("shipment.link.toml")).unwrap();
    let result = load_and_run(&toml);

    let ids: Vec<&str> = result.rows.iter().map(|r| r.values[0].as_str()).collect();
    assert_eq!(ids, vec!["D001", "D002", "D003", "D004", "D005"]);
    for (i, row) in result.rows.iter().enumerate() {
        assert_eq!(row.dest_index, i);
    }
}

#[test]
fn masked_phones_route_same_name_rows_apart() {
    let toml = std::fs::read_to_string(fixtures_dir().join("shipment.link.toml")).unwrap();
    let result = load_and_run(&toml);

    // Two 王伟 shipments land on the records whose masked phones agree.
    let first = &result.rows[0];
    assert_eq!(first.outcome, Outcome::Phone);
    assert_eq!(first.source_index, Some(0));
    assert_eq!(first.score, Some(25));
    assert_eq!(first.values[5], "SF1001");

    let second = &result.rows[1];
    assert_eq!(second.outcome, Outcome::Phone);
    assert_eq!(second.source_index, Some(1));
    assert_eq!(second.values[5], "SF1002");
}

#[test]
fn address_tier_catches_records_without_phones() {
    let toml = std::fs::read_to_string(fixtures_dir().join("shipment.link.toml")).unwrap();
    let result = load_and_run(&toml);

    // 张强's logistics row has no phone; the masked address still links it.
    let row = &result.rows[3];
    assert_eq!(row.outcome, Outcome::Address);
    assert_eq!(row.source_index, Some(3));
    assert_eq!(row.score, Some(17));
    assert_eq!(row.values[5], "YT2002");
}

#[test]
fn unmatched_rows_blank_fill_added_columns() {
    let toml = std::fs::read_to_string(fixtures_dir().join("shipment.link.toml")).unwrap();
    let result = load_and_run(&toml);

    let row = &result.rows[4];
    assert_eq!(row.outcome, Outcome::NoMatch);
    assert_eq!(row.source_index, None);
    assert_eq!(row.score, None);
    assert_eq!(row.values[0], "D005");
    assert_eq!(&row.values[5..], ["", "", ""]);
}

// -------------------------------------------------------------------------
// Name-only configurations
// -------------------------------------------------------------------------

#[test]
fn name_only_config_falls_back_in_source_order() {
    let toml = r#"
name = "names-only"

[destination]
file = "pending.csv"

[destination.columns]
name = "收件人"

[source]
file = "logistics.csv"

[source.columns]
name = "姓名"

[merge]
columns_to_add = ["运单号"]
"#;
    let result = load_and_run(toml);

    assert_eq!(result.summary.fallback, 4);
    assert_eq!(result.summary.unmatched, 1);
    assert_eq!(result.summary.phone_matched, 0);

    // Same-name rows consume records in source order.
    assert_eq!(result.rows[0].source_index, Some(0));
    assert_eq!(result.rows[1].source_index, Some(1));
    // Fallback rows carry no score.
    assert!(result.rows.iter().all(|r| r.score.is_none()));
}

// -------------------------------------------------------------------------
// Usage bounds and product routing
// -------------------------------------------------------------------------

const USAGE_CONFIG: &str = r#"
name = "usage-bound"

[destination]
file = "unused.csv"

[destination.columns]
name = "收件人"
phone = "电话"

[source]
file = "unused.csv"

[source.columns]
name = "姓名"
phone = "电话"
product = "商品明细"

[merge]
columns_to_add = ["商品明细", "运单号"]
"#;

#[test]
fn multi_product_record_is_bounded_by_entry_count() {
    let result = run_inline(
        USAGE_CONFIG,
        "收件人,电话\n王伟,13800000001\n王伟,13800000001\n王伟,13800000001\n",
        "姓名,电话,商品明细,运单号\n王伟,138****0001,抽纸，湿巾,SF1\n",
    );

    // Two entries feed two rows, each carrying its own entry name; the
    // third row finds the record exhausted.
    assert_eq!(result.rows[0].outcome, Outcome::Phone);
    assert_eq!(result.rows[0].values[2..], ["抽纸", "SF1"]);
    assert_eq!(result.rows[1].values[2..], ["湿巾", "SF1"]);
    assert_eq!(result.rows[2].outcome, Outcome::NoMatch);
    assert_eq!(result.summary.phone_matched, 2);
    assert_eq!(result.summary.unmatched, 1);
}

#[test]
fn product_content_routes_rows_across_records() {
    let toml = r#"
name = "product-routing"

[destination]
file = "unused.csv"

[destination.columns]
name = "收件人"
product = "商品"

[source]
file = "unused.csv"

[source.columns]
name = "姓名"
product = "商品明细"

[merge]
columns_to_add = ["运单号"]
"#;
    let result = run_inline(
        toml,
        "收件人,商品\n王伟,除螨仪\n王伟,盒装抽纸\n",
        "姓名,商品明细,运单号\n王伟,盒装抽纸,SF1\n王伟,除螨仪,SF2\n",
    );

    // Each row is drawn to the record whose product matches, regardless of
    // source order.
    assert_eq!(result.rows[0].outcome, Outcome::Product);
    assert_eq!(result.rows[0].values[2], "SF2");
    assert_eq!(result.rows[1].outcome, Outcome::Product);
    assert_eq!(result.rows[1].values[2], "SF1");
}

// -------------------------------------------------------------------------
// Report JSON shape
// -------------------------------------------------------------------------

#[test]
fn report_json_schema_fields() {
    let toml = std::fs::read_to_string(fixtures_dir().join("shipment.link.toml")).unwrap();
    let result = load_and_run(&toml);
    let json = serde_json::to_value(&result).unwrap();

    let meta = &json["meta"];
    assert!(meta["config_name"].is_string());
    assert!(meta["engine_version"].is_string());
    assert!(meta["run_at"].is_string());

    let summary = &json["summary"];
    for field in [
        "total_rows",
        "phone_matched",
        "address_matched",
        "product_matched",
        "fallback",
        "unmatched",
        "duplicate_destination_names",
        "duplicate_source_names",
    ] {
        assert!(
            summary[field].is_number(),
            "summary.{} must be a number, got {:?}",
            field,
            summary[field]
        );
    }
    assert!(summary["outcome_counts"].is_object());

    assert!(json["headers"].is_array());
    for row in json["rows"].as_array().unwrap() {
        assert!(row["dest_index"].is_number());
        assert!(row["outcome"].is_string());
        assert!(row["values"].is_array());
    }

    // Matched rows expose provenance; unmatched rows omit it entirely.
    let rows = json["rows"].as_array().unwrap();
    assert!(rows[0]["source_index"].is_number());
    assert!(rows[0]["score"].is_number());
    assert!(rows[4].get("source_index").is_none());
    assert!(rows[4].get("score").is_none());
}
