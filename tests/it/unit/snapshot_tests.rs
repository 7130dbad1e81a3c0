//! Snapshot tests using the insta crate.
//!
//! Snapshots pin the serialized shapes other systems depend on: the keyword
//! arguments of a search/read call and the cell values of a formatted row.
//!
//! To update snapshots after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```

use serde_json::{json, Map};
use sheetlist::data::Reload;
use sheetlist::types::{ListDefinition, OrderBy, SearchParams};

use crate::helpers::{order_fields, order_names, TestListBuilder};

#[test]
fn snapshot_fetch_request() {
    let mut context = Map::new();
    context.insert("lang".to_string(), json!("en_US"));
    let search = SearchParams::default()
        .with_domain(json!([["state", "=", "sale"]]))
        .with_order(vec![OrderBy::desc("date_order"), OrderBy::asc("name")])
        .with_context(context);
    let definition = ListDefinition::new("sale.order")
        .with_columns(["name", "price"])
        .with_fields(order_fields())
        .with_search(search)
        .with_limit(5);

    let mut source = sheetlist::data::ListDataSource::new(definition, order_names());
    let Reload::Fetch(request) = source.begin_reload() else {
        panic!("expected a fetch");
    };

    insta::assert_json_snapshot!(request, @r#"
    {
      "model": "sale.order",
      "domain": [
        [
          "state",
          "=",
          "sale"
        ]
      ],
      "fields": [
        "name",
        "price",
        "currency_id"
      ],
      "order": "date_order DESC, name ASC",
      "limit": 5,
      "context": {
        "lang": "en_US"
      }
    }
    "#);
}

#[test]
fn snapshot_formatted_first_row() {
    let columns = ["name", "partner_id", "tag_ids", "state", "locked"];
    let mut session = TestListBuilder::new()
        .with_columns(&columns)
        .loaded_session();

    let row: Vec<String> = columns
        .iter()
        .map(|field| {
            session
                .get_list_cell_value(0, field)
                .unwrap()
                .ready()
                .expect("loaded")
                .to_string()
        })
        .collect();

    insta::assert_json_snapshot!(row, @r#"
    [
      "S00001",
      "Alice",
      "A, B",
      "Sales Order",
      "TRUE"
    ]
    "#);
}
