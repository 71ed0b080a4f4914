// Property tests for the in-memory relation
// Rows are stored as given; reads always come back one value per column

use fitdesk_core::model::Value;
use fitdesk_store::Relation;
use proptest::prelude::*;

fn cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::Integer),
        "[a-z]{0,6}".prop_map(Value::Text),
    ]
}

proptest! {
    #[test]
    fn rows_read_back_at_column_width(
        width in 1usize..6,
        rows in prop::collection::vec(prop::collection::vec(cell(), 0..9), 0..8),
    ) {
        let mut rel = Relation::new("t");
        rel.set_columns((0..width).map(|i| format!("c{i}")));
        for row in &rows {
            rel.add_row(row.clone());
        }

        prop_assert_eq!(rel.row_count(), rows.len());
        for (i, row) in rows.iter().enumerate() {
            let read = rel.get_row(i);
            prop_assert_eq!(read.len(), width);
            for (c, value) in read.iter().enumerate() {
                prop_assert_eq!(value, row.get(c).unwrap_or(&Value::Null));
            }
        }
        prop_assert!(rel.get_row(rows.len()).is_empty());
    }

    #[test]
    fn contains_finds_every_stored_integer(values in prop::collection::vec(any::<i64>(), 1..10)) {
        let mut rel = Relation::new("t");
        rel.set_columns(["id"]);
        for v in &values {
            rel.add_row(vec![Value::Integer(*v)]);
        }
        for v in &values {
            prop_assert!(rel.contains("ID", &Value::Text(v.to_string())));
        }
        prop_assert!(!rel.contains("id", &Value::Null));
    }
}
