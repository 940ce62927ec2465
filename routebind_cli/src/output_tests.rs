use super::*;

fn sample_states() -> Vec<State> {
    vec![
        State {
            name: "Alabama".to_string(),
            id: 1,
        },
        State {
            name: "Alaska".to_string(),
            id: 2,
        },
    ]
}

#[test]
fn test_state_rows_keep_order() {
    let rows = build_state_rows(&sample_states());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[1].name, "Alaska");
}

#[test]
fn test_states_table_has_headers_and_values() {
    let table = states_table(&sample_states());
    assert!(table.contains("ID"));
    assert!(table.contains("Name"));
    assert!(table.contains("Alabama"));
    assert!(table.contains("Alaska"));
}

#[test]
fn test_states_table_empty() {
    let table = states_table(&[]);
    assert!(table.contains("Name"));
    assert!(!table.contains("Alabama"));
}

#[test]
fn test_states_summary() {
    assert_eq!(states_summary(&[]), "0 states");
    assert_eq!(states_summary(&sample_states()[..1]), "1 state");
    assert_eq!(states_summary(&sample_states()), "2 states");
}
