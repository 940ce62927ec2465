use routebind_clients::State;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct StateRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
}

fn build_state_rows(states: &[State]) -> Vec<StateRow> {
    states
        .iter()
        .map(|s| StateRow {
            id: s.id,
            name: s.name.clone(),
        })
        .collect()
}

/// Renders states as a table with one row per state.
pub fn states_table(states: &[State]) -> String {
    let mut table = Table::new(build_state_rows(states));
    table.with(Style::sharp());
    table.to_string()
}

/// Summary line printed above the state table.
pub fn states_summary(states: &[State]) -> String {
    match states.len() {
        1 => "1 state".to_string(),
        n => format!("{} states", n),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
