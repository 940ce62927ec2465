use std::io::Write;

use anyhow::Result;
use routebind_clients::StateDataClient;

use crate::output::{states_summary, states_table};

/// Lists all states and prints them. A failed call is logged and the demo
/// carries on; only write failures are returned.
pub async fn run(client: &StateDataClient, out: &mut impl Write) -> Result<()> {
    match client.all_states().await {
        Ok(list) => {
            writeln!(out, "{}", states_summary(&list.states))?;
            writeln!(out, "{}", states_table(&list.states))?;
        }
        Err(e) => tracing::error!("Failed to list states: {}", e),
    }
    Ok(())
}
