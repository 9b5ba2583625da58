//! Gate master data commands.

use lalin_admin::api::LalinApiClient;
use lalin_core::listing::filter_items;
use lalin_core::{BranchId, GateDraft, GateId, GateKey, GateRecord};

use super::CliError;

/// Print the gates whose name or branch name contains `search`.
///
/// # Errors
///
/// Returns `CliError::Api` if the backend cannot be reached.
pub async fn list(api: &LalinApiClient, search: &str) -> Result<(), CliError> {
    let gates = api.list_gates().await?;
    let matching = filter_items(&gates, search);
    tracing::info!(total = gates.len(), shown = matching.len(), "Loaded gates");

    #[allow(clippy::print_stdout)]
    {
        print!("{}", format_table(&matching));
    }
    Ok(())
}

/// Validate and create a gate.
///
/// # Errors
///
/// Returns `CliError::Validation` before any request if a field is blank or
/// an id is not an integer.
pub async fn create(api: &LalinApiClient, draft: GateDraft) -> Result<(), CliError> {
    let gate = draft.validate()?;
    api.create_gate(&gate).await?;
    tracing::info!(id = %gate.id, "Gate created");
    Ok(())
}

/// Validate and update a gate.
///
/// # Errors
///
/// Same as [`create`].
pub async fn update(api: &LalinApiClient, draft: GateDraft) -> Result<(), CliError> {
    let gate = draft.validate()?;
    api.update_gate(&gate).await?;
    tracing::info!(id = %gate.id, "Gate updated");
    Ok(())
}

/// Delete a gate identified by id and branch id.
///
/// # Errors
///
/// Returns `CliError::NotConfirmed` without contacting the backend unless
/// `confirmed` is set.
pub async fn delete(
    api: &LalinApiClient,
    id: i32,
    branch_id: i32,
    confirmed: bool,
) -> Result<(), CliError> {
    if !confirmed {
        return Err(CliError::NotConfirmed("delete a gate"));
    }
    let key = GateKey {
        id: GateId::new(id),
        branch_id: BranchId::new(branch_id),
    };
    api.delete_gate(key).await?;
    tracing::info!(id, branch_id, "Gate deleted");
    Ok(())
}

/// Render gates as an aligned plain-text table.
fn format_table(gates: &[GateRecord]) -> String {
    let name_width = gates
        .iter()
        .map(|g| g.gate_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Nama Gerbang".len());

    let mut out = format!(
        "{:>6}  {:>9}  {:<name_width$}  Nama Cabang\n",
        "ID", "Id Cabang", "Nama Gerbang"
    );
    for gate in gates {
        out.push_str(&format!(
            "{:>6}  {:>9}  {:<name_width$}  {}\n",
            gate.id, gate.branch_id, gate.gate_name, gate.branch_name
        ));
    }
    out
}
