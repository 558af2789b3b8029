use crate::domain::Program;
use crate::errors::ServerError;

/// Pretty-printed array of the full canonical records.
pub fn programs_to_json<P: AsRef<Program>>(programs: &[P]) -> Result<String, ServerError> {
    let refs: Vec<&Program> = programs.iter().map(AsRef::as_ref).collect();
    serde_json::to_string_pretty(&refs)
        .map_err(|e| ServerError::ExportError(format!("Failed to serialize programs: {e}")))
}
