use serde_json::Value;

/// Check `arguments` against a provider's JSON Schema
///
/// A schema that does not compile is not held against the call: validation
/// is skipped and `Ok` returned. Violations are joined into one message.
pub fn validate_arguments(schema: &Value, arguments: &Value) -> Result<(), String> {
    let Ok(validator) = jsonschema::validator_for(schema) else {
        return Ok(());
    };

    let errors: Vec<String> = validator
        .iter_errors(arguments)
        .map(|e| {
            let path = e.instance_path().to_string();
            if path.is_empty() {
                e.to_string()
            } else {
                format!("{}: {}", path, e)
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}
