/// Checks that `name` can be sent as a DNS question name.
///
/// Accepts an optional trailing root dot and underscore labels
/// (`_dmarc.example.com`).
pub fn validate_domain_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim_end_matches('.');
    if trimmed.is_empty() {
        return Err("Domain name cannot be empty".to_string());
    }
    if trimmed.len() > 253 {
        return Err("Domain name cannot exceed 253 characters".to_string());
    }

    for label in trimmed.split('.') {
        if label.is_empty() {
            return Err(format!("Domain '{name}' contains an empty label"));
        }
        if label.len() > 63 {
            return Err(format!("Label '{label}' exceeds 63 characters"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("Label '{label}' cannot start or end with '-'"));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(format!("Label '{label}' contains invalid characters"));
        }
    }

    Ok(())
}
