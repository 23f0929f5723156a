use crate::error::PlanError;

/// Rejects prefixes that would move files out of their directory or produce
/// names the filesystem refuses.
pub fn check_prefix(prefix: &str) -> Result<(), PlanError> {
    if prefix.chars().any(is_disallowed_char) {
        return Err(PlanError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

fn is_disallowed_char(ch: char) -> bool {
    matches!(ch, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
        || ch == '\0'
        || ch.is_control()
}
