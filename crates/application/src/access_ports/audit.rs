use fieldkit_domain::AuditAction;

/// Canonical audit event payload, written by grant repositories in the same
/// transaction as the grant change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Username of the actor.
    pub subject: String,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}
