//! Declarative action tables evaluated before a request reaches a handler.
//!
//! Each statement lists the actions it covers and an ordered list of
//! conditions evaluated with short-circuit AND. A request is allowed when one
//! statement covering its action passes; actions no statement covers are
//! denied.

mod tables;

#[cfg(test)]
mod tests;

use std::str::FromStr;
use std::sync::Arc;

use fieldkit_core::{AppError, AppResult};
use fieldkit_domain::{ModelKind, Permission};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::access_context::AccessContext;

pub use tables::{
    allocation_statements, asset_statements, disposal_plan_statements,
    inventory_asset_relation_statements, inventory_statements, maintenance_statements,
    procurement_statements, supplier_statements, user_access_statements,
};

/// Inbound action names understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiAction {
    /// List a collection.
    List,
    /// Retrieve one row.
    Retrieve,
    /// Create one row.
    Create,
    /// Replace one row.
    Update,
    /// Patch one row.
    PartialUpdate,
    /// Delete one row.
    Destroy,
    /// Play a workflow transition.
    PlayTransition,
    /// Read the audit trail of one row.
    GetAuditLog,
    /// Export a collection.
    Export,
    /// Export one row as PDF.
    ExportPdf,
    /// Export inventories as a spreadsheet bundle.
    ExportInventories,
    /// Export asset usages as PDF.
    ExportUsagesPdf,
    /// Suggest accessories for an asset.
    SuggestAccessories,
    /// Fetch data from an external device inventory.
    FetchExternalData,
    /// List attachments.
    ListAttachments,
    /// Download one attachment.
    DownloadAttachment,
    /// Upload attachments.
    CreateAttachments,
    /// Delete one attachment.
    DeleteAttachment,
    /// Produce a donation certificate.
    MakeDonationCertificate,
    /// Create several rows at once.
    CreateMany,
    /// Delete several rows at once.
    DeleteMany,
}

impl ApiAction {
    /// Returns the stable action name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Retrieve => "retrieve",
            Self::Create => "create",
            Self::Update => "update",
            Self::PartialUpdate => "partial_update",
            Self::Destroy => "destroy",
            Self::PlayTransition => "play_transition",
            Self::GetAuditLog => "get_audit_log",
            Self::Export => "export",
            Self::ExportPdf => "export_pdf",
            Self::ExportInventories => "export_inventories",
            Self::ExportUsagesPdf => "export_usages_pdf",
            Self::SuggestAccessories => "suggest_accessories",
            Self::FetchExternalData => "fetch_external_data",
            Self::ListAttachments => "list_attachments",
            Self::DownloadAttachment => "download_attachment",
            Self::CreateAttachments => "create_attachments",
            Self::DeleteAttachment => "delete_attachment",
            Self::MakeDonationCertificate => "make_donation_certificate",
            Self::CreateMany => "create_many",
            Self::DeleteMany => "delete_many",
        }
    }
}

impl FromStr for ApiAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "list" => Ok(Self::List),
            "retrieve" => Ok(Self::Retrieve),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "partial_update" => Ok(Self::PartialUpdate),
            "destroy" => Ok(Self::Destroy),
            "play_transition" => Ok(Self::PlayTransition),
            "get_audit_log" => Ok(Self::GetAuditLog),
            "export" => Ok(Self::Export),
            "export_pdf" => Ok(Self::ExportPdf),
            "export_inventories" => Ok(Self::ExportInventories),
            "export_usages_pdf" => Ok(Self::ExportUsagesPdf),
            "suggest_accessories" => Ok(Self::SuggestAccessories),
            "fetch_external_data" => Ok(Self::FetchExternalData),
            "list_attachments" => Ok(Self::ListAttachments),
            "download_attachment" => Ok(Self::DownloadAttachment),
            "create_attachments" => Ok(Self::CreateAttachments),
            "delete_attachment" => Ok(Self::DeleteAttachment),
            "make_donation_certificate" => Ok(Self::MakeDonationCertificate),
            "create_many" => Ok(Self::CreateMany),
            "delete_many" => Ok(Self::DeleteMany),
            _ => Err(AppError::Validation(format!("unknown action '{value}'"))),
        }
    }
}

/// What an action applies to.
#[derive(Debug)]
pub enum ActionTarget<'a, R, D> {
    /// A collection or a batch endpoint.
    Collection,
    /// One persisted row.
    Instance(&'a R),
    /// A row about to be created.
    Creation(&'a D),
}

impl<R, D> Clone for ActionTarget<'_, R, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, D> Copy for ActionTarget<'_, R, D> {}

type CheckFn<R, D> = Arc<dyn Fn(&AccessContext, ActionTarget<'_, R, D>) -> bool + Send + Sync>;

/// Condition of a statement.
pub enum StatementCondition<R, D> {
    /// The caller holds the permission.
    HasPermission(Permission),
    /// The caller holds at least one of the permissions.
    HasAnyPermission(Vec<Permission>),
    /// Named fine-grained check against the target.
    Check(&'static str, CheckFn<R, D>),
}

impl<R, D> StatementCondition<R, D> {
    /// Builds a named fine-grained check.
    pub fn check(
        name: &'static str,
        check: impl Fn(&AccessContext, ActionTarget<'_, R, D>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Check(name, Arc::new(check))
    }

    fn name(&self) -> String {
        match self {
            Self::HasPermission(permission) => format!("user_has_perm:{permission}"),
            Self::HasAnyPermission(permissions) => permissions
                .iter()
                .map(|permission| format!("user_has_perm:{permission}"))
                .collect::<Vec<_>>()
                .join(" or "),
            Self::Check(name, _) => (*name).to_owned(),
        }
    }

    fn evaluate(&self, context: &AccessContext, target: ActionTarget<'_, R, D>) -> bool {
        match self {
            Self::HasPermission(permission) => context.has(*permission),
            Self::HasAnyPermission(permissions) => context.has_any(permissions),
            Self::Check(_, check) => check(context, target),
        }
    }
}

impl<R, D> Clone for StatementCondition<R, D> {
    fn clone(&self) -> Self {
        match self {
            Self::HasPermission(permission) => Self::HasPermission(*permission),
            Self::HasAnyPermission(permissions) => Self::HasAnyPermission(permissions.clone()),
            Self::Check(name, check) => Self::Check(name, Arc::clone(check)),
        }
    }
}

struct PolicyStatement<R, D> {
    actions: Vec<ApiAction>,
    conditions: Vec<StatementCondition<R, D>>,
}

/// Statement table of one entity.
pub struct PolicyStatements<R, D> {
    model: ModelKind,
    statements: Vec<PolicyStatement<R, D>>,
}

impl<R, D> PolicyStatements<R, D> {
    /// Creates an empty table, denying every action.
    #[must_use]
    pub fn new(model: ModelKind) -> Self {
        Self {
            model,
            statements: Vec::new(),
        }
    }

    /// Appends an allow statement for authenticated callers.
    #[must_use]
    pub fn allow(
        mut self,
        actions: &[ApiAction],
        conditions: Vec<StatementCondition<R, D>>,
    ) -> Self {
        self.statements.push(PolicyStatement {
            actions: actions.to_vec(),
            conditions,
        });
        self
    }

    /// Returns whether some statement covers the action.
    #[must_use]
    pub fn covers(&self, action: ApiAction) -> bool {
        self.statements
            .iter()
            .any(|statement| statement.actions.contains(&action))
    }

    /// Evaluates the table.
    #[must_use]
    pub fn is_allowed(
        &self,
        context: &AccessContext,
        action: ApiAction,
        target: ActionTarget<'_, R, D>,
    ) -> bool {
        if !context.is_authenticated() {
            return false;
        }

        self.statements
            .iter()
            .filter(|statement| statement.actions.contains(&action))
            .any(|statement| {
                statement.conditions.iter().all(|condition| {
                    let passed = condition.evaluate(context, target);
                    if !passed {
                        debug!(
                            model = self.model.as_str(),
                            action = action.as_str(),
                            condition = condition.name(),
                            "statement condition failed"
                        );
                    }
                    passed
                })
            })
    }

    /// Evaluates the table, turning a denial into an error.
    pub fn authorize(
        &self,
        context: &AccessContext,
        action: ApiAction,
        target: ActionTarget<'_, R, D>,
    ) -> AppResult<()> {
        if !context.is_authenticated() {
            return Err(AppError::Unauthorized("authentication required".to_owned()));
        }
        if self.is_allowed(context, action, target) {
            return Ok(());
        }

        Err(AppError::permission_denied())
    }
}
