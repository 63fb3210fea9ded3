//! Resolved advertiser account information.

use serde::{Deserialize, Serialize};

/// One advertiser account as resolved for a credential, with the delegation
/// context needed to query it.
///
/// Every field is always populated by the resolver; `manager_customer_id` is
/// `None` for manager accounts themselves and for self-service accounts that
/// have no manager in scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// External customer id, digits only (no dashes).
    pub customer_id: String,
    pub customer_name: String,
    pub descriptive_name: String,
    pub currency_code: String,
    pub time_zone: String,
    pub is_manager_account: bool,
    /// Mirrors `is_manager_account`; kept as its own field because the
    /// serialized shape is part of the external contract.
    pub can_manage_clients: bool,
    /// The id to authenticate as when querying this account. Managers use
    /// their own id; client accounts use their manager's id when one exists.
    pub login_customer_id: String,
    /// The manager that grants access to this account, if any.
    pub manager_customer_id: Option<String>,
}
