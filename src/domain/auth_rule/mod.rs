//! AUTH_RULE domain: who may ADD or EDIT which field of which transaction.

pub mod client;

use serde::{Deserialize, Serialize};

use crate::ledger::constants::{AuthAction, Role, TxnType};

/// Wildcard accepted for roles and field values.
pub const ANY: &str = "*";

/// Signature requirements of an auth rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "constraint_id")]
pub enum Constraint {
    #[serde(rename = "ROLE")]
    Role {
        role: String,
        sig_count: u32,
        need_to_be_owner: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        off_ledger_signature: Option<bool>,
    },
    #[serde(rename = "AND")]
    And { auth_constraints: Vec<Constraint> },
    #[serde(rename = "OR")]
    Or { auth_constraints: Vec<Constraint> },
}

impl Constraint {
    pub fn role(role: Role, sig_count: u32) -> Self {
        Constraint::Role {
            role: role.code().to_string(),
            sig_count,
            need_to_be_owner: false,
            off_ledger_signature: None,
        }
    }

    pub fn any_role(sig_count: u32) -> Self {
        Constraint::Role {
            role: ANY.to_string(),
            sig_count,
            need_to_be_owner: false,
            off_ledger_signature: None,
        }
    }

    /// Requires the signer to own the target as well.
    pub fn owner(mut self) -> Self {
        if let Constraint::Role {
            need_to_be_owner, ..
        } = &mut self
        {
            *need_to_be_owner = true;
        }
        self
    }
}

/// Sets an auth rule. Config-ledger write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthRule {
    pub auth_type: String,
    pub auth_action: AuthAction,
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    pub constraint: Constraint,
}

impl AuthRule {
    pub fn add(
        txn_type: TxnType,
        field: impl Into<String>,
        new_value: Option<String>,
        constraint: Constraint,
    ) -> Self {
        Self {
            auth_type: txn_type.code().to_string(),
            auth_action: AuthAction::Add,
            field: field.into(),
            old_value: None,
            new_value,
            constraint,
        }
    }

    pub fn edit(
        txn_type: TxnType,
        field: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
        constraint: Constraint,
    ) -> Self {
        Self {
            auth_type: txn_type.code().to_string(),
            auth_action: AuthAction::Edit,
            field: field.into(),
            old_value,
            new_value,
            constraint,
        }
    }
}

/// Reads auth rules; with no filter, the ledger returns all of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetAuthRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_action: Option<AuthAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
}

impl GetAuthRule {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn add(txn_type: TxnType, field: impl Into<String>, new_value: Option<String>) -> Self {
        Self {
            auth_type: Some(txn_type.code().to_string()),
            auth_action: Some(AuthAction::Add),
            field: Some(field.into()),
            old_value: None,
            new_value,
        }
    }

    pub fn edit(
        txn_type: TxnType,
        field: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            auth_type: Some(txn_type.code().to_string()),
            auth_action: Some(AuthAction::Edit),
            field: Some(field.into()),
            old_value,
            new_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_all_auth_rules_is_empty_filter() {
        assert_eq!(serde_json::to_value(GetAuthRule::all()).unwrap(), json!({}));
    }

    #[test]
    fn test_get_add_rule_for_nym_role() {
        let get = GetAuthRule::add(TxnType::Nym, "role", Some("101".into()));
        assert_eq!(
            serde_json::to_value(&get).unwrap(),
            json!({"auth_type": "1", "auth_action": "ADD", "field": "role", "new_value": "101"})
        );
    }

    #[test]
    fn test_auth_rule_constraint_encoding() {
        let rule = AuthRule::edit(
            TxnType::Nym,
            "verkey",
            Some(ANY.into()),
            Some(ANY.into()),
            Constraint::Or {
                auth_constraints: vec![Constraint::role(Role::Trustee, 1), Constraint::any_role(1).owner()],
            },
        );
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["auth_action"], "EDIT");
        assert_eq!(value["constraint"]["constraint_id"], "OR");
        assert_eq!(
            value["constraint"]["auth_constraints"][1],
            json!({"constraint_id": "ROLE", "role": "*", "sig_count": 1, "need_to_be_owner": true})
        );
    }
}
