//! Ledger-defined constants: transaction type codes, roles, auth actions.
//!
//! These are part of the wire contract and must match the target ledger's
//! registry exactly. Builder, serializer and tests all read from this table.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// Transaction types
// ============================================================================

/// Every operation kind this crate can build, with its ledger type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxnType {
    Node,
    Nym,
    GetTxn,
    GetTxnAuthorAgreement,
    GetAcceptanceMechanisms,
    Attrib,
    Schema,
    ClaimDef,
    GetAttr,
    GetNym,
    GetSchema,
    GetClaimDef,
    PoolUpgrade,
    NodeUpgrade,
    PoolConfig,
    AuthRule,
    GetAuthRule,
    SetContext,
    SetRichSchema,
    GetContext,
    GetRichSchema,
    AuctionStart,
    Handle,
    GetHandle,
}

lazy_static::lazy_static! {
    static ref TXN_TYPES_BY_CODE: HashMap<&'static str, TxnType> = TxnType::ALL
        .iter()
        .map(|txn_type| (txn_type.code(), *txn_type))
        .collect();
}

impl TxnType {
    pub const ALL: [TxnType; 24] = [
        TxnType::Node,
        TxnType::Nym,
        TxnType::GetTxn,
        TxnType::GetTxnAuthorAgreement,
        TxnType::GetAcceptanceMechanisms,
        TxnType::Attrib,
        TxnType::Schema,
        TxnType::ClaimDef,
        TxnType::GetAttr,
        TxnType::GetNym,
        TxnType::GetSchema,
        TxnType::GetClaimDef,
        TxnType::PoolUpgrade,
        TxnType::NodeUpgrade,
        TxnType::PoolConfig,
        TxnType::AuthRule,
        TxnType::GetAuthRule,
        TxnType::SetContext,
        TxnType::SetRichSchema,
        TxnType::GetContext,
        TxnType::GetRichSchema,
        TxnType::AuctionStart,
        TxnType::Handle,
        TxnType::GetHandle,
    ];

    /// Ledger type code, e.g. `"105"` for GET_NYM.
    pub fn code(&self) -> &'static str {
        match self {
            TxnType::Node => "0",
            TxnType::Nym => "1",
            TxnType::GetTxn => "3",
            TxnType::GetTxnAuthorAgreement => "6",
            TxnType::GetAcceptanceMechanisms => "7",
            TxnType::Attrib => "100",
            TxnType::Schema => "101",
            TxnType::ClaimDef => "102",
            TxnType::GetAttr => "104",
            TxnType::GetNym => "105",
            TxnType::GetSchema => "107",
            TxnType::GetClaimDef => "108",
            TxnType::PoolUpgrade => "109",
            TxnType::NodeUpgrade => "110",
            TxnType::PoolConfig => "111",
            TxnType::AuthRule => "120",
            TxnType::GetAuthRule => "121",
            TxnType::SetContext => "200",
            TxnType::SetRichSchema => "201",
            TxnType::GetContext => "300",
            TxnType::GetRichSchema => "301",
            TxnType::AuctionStart => "99990",
            TxnType::Handle => "99994",
            TxnType::GetHandle => "99996",
        }
    }

    /// Read-only operations are never signed or endorsed.
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            TxnType::GetTxn
                | TxnType::GetTxnAuthorAgreement
                | TxnType::GetAcceptanceMechanisms
                | TxnType::GetAttr
                | TxnType::GetNym
                | TxnType::GetSchema
                | TxnType::GetClaimDef
                | TxnType::GetAuthRule
                | TxnType::GetContext
                | TxnType::GetRichSchema
                | TxnType::GetHandle
        )
    }

    pub fn from_code(code: &str) -> Option<TxnType> {
        TXN_TYPES_BY_CODE.get(code).copied()
    }

    /// Read/write class of an arbitrary code. Unknown codes are writes.
    pub fn is_read_code(code: &str) -> bool {
        Self::from_code(code).map(|t| t.is_read()).unwrap_or(false)
    }
}

impl std::fmt::Display for TxnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for TxnType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for TxnType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        TxnType::from_code(&code)
            .ok_or_else(|| serde::de::Error::custom(format!("Unknown txn type: {}", code)))
    }
}

// ============================================================================
// Roles
// ============================================================================

/// Ledger roles assignable through NYM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "0")]
    Trustee,
    #[serde(rename = "2")]
    Steward,
    #[serde(rename = "101")]
    Endorser,
    #[serde(rename = "201")]
    NetworkMonitor,
}

impl Role {
    pub fn code(&self) -> &'static str {
        match self {
            Role::Trustee => "0",
            Role::Steward => "2",
            Role::Endorser => "101",
            Role::NetworkMonitor => "201",
        }
    }

    pub fn from_code(code: &str) -> Option<Role> {
        match code {
            "0" => Some(Role::Trustee),
            "2" => Some(Role::Steward),
            "101" => Some(Role::Endorser),
            "201" => Some(Role::NetworkMonitor),
            _ => None,
        }
    }
}

// ============================================================================
// Auth rules and ledgers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthAction {
    #[serde(rename = "ADD")]
    Add,
    #[serde(rename = "EDIT")]
    Edit,
}

/// Sub-ledger addressed by GET_TXN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerType {
    Pool,
    Domain,
    Config,
}

impl LedgerType {
    pub fn id(&self) -> i32 {
        match self {
            LedgerType::Pool => 0,
            LedgerType::Domain => 1,
            LedgerType::Config => 2,
        }
    }
}

impl Serialize for LedgerType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.id())
    }
}

/// Rich schema object tags (`rsType`).
pub mod rich_object {
    pub const SCHEMA_TYPE: &str = "sch";
    pub const CONTEXT_TYPE: &str = "ctx";
    /// Format version written into `ver`.
    pub const FORMAT_VERSION: &str = "2";
}

/// Ledger identifier markers, e.g. `did:2:name:version`.
pub mod marker {
    pub const SCHEMA: &str = "2";
    pub const CRED_DEF: &str = "3";
    pub const CL_SIGNATURE_TYPE: &str = "CL";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique_and_reversible() {
        let codes: HashSet<&str> = TxnType::ALL.iter().map(|t| t.code()).collect();
        assert_eq!(codes.len(), TxnType::ALL.len());
        for txn_type in TxnType::ALL {
            assert_eq!(TxnType::from_code(txn_type.code()), Some(txn_type));
        }
    }

    #[test]
    fn test_wire_codes_match_ledger_registry() {
        assert_eq!(TxnType::Nym.code(), "1");
        assert_eq!(TxnType::Attrib.code(), "100");
        assert_eq!(TxnType::Schema.code(), "101");
        assert_eq!(TxnType::SetRichSchema.code(), "201");
        assert_eq!(TxnType::GetNym.code(), "105");
        assert_eq!(TxnType::GetAttr.code(), "104");
        assert_eq!(TxnType::GetAuthRule.code(), "121");
        assert_eq!(TxnType::Handle.code(), "99994");
        assert_eq!(TxnType::GetHandle.code(), "99996");
        assert_eq!(TxnType::AuctionStart.code(), "99990");
    }

    #[test]
    fn test_read_classification() {
        assert!(TxnType::GetNym.is_read());
        assert!(TxnType::GetAuthRule.is_read());
        assert!(!TxnType::Nym.is_read());
        assert!(!TxnType::AuthRule.is_read());
        assert!(TxnType::is_read_code("3"));
        assert!(!TxnType::is_read_code("424242"));
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Endorser).unwrap(), "\"101\"");
        assert_eq!(Role::from_code("2"), Some(Role::Steward));
        assert_eq!(Role::from_code("7"), None);
        assert_eq!(serde_json::to_string(&AuthAction::Edit).unwrap(), "\"EDIT\"");
    }
}
