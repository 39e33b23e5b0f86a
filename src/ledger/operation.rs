//! The closed `Operation` enum.
//!
//! Each variant carries only the fields legal for its kind; the `type` code
//! is never stored in a payload but written from [`TxnType`] at encode time.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::attrib::{Attrib, GetAttrib};
use crate::domain::auth_rule::{AuthRule, GetAuthRule};
use crate::domain::handle::{AuctionStart, GetHandle, Handle};
use crate::domain::nym::{GetNym, Nym};
use crate::domain::rich_schema::{GetRichObject, RichObject};
use crate::domain::schema::{GetClaimDef, GetSchema, Schema};
use crate::domain::txn::{GetAcceptanceMechanisms, GetTxn, GetTxnAuthorAgreement};
use crate::error::BuildError;
use crate::ledger::constants::{rich_object, TxnType};
use crate::shared::Did;

/// A ledger operation, one variant per transaction kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Nym(Nym),
    GetNym(GetNym),
    Attrib(Attrib),
    GetAttrib(GetAttrib),
    Schema(Schema),
    GetSchema(GetSchema),
    GetClaimDef(GetClaimDef),
    RichSchema(RichObject),
    Context(RichObject),
    GetRichSchema(GetRichObject),
    GetContext(GetRichObject),
    AuthRule(AuthRule),
    GetAuthRule(GetAuthRule),
    GetTxn(GetTxn),
    GetTxnAuthorAgreement(GetTxnAuthorAgreement),
    GetAcceptanceMechanisms(GetAcceptanceMechanisms),
    Handle(Handle),
    GetHandle(GetHandle),
    AuctionStart(AuctionStart),
    Custom(CustomOperation),
}

impl Operation {
    /// Wraps an arbitrary JSON operation. It must be an object with a
    /// string `type`.
    pub fn custom(value: Value) -> Result<Self, BuildError> {
        CustomOperation::new(value).map(Operation::Custom)
    }

    /// Table entry for this kind. `None` only for custom operations with
    /// a code outside the table.
    pub fn txn_type(&self) -> Option<TxnType> {
        let txn_type = match self {
            Operation::Nym(_) => TxnType::Nym,
            Operation::GetNym(_) => TxnType::GetNym,
            Operation::Attrib(_) => TxnType::Attrib,
            Operation::GetAttrib(_) => TxnType::GetAttr,
            Operation::Schema(_) => TxnType::Schema,
            Operation::GetSchema(_) => TxnType::GetSchema,
            Operation::GetClaimDef(_) => TxnType::GetClaimDef,
            Operation::RichSchema(_) => TxnType::SetRichSchema,
            Operation::Context(_) => TxnType::SetContext,
            Operation::GetRichSchema(_) => TxnType::GetRichSchema,
            Operation::GetContext(_) => TxnType::GetContext,
            Operation::AuthRule(_) => TxnType::AuthRule,
            Operation::GetAuthRule(_) => TxnType::GetAuthRule,
            Operation::GetTxn(_) => TxnType::GetTxn,
            Operation::GetTxnAuthorAgreement(_) => TxnType::GetTxnAuthorAgreement,
            Operation::GetAcceptanceMechanisms(_) => TxnType::GetAcceptanceMechanisms,
            Operation::Handle(_) => TxnType::Handle,
            Operation::GetHandle(_) => TxnType::GetHandle,
            Operation::AuctionStart(_) => TxnType::AuctionStart,
            Operation::Custom(custom) => return TxnType::from_code(custom.type_code()),
        };
        Some(txn_type)
    }

    /// Wire `type` code.
    pub fn type_code(&self) -> &str {
        match self {
            Operation::Custom(custom) => custom.type_code(),
            other => other.txn_type().map(|t| t.code()).unwrap_or_default(),
        }
    }

    pub fn is_read(&self) -> bool {
        match self {
            Operation::Custom(custom) => TxnType::is_read_code(custom.type_code()),
            other => other.txn_type().map(|t| t.is_read()).unwrap_or(false),
        }
    }

    /// Target DID, for kinds that address one.
    pub fn dest(&self) -> Option<&Did> {
        match self {
            Operation::Nym(op) => Some(&op.dest),
            Operation::GetNym(op) => Some(&op.dest),
            Operation::Attrib(op) => Some(&op.dest),
            Operation::GetAttrib(op) => Some(&op.dest),
            Operation::GetSchema(op) => Some(&op.dest),
            Operation::GetRichSchema(op) | Operation::GetContext(op) => Some(&op.dest),
            Operation::Handle(op) => Some(&op.dest),
            Operation::GetHandle(op) => Some(&op.dest),
            Operation::AuctionStart(op) => Some(&op.dest),
            _ => None,
        }
    }
}

// ─── Encoding ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Tagged<'a, T: Serialize> {
    #[serde(rename = "type")]
    txn_type: TxnType,
    #[serde(flatten)]
    payload: &'a T,
}

fn tagged<S: Serializer, T: Serialize>(
    serializer: S,
    txn_type: TxnType,
    payload: &T,
) -> Result<S::Ok, S::Error> {
    Tagged { txn_type, payload }.serialize(serializer)
}

impl Serialize for Operation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Operation::Nym(op) => tagged(serializer, TxnType::Nym, op),
            Operation::GetNym(op) => tagged(serializer, TxnType::GetNym, op),
            Operation::Attrib(op) => tagged(serializer, TxnType::Attrib, op),
            Operation::GetAttrib(op) => tagged(serializer, TxnType::GetAttr, op),
            Operation::Schema(op) => tagged(serializer, TxnType::Schema, op),
            Operation::GetSchema(op) => tagged(serializer, TxnType::GetSchema, op),
            Operation::GetClaimDef(op) => tagged(serializer, TxnType::GetClaimDef, op),
            Operation::RichSchema(op) => tagged(serializer, TxnType::SetRichSchema, op),
            Operation::Context(op) => tagged(serializer, TxnType::SetContext, op),
            Operation::GetRichSchema(op) => tagged(serializer, TxnType::GetRichSchema, op),
            Operation::GetContext(op) => tagged(serializer, TxnType::GetContext, op),
            Operation::AuthRule(op) => tagged(serializer, TxnType::AuthRule, op),
            Operation::GetAuthRule(op) => tagged(serializer, TxnType::GetAuthRule, op),
            Operation::GetTxn(op) => tagged(serializer, TxnType::GetTxn, op),
            Operation::GetTxnAuthorAgreement(op) => {
                tagged(serializer, TxnType::GetTxnAuthorAgreement, op)
            }
            Operation::GetAcceptanceMechanisms(op) => {
                tagged(serializer, TxnType::GetAcceptanceMechanisms, op)
            }
            Operation::Handle(op) => tagged(serializer, TxnType::Handle, op),
            Operation::GetHandle(op) => tagged(serializer, TxnType::GetHandle, op),
            Operation::AuctionStart(op) => tagged(serializer, TxnType::AuctionStart, op),
            Operation::Custom(op) => op.serialize(serializer),
        }
    }
}

/// Operations read back from JSON (e.g. a request handed over for
/// endorsement) are kept verbatim as [`CustomOperation`]s, so they re-encode
/// to exactly the bytes the author signed.
impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Operation::custom(value).map_err(serde::de::Error::custom)
    }
}

// ─── Custom ──────────────────────────────────────────────────────────────────

/// An operation given as raw JSON. Read/write class comes from its `type`.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomOperation {
    type_code: String,
    fields: Map<String, Value>,
}

impl CustomOperation {
    pub fn new(value: Value) -> Result<Self, BuildError> {
        let Value::Object(fields) = value else {
            return Err(BuildError::InvalidField {
                field: "operation",
                reason: "must be a JSON object".to_string(),
            });
        };
        let type_code = match fields.get("type") {
            Some(Value::String(code)) => code.clone(),
            Some(_) => {
                return Err(BuildError::InvalidField {
                    field: "type",
                    reason: "must be a string".to_string(),
                })
            }
            None => return Err(BuildError::MissingField("type")),
        };
        Ok(Self { type_code, fields })
    }

    pub fn type_code(&self) -> &str {
        &self.type_code
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl Serialize for CustomOperation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.fields.serialize(serializer)
    }
}

// ─── Conversions ─────────────────────────────────────────────────────────────

impl From<Nym> for Operation {
    fn from(op: Nym) -> Self {
        Operation::Nym(op)
    }
}

impl From<GetNym> for Operation {
    fn from(op: GetNym) -> Self {
        Operation::GetNym(op)
    }
}

impl From<Attrib> for Operation {
    fn from(op: Attrib) -> Self {
        Operation::Attrib(op)
    }
}

impl From<GetAttrib> for Operation {
    fn from(op: GetAttrib) -> Self {
        Operation::GetAttrib(op)
    }
}

impl From<Schema> for Operation {
    fn from(op: Schema) -> Self {
        Operation::Schema(op)
    }
}

impl From<GetSchema> for Operation {
    fn from(op: GetSchema) -> Self {
        Operation::GetSchema(op)
    }
}

impl From<GetClaimDef> for Operation {
    fn from(op: GetClaimDef) -> Self {
        Operation::GetClaimDef(op)
    }
}

/// Routes on `rsType`, so a context object can never travel as a schema.
impl From<RichObject> for Operation {
    fn from(op: RichObject) -> Self {
        if op.rs_type() == rich_object::CONTEXT_TYPE {
            Operation::Context(op)
        } else {
            Operation::RichSchema(op)
        }
    }
}

impl From<AuthRule> for Operation {
    fn from(op: AuthRule) -> Self {
        Operation::AuthRule(op)
    }
}

impl From<GetAuthRule> for Operation {
    fn from(op: GetAuthRule) -> Self {
        Operation::GetAuthRule(op)
    }
}

impl From<GetTxn> for Operation {
    fn from(op: GetTxn) -> Self {
        Operation::GetTxn(op)
    }
}

impl From<GetTxnAuthorAgreement> for Operation {
    fn from(op: GetTxnAuthorAgreement) -> Self {
        Operation::GetTxnAuthorAgreement(op)
    }
}

impl From<GetAcceptanceMechanisms> for Operation {
    fn from(op: GetAcceptanceMechanisms) -> Self {
        Operation::GetAcceptanceMechanisms(op)
    }
}

impl From<Handle> for Operation {
    fn from(op: Handle) -> Self {
        Operation::Handle(op)
    }
}

impl From<GetHandle> for Operation {
    fn from(op: GetHandle) -> Self {
        Operation::GetHandle(op)
    }
}

impl From<AuctionStart> for Operation {
    fn from(op: AuctionStart) -> Self {
        Operation::AuctionStart(op)
    }
}

impl From<CustomOperation> for Operation {
    fn from(op: CustomOperation) -> Self {
        Operation::Custom(op)
    }
}
