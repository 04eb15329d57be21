//! Manually-settled payment methods (mobile money, bank transfer, crypto).
//!
//! A payment method is operator-configured display/settlement data: where the
//! user should send funds for a deposit, or where the platform pays out a
//! withdrawal. Once a transaction references a method it is never deleted;
//! operators toggle `is_active` instead.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::LedgerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentMethodKind {
    MobileMoney,
    Mpesa,
    Crypto,
    BankTransfer,
    Other,
}

impl PaymentMethodKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MobileMoney => "mobile_money",
            Self::Mpesa => "mpesa",
            Self::Crypto => "crypto",
            Self::BankTransfer => "bank_transfer",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for PaymentMethodKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "mobile_money" => Ok(Self::MobileMoney),
            "mpesa" => Ok(Self::Mpesa),
            "crypto" => Ok(Self::Crypto),
            "bank_transfer" => Ok(Self::BankTransfer),
            "other" => Ok(Self::Other),
            other => Err(LedgerError::KeyNotFound(format!(
                "invalid payment method kind: {other}"
            ))),
        }
    }
}

/// Method-specific settlement coordinates. Which fields are filled depends on
/// the kind: mobile money uses account number/name, bank transfers add a bank
/// name, crypto uses wallet address + network.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountDetails {
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub wallet_address: Option<String>,
    pub network: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PaymentMethod {
    pub id: Uuid,
    pub name: String,
    pub kind: PaymentMethodKind,
    /// Display text shown to the user before they pay out-of-band.
    pub instructions: Option<String>,
    pub account_details: AccountDetails,
    pub is_active: bool,
}

impl PaymentMethod {
    pub fn new(
        name: String,
        kind: PaymentMethodKind,
        instructions: Option<String>,
        account_details: AccountDetails,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            instructions,
            account_details,
            is_active: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_methods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub kind: String,
    pub instructions: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub wallet_address: Option<String>,
    pub network: Option<String>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PaymentMethod> for ActiveModel {
    fn from(value: &PaymentMethod) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            instructions: ActiveValue::Set(value.instructions.clone()),
            account_name: ActiveValue::Set(value.account_details.account_name.clone()),
            account_number: ActiveValue::Set(value.account_details.account_number.clone()),
            bank_name: ActiveValue::Set(value.account_details.bank_name.clone()),
            wallet_address: ActiveValue::Set(value.account_details.wallet_address.clone()),
            network: ActiveValue::Set(value.account_details.network.clone()),
            is_active: ActiveValue::Set(value.is_active),
        }
    }
}

impl TryFrom<Model> for PaymentMethod {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::KeyNotFound("payment method not exists".to_string()))?,
            name: model.name,
            kind: PaymentMethodKind::try_from(model.kind.as_str())?,
            instructions: model.instructions,
            account_details: AccountDetails {
                account_name: model.account_name,
                account_number: model.account_number,
                bank_name: model.bank_name,
                wallet_address: model.wallet_address,
                network: model.network,
            },
            is_active: model.is_active,
        })
    }
}
