use uuid::Uuid;

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};

use crate::util::{name_key, normalize_name};
use crate::{
    LedgerError, PaymentMethod, PaymentMethodNewCmd, ResultLedger, payment_methods,
};

use super::{Ledger, normalize_required_text, with_tx};

impl Ledger {
    /// Registers a payment method. Names are unique case-insensitively.
    pub async fn new_payment_method(&self, cmd: PaymentMethodNewCmd) -> ResultLedger<Uuid> {
        let name = normalize_name(&normalize_required_text(&cmd.name, "payment method")?);
        with_tx!(self, |db_tx| {
            let exists = payment_methods::Entity::find()
                .filter(Expr::cust("LOWER(name)").eq(name_key(&name)))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(LedgerError::ExistingKey(name.clone()));
            }

            let method = PaymentMethod::new(
                name.clone(),
                cmd.kind,
                cmd.instructions.clone(),
                cmd.account_details.clone(),
            );
            let id = method.id;
            payment_methods::ActiveModel::from(&method)
                .insert(&db_tx)
                .await?;
            Ok(id)
        })
    }

    /// Returns one payment method by id.
    pub async fn payment_method(&self, id: Uuid) -> ResultLedger<PaymentMethod> {
        let model = payment_methods::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("payment method not exists".to_string()))?;
        PaymentMethod::try_from(model)
    }

    /// Lists configured payment methods, optionally only active ones.
    pub async fn payment_methods(&self, active_only: bool) -> ResultLedger<Vec<PaymentMethod>> {
        let mut query = payment_methods::Entity::find().order_by_asc(payment_methods::Column::Name);
        if active_only {
            query = query.filter(payment_methods::Column::IsActive.eq(true));
        }
        let models = query.all(&self.database).await?;
        models.into_iter().map(PaymentMethod::try_from).collect()
    }

    /// Activates or deactivates a payment method. Methods referenced by
    /// transactions are never deleted.
    pub async fn set_payment_method_active(&self, id: Uuid, active: bool) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.payment_method_model(&db_tx, id).await?;
            let model = payment_methods::ActiveModel {
                id: ActiveValue::Set(id.to_string()),
                is_active: ActiveValue::Set(active),
                ..Default::default()
            };
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    pub(in crate::ops) async fn payment_method_model(
        &self,
        db_tx: &DatabaseTransaction,
        id: Uuid,
    ) -> ResultLedger<payment_methods::Model> {
        payment_methods::Entity::find_by_id(id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("payment method not exists".to_string()))
    }
}
