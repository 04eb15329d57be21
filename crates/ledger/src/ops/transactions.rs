//! Read model over the ledger.

use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{
    LedgerError, ResultLedger, Transaction, TransactionFilter, TransactionKind, TransactionStatus,
    transactions,
};

use super::Ledger;

impl Ledger {
    /// Point lookup by transaction id.
    pub async fn transaction(&self, id: Uuid) -> ResultLedger<Transaction> {
        let model = transactions::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("transaction not exists".to_string()))?;
        Transaction::try_from(model)
    }

    /// Lists a user's ledger rows, newest first.
    pub async fn transactions_for_user(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultLedger<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(filter.limit);

        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status.as_str()));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    /// Lists pending rows for operator review, oldest first so the queue is
    /// worked in arrival order.
    pub async fn pending_transactions(
        &self,
        kind: Option<TransactionKind>,
    ) -> ResultLedger<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending.as_str()))
            .order_by_asc(transactions::Column::CreatedAt);

        if let Some(kind) = kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Transaction::try_from).collect()
    }
}
