//! Budget store: the shared, persisted budget book.

use std::sync::Arc;

use budgein_core::budget::{
    Budget, BudgetBook, BudgetError, CreateBudgetInput, CreateExpenseInput, DeletedBudget,
    Expense, UpdateBudgetInput,
};
use budgein_shared::types::{BudgetId, ExpenseId};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::{Persistence, StoreError};

/// Budget and expense store backed by a persistence backend.
///
/// Mutations hold the write lock for their whole duration: the book is cloned,
/// the operation applied to the clone, the clone persisted, and only then
/// swapped in. Readers never see a half-applied cascade, and a failed save
/// leaves memory untouched.
pub struct BudgetStore {
    book: RwLock<BudgetBook>,
    persistence: Arc<dyn Persistence>,
}

impl std::fmt::Debug for BudgetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetStore").finish_non_exhaustive()
    }
}

impl BudgetStore {
    /// Loads the current snapshot from `persistence`.
    ///
    /// Inconsistent data is repaired and the repaired snapshot written back.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or the repair cannot be saved.
    pub async fn open(persistence: Arc<dyn Persistence>) -> Result<Self, StoreError> {
        let snapshot = persistence.load_snapshot().await?;
        let (book, report) = BudgetBook::from_snapshot(snapshot);

        if !report.is_clean() {
            warn!(
                dropped = ?report.dropped_expenses,
                corrected = ?report.corrected_budgets,
                relinked = ?report.relinked_expenses,
                "Repaired inconsistent budget data on load"
            );
            persistence.save_snapshot(&book.snapshot()).await?;
        }

        info!(
            budgets = book.budget_count(),
            expenses = book.expense_count(),
            "Budget store loaded"
        );

        Ok(Self {
            book: RwLock::new(book),
            persistence,
        })
    }

    /// Returns all budgets in creation order.
    pub async fn list_budgets(&self) -> Vec<Budget> {
        self.book.read().await.list_budgets()
    }

    /// Returns one budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if the budget does not exist.
    pub async fn get_budget(&self, id: BudgetId) -> Result<Budget, StoreError> {
        self.book
            .read()
            .await
            .get_budget(id)
            .cloned()
            .ok_or_else(|| BudgetError::NotFound(id).into())
    }

    /// Returns expenses, optionally only those of the named budget.
    pub async fn list_expenses(&self, budget_name: Option<&str>) -> Vec<Expense> {
        self.book.read().await.list_expenses(budget_name)
    }

    /// Creates a budget.
    ///
    /// # Errors
    ///
    /// Returns a validation, duplicate-name, or storage error.
    pub async fn create_budget(&self, input: CreateBudgetInput) -> Result<Budget, StoreError> {
        let budget = self.mutate(|book| book.create_budget(input)).await?;
        info!(budget_id = %budget.id, name = %budget.name, amount = %budget.amount, "Budget created");
        Ok(budget)
    }

    /// Edits a budget; a rename is carried to its expenses in the same commit.
    ///
    /// # Errors
    ///
    /// Returns a not-found, validation, duplicate-name, or storage error.
    pub async fn update_budget(
        &self,
        id: BudgetId,
        input: UpdateBudgetInput,
    ) -> Result<Budget, StoreError> {
        let budget = self.mutate(|book| book.update_budget(id, input)).await?;
        info!(budget_id = %id, name = %budget.name, amount = %budget.amount, "Budget updated");
        Ok(budget)
    }

    /// Deletes a budget together with its expenses.
    ///
    /// # Errors
    ///
    /// Returns a not-found or storage error.
    pub async fn delete_budget(&self, id: BudgetId) -> Result<DeletedBudget, StoreError> {
        let deleted = self.mutate(|book| book.delete_budget(id)).await?;
        info!(
            budget_id = %id,
            expenses_removed = deleted.expenses.len(),
            "Budget deleted"
        );
        Ok(deleted)
    }

    /// Records an expense against a budget.
    ///
    /// # Errors
    ///
    /// Returns a validation, unknown-budget, or storage error.
    pub async fn create_expense(&self, input: CreateExpenseInput) -> Result<Expense, StoreError> {
        let expense = self.mutate(|book| book.create_expense(input)).await?;
        info!(
            expense_id = %expense.id,
            budget_id = %expense.budget_id,
            amount = %expense.amount,
            "Expense created"
        );
        Ok(expense)
    }

    /// Deletes an expense and adjusts its budget.
    ///
    /// # Errors
    ///
    /// Returns a not-found or storage error.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<Expense, StoreError> {
        let expense = self.mutate(|book| book.delete_expense(id)).await?;
        info!(expense_id = %id, budget_id = %expense.budget_id, "Expense deleted");
        Ok(expense)
    }

    /// Removes every budget and expense.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the empty snapshot cannot be saved.
    pub async fn reset_all(&self) -> Result<(), StoreError> {
        self.mutate(|book| {
            book.reset();
            Ok(())
        })
        .await?;
        warn!("All budgets and expenses deleted");
        Ok(())
    }

    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut BudgetBook) -> Result<T, BudgetError>,
    ) -> Result<T, StoreError> {
        let mut book = self.book.write().await;
        let mut working = book.clone();
        let output = op(&mut working)?;

        if let Err(e) = self.persistence.save_snapshot(&working.snapshot()).await {
            error!(error = %e, "Failed to persist budget snapshot");
            return Err(e);
        }

        *book = working;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryPersistence, MockPersistence};
    use budgein_core::budget::Snapshot;
    use rust_decimal_macros::dec;

    fn food() -> CreateBudgetInput {
        CreateBudgetInput {
            name: "Food".into(),
            amount: dec!(100),
        }
    }

    #[tokio::test]
    async fn test_failed_save_leaves_state_untouched() {
        let mut mock = MockPersistence::new();
        mock.expect_load_snapshot()
            .returning(|| Ok(Snapshot::default()));
        mock.expect_save_snapshot()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("disk full".into())));

        let store = BudgetStore::open(Arc::new(mock)).await.unwrap();
        let result = store.create_budget(food()).await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert!(store.list_budgets().await.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_operation_does_not_save() {
        let mut mock = MockPersistence::new();
        mock.expect_load_snapshot()
            .returning(|| Ok(Snapshot::default()));
        mock.expect_save_snapshot().times(0);

        let store = BudgetStore::open(Arc::new(mock)).await.unwrap();
        let result = store
            .create_budget(CreateBudgetInput {
                name: " ".into(),
                amount: dec!(1),
            })
            .await;

        assert!(matches!(result, Err(StoreError::Budget(BudgetError::EmptyName))));
    }

    #[tokio::test]
    async fn test_every_mutation_persists_snapshot() {
        let backend = Arc::new(MemoryPersistence::new());
        let store = BudgetStore::open(backend.clone()).await.unwrap();

        let budget = store.create_budget(food()).await.unwrap();
        store
            .create_expense(CreateExpenseInput {
                name: "Lunch".into(),
                amount: dec!(20),
                budget_name: "Food".into(),
                date: None,
            })
            .await
            .unwrap();

        let saved = backend.load_snapshot().await.unwrap();
        assert_eq!(saved.budgets.len(), 1);
        assert_eq!(saved.budgets[0].spent, dec!(20));
        assert_eq!(saved.expenses.len(), 1);

        store.delete_budget(budget.id).await.unwrap();
        let saved = backend.load_snapshot().await.unwrap();
        assert!(saved.budgets.is_empty());
        assert!(saved.expenses.is_empty());
    }

    #[tokio::test]
    async fn test_get_budget_not_found() {
        let store = BudgetStore::open(Arc::new(MemoryPersistence::new()))
            .await
            .unwrap();

        assert!(matches!(
            store.get_budget(BudgetId(5)).await,
            Err(StoreError::Budget(BudgetError::NotFound(BudgetId(5))))
        ));
    }
}
