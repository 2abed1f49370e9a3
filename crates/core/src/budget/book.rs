//! In-memory budget book holding budgets and expenses.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use budgein_shared::types::{BudgetId, ExpenseId};
use chrono::Local;
use rust_decimal::Decimal;

use super::error::BudgetError;
use super::ids::IdGenerator;
use super::service::BudgetService;
use super::types::{
    Budget, CreateBudgetInput, CreateExpenseInput, Expense, Snapshot, UpdateBudgetInput,
};

/// Result of deleting a budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedBudget {
    /// The removed budget.
    pub budget: Budget,
    /// Expenses removed along with it.
    pub expenses: Vec<Expense>,
}

/// What [`BudgetBook::from_snapshot`] had to repair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Expenses dropped because no budget matched them.
    pub dropped_expenses: Vec<ExpenseId>,
    /// Budgets whose stored `spent` disagreed with their expenses.
    pub corrected_budgets: Vec<BudgetId>,
    /// Expenses re-linked to a budget by name.
    pub relinked_expenses: Vec<ExpenseId>,
}

impl ReconcileReport {
    /// Returns true if the snapshot was already consistent.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.dropped_expenses.is_empty()
            && self.corrected_budgets.is_empty()
            && self.relinked_expenses.is_empty()
    }
}

/// Budgets and expenses with the spent invariant enforced on every mutation.
///
/// Budgets and expenses are keyed by their time-ordered IDs, so iteration order is
/// creation order. `by_budget` indexes expense IDs per budget.
#[derive(Debug, Clone, Default)]
pub struct BudgetBook {
    budgets: BTreeMap<BudgetId, Budget>,
    expenses: BTreeMap<ExpenseId, Expense>,
    by_budget: HashMap<BudgetId, BTreeSet<ExpenseId>>,
    ids: IdGenerator,
}

impl BudgetBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from persisted collections, repairing anything inconsistent.
    ///
    /// Expenses are linked by `budget_id`; an unlinked or dangling expense is re-linked
    /// by budget name, or dropped when no budget has that name. Every `spent` is then
    /// recomputed from the surviving expenses.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> (Self, ReconcileReport) {
        let mut book = Self::new();
        let mut report = ReconcileReport::default();

        let mut stored_spent = HashMap::new();
        for mut budget in snapshot.budgets {
            book.ids.observe(budget.id.0);
            stored_spent.insert(budget.id, budget.spent);
            budget.spent = Decimal::ZERO;
            book.by_budget.entry(budget.id).or_default();
            book.budgets.insert(budget.id, budget);
        }

        for mut expense in snapshot.expenses {
            book.ids.observe(expense.id.0);

            if !book.budgets.contains_key(&expense.budget_id) {
                match book.find_budget_id(&expense.budget) {
                    Some(id) => {
                        expense.budget_id = id;
                        report.relinked_expenses.push(expense.id);
                    }
                    None => {
                        report.dropped_expenses.push(expense.id);
                        continue;
                    }
                }
            }

            let Some(budget) = book.budgets.get_mut(&expense.budget_id) else {
                report.dropped_expenses.push(expense.id);
                continue;
            };
            let Some(spent) = budget.spent.checked_add(expense.amount) else {
                report.dropped_expenses.push(expense.id);
                continue;
            };
            budget.spent = spent;
            expense.budget.clone_from(&budget.name);
            book.by_budget
                .entry(expense.budget_id)
                .or_default()
                .insert(expense.id);
            book.expenses.insert(expense.id, expense);
        }

        for budget in book.budgets.values() {
            if stored_spent.get(&budget.id) != Some(&budget.spent) {
                report.corrected_budgets.push(budget.id);
            }
        }

        (book, report)
    }

    /// Returns both collections in creation order.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            budgets: self.list_budgets(),
            expenses: self.list_expenses(None),
        }
    }

    /// Returns all budgets in creation order.
    #[must_use]
    pub fn list_budgets(&self) -> Vec<Budget> {
        self.budgets.values().cloned().collect()
    }

    /// Returns a budget by ID.
    #[must_use]
    pub fn get_budget(&self, id: BudgetId) -> Option<&Budget> {
        self.budgets.get(&id)
    }

    /// Returns an expense by ID.
    #[must_use]
    pub fn get_expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.get(&id)
    }

    /// Returns expenses in creation order, optionally only those of the named budget.
    ///
    /// An unknown budget name yields an empty list.
    #[must_use]
    pub fn list_expenses(&self, budget_name: Option<&str>) -> Vec<Expense> {
        match budget_name {
            None => self.expenses.values().cloned().collect(),
            Some(name) => self
                .find_budget_id(name)
                .map(|id| self.expenses_of(id))
                .unwrap_or_default(),
        }
    }

    /// Returns the expenses attached to a budget in creation order.
    #[must_use]
    pub fn expenses_of(&self, budget_id: BudgetId) -> Vec<Expense> {
        self.by_budget
            .get(&budget_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.expenses.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of budgets.
    #[must_use]
    pub fn budget_count(&self) -> usize {
        self.budgets.len()
    }

    /// Number of expenses.
    #[must_use]
    pub fn expense_count(&self) -> usize {
        self.expenses.len()
    }

    /// Creates a budget with `spent = 0`.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName`, `NegativeAmount`, or `DuplicateName`.
    pub fn create_budget(&mut self, input: CreateBudgetInput) -> Result<Budget, BudgetError> {
        let name = BudgetService::validate_name(&input.name)?;
        BudgetService::validate_amount(input.amount)?;
        if self.find_budget_id(&name).is_some() {
            return Err(BudgetError::DuplicateName(name));
        }

        let budget = Budget {
            id: BudgetId(self.ids.next_id()),
            name,
            amount: input.amount,
            spent: Decimal::ZERO,
        };
        self.by_budget.entry(budget.id).or_default();
        self.budgets.insert(budget.id, budget.clone());
        Ok(budget)
    }

    /// Edits a budget's name and/or amount.
    ///
    /// A rename is carried into the `budget` label of every attached expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `EmptyName`, `NegativeAmount`, or `DuplicateName`.
    pub fn update_budget(
        &mut self,
        id: BudgetId,
        input: UpdateBudgetInput,
    ) -> Result<Budget, BudgetError> {
        if !self.budgets.contains_key(&id) {
            return Err(BudgetError::NotFound(id));
        }

        let new_name = input
            .name
            .as_deref()
            .map(BudgetService::validate_name)
            .transpose()?;
        if let Some(amount) = input.amount {
            BudgetService::validate_amount(amount)?;
        }
        if let Some(name) = &new_name {
            if self.find_budget_id(name).is_some_and(|other| other != id) {
                return Err(BudgetError::DuplicateName(name.clone()));
            }
        }

        let Some(budget) = self.budgets.get_mut(&id) else {
            return Err(BudgetError::NotFound(id));
        };
        if let Some(amount) = input.amount {
            budget.amount = amount;
        }
        let renamed = match new_name {
            Some(name) if name != budget.name => {
                budget.name.clone_from(&name);
                Some(name)
            }
            _ => None,
        };
        let updated = budget.clone();

        if let Some(name) = renamed {
            if let Some(expense_ids) = self.by_budget.get(&id) {
                for expense_id in expense_ids {
                    if let Some(expense) = self.expenses.get_mut(expense_id) {
                        expense.budget.clone_from(&name);
                    }
                }
            }
        }

        Ok(updated)
    }

    /// Deletes a budget and every expense attached to it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the budget does not exist.
    pub fn delete_budget(&mut self, id: BudgetId) -> Result<DeletedBudget, BudgetError> {
        let budget = self.budgets.remove(&id).ok_or(BudgetError::NotFound(id))?;
        let expenses = self
            .by_budget
            .remove(&id)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|expense_id| self.expenses.remove(&expense_id))
            .collect();

        Ok(DeletedBudget { budget, expenses })
    }

    /// Records an expense against the named budget and adds it to that budget's spend.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName`, `NegativeAmount`, `UnknownBudget`, or `AmountOverflow`
    /// when the budget's total would exceed the largest representable amount.
    pub fn create_expense(&mut self, input: CreateExpenseInput) -> Result<Expense, BudgetError> {
        let name = BudgetService::validate_name(&input.name)?;
        BudgetService::validate_amount(input.amount)?;
        let budget_id = self
            .find_budget_id(input.budget_name.trim())
            .ok_or_else(|| BudgetError::UnknownBudget(input.budget_name.clone()))?;

        let Some(budget) = self.budgets.get_mut(&budget_id) else {
            return Err(BudgetError::UnknownBudget(input.budget_name));
        };
        budget.spent = budget
            .spent
            .checked_add(input.amount)
            .ok_or(BudgetError::AmountOverflow)?;
        let id = ExpenseId(self.ids.next_id());

        let expense = Expense {
            id,
            name,
            amount: input.amount,
            budget_id,
            budget: budget.name.clone(),
            date: input.date.unwrap_or_else(|| Local::now().date_naive()),
        };
        self.by_budget.entry(budget_id).or_default().insert(id);
        self.expenses.insert(id, expense.clone());
        Ok(expense)
    }

    /// Deletes an expense and subtracts it from its budget's spend, floored at zero.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseNotFound` if the expense does not exist.
    pub fn delete_expense(&mut self, id: ExpenseId) -> Result<Expense, BudgetError> {
        let expense = self
            .expenses
            .remove(&id)
            .ok_or(BudgetError::ExpenseNotFound(id))?;

        if let Some(ids) = self.by_budget.get_mut(&expense.budget_id) {
            ids.remove(&id);
        }
        if let Some(budget) = self.budgets.get_mut(&expense.budget_id) {
            budget.spent = (budget.spent - expense.amount).max(Decimal::ZERO);
        }

        Ok(expense)
    }

    /// Removes every budget and expense.
    pub fn reset(&mut self) {
        self.budgets.clear();
        self.expenses.clear();
        self.by_budget.clear();
    }

    /// Checks that every budget's `spent` and every expense's label match the expenses.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let budgets_ok = self.budgets.values().all(|budget| {
            let sum: Decimal = self
                .expenses
                .values()
                .filter(|e| e.budget_id == budget.id)
                .map(|e| e.amount)
                .sum();
            sum == budget.spent
        });
        let expenses_ok = self.expenses.values().all(|expense| {
            self.budgets
                .get(&expense.budget_id)
                .is_some_and(|b| b.name == expense.budget)
        });

        budgets_ok && expenses_ok
    }

    fn find_budget_id(&self, name: &str) -> Option<BudgetId> {
        self.budgets
            .values()
            .find(|budget| budget.name == name)
            .map(|budget| budget.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn budget_input(name: &str, amount: Decimal) -> CreateBudgetInput {
        CreateBudgetInput {
            name: name.to_string(),
            amount,
        }
    }

    fn expense_input(name: &str, amount: Decimal, budget: &str) -> CreateExpenseInput {
        CreateExpenseInput {
            name: name.to_string(),
            amount,
            budget_name: budget.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 12, 3),
        }
    }

    fn food_with_lunch() -> (BudgetBook, Budget, Expense) {
        let mut book = BudgetBook::new();
        let budget = book.create_budget(budget_input("Food", dec!(100))).unwrap();
        let expense = book
            .create_expense(expense_input("Lunch", dec!(20), "Food"))
            .unwrap();
        (book, budget, expense)
    }

    #[test]
    fn test_create_budget_starts_unspent() {
        let mut book = BudgetBook::new();
        let budget = book
            .create_budget(budget_input("  Food  ", dec!(100)))
            .unwrap();

        assert_eq!(budget.name, "Food");
        assert_eq!(budget.spent, Decimal::ZERO);
        assert_eq!(book.list_budgets(), vec![budget]);
    }

    #[test]
    fn test_create_budget_rejects_bad_input() {
        let mut book = BudgetBook::new();

        assert_eq!(
            book.create_budget(budget_input("   ", dec!(100))),
            Err(BudgetError::EmptyName)
        );
        assert_eq!(
            book.create_budget(budget_input("Food", dec!(-1))),
            Err(BudgetError::NegativeAmount)
        );
        assert_eq!(book.budget_count(), 0);
    }

    #[test]
    fn test_duplicate_budget_name_rejected() {
        let mut book = BudgetBook::new();
        book.create_budget(budget_input("Food", dec!(100))).unwrap();

        assert_eq!(
            book.create_budget(budget_input("Food", dec!(50))),
            Err(BudgetError::DuplicateName("Food".into()))
        );
        assert_eq!(book.budget_count(), 1);
    }

    #[test]
    fn test_create_expense_increments_spent() {
        let (book, budget, expense) = food_with_lunch();

        assert_eq!(book.get_budget(budget.id).unwrap().spent, dec!(20));
        assert_eq!(expense.budget, "Food");
        assert_eq!(expense.budget_id, budget.id);
        assert!(book.is_consistent());
    }

    #[test]
    fn test_expense_for_unknown_budget_rejected() {
        let (mut book, budget, _) = food_with_lunch();

        assert_eq!(
            book.create_expense(expense_input("Taxi", dec!(5), "Transport")),
            Err(BudgetError::UnknownBudget("Transport".into()))
        );
        assert_eq!(book.expense_count(), 1);
        assert_eq!(book.get_budget(budget.id).unwrap().spent, dec!(20));
    }

    #[test]
    fn test_expense_date_defaults_to_today() {
        let mut book = BudgetBook::new();
        book.create_budget(budget_input("Food", dec!(100))).unwrap();
        let mut input = expense_input("Snack", dec!(2), "Food");
        input.date = None;

        let expense = book.create_expense(input).unwrap();
        assert_eq!(expense.date, Local::now().date_naive());
    }

    #[test]
    fn test_rename_cascades_to_expenses() {
        let (mut book, budget, expense) = food_with_lunch();

        let updated = book
            .update_budget(
                budget.id,
                UpdateBudgetInput {
                    name: Some("Groceries".into()),
                    amount: None,
                },
            )
            .unwrap();

        assert_eq!(updated.id, budget.id);
        assert_eq!(updated.name, "Groceries");
        assert_eq!(updated.amount, dec!(100));
        assert_eq!(book.get_expense(expense.id).unwrap().budget, "Groceries");
        assert_eq!(book.list_expenses(Some("Groceries")).len(), 1);
        assert!(book.list_expenses(Some("Food")).is_empty());
        assert!(book.is_consistent());
    }

    #[test]
    fn test_update_amount_keeps_spent() {
        let (mut book, budget, _) = food_with_lunch();

        let updated = book
            .update_budget(
                budget.id,
                UpdateBudgetInput {
                    name: None,
                    amount: Some(dec!(10)),
                },
            )
            .unwrap();

        assert_eq!(updated.amount, dec!(10));
        assert_eq!(updated.spent, dec!(20));
    }

    #[test]
    fn test_update_unknown_budget() {
        let mut book = BudgetBook::new();
        assert_eq!(
            book.update_budget(BudgetId(99), UpdateBudgetInput::default()),
            Err(BudgetError::NotFound(BudgetId(99)))
        );
    }

    #[test]
    fn test_rename_onto_other_budget_rejected() {
        let (mut book, budget, _) = food_with_lunch();
        book.create_budget(budget_input("Rent", dec!(500))).unwrap();

        let result = book.update_budget(
            budget.id,
            UpdateBudgetInput {
                name: Some("Rent".into()),
                amount: Some(dec!(1)),
            },
        );

        assert_eq!(result, Err(BudgetError::DuplicateName("Rent".into())));
        assert_eq!(book.get_budget(budget.id).unwrap().name, "Food");
        assert_eq!(book.get_budget(budget.id).unwrap().amount, dec!(100));
    }

    #[test]
    fn test_rename_to_same_name_is_allowed() {
        let (mut book, budget, _) = food_with_lunch();
        let updated = book
            .update_budget(
                budget.id,
                UpdateBudgetInput {
                    name: Some("Food".into()),
                    amount: None,
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Food");
    }

    #[test]
    fn test_delete_budget_cascades() {
        let (mut book, budget, expense) = food_with_lunch();
        let other = book.create_budget(budget_input("Rent", dec!(500))).unwrap();
        let rent = book
            .create_expense(expense_input("May", dec!(500), "Rent"))
            .unwrap();

        let deleted = book.delete_budget(budget.id).unwrap();

        assert_eq!(deleted.budget.id, budget.id);
        assert_eq!(deleted.expenses, vec![expense.clone()]);
        assert!(book.get_expense(expense.id).is_none());
        assert_eq!(book.list_expenses(None), vec![rent]);
        assert_eq!(book.get_budget(other.id).unwrap().spent, dec!(500));
        assert_eq!(
            book.delete_budget(budget.id),
            Err(BudgetError::NotFound(budget.id))
        );
    }

    #[test]
    fn test_delete_expense_decrements_spent() {
        let (mut book, budget, expense) = food_with_lunch();

        let removed = book.delete_expense(expense.id).unwrap();

        assert_eq!(removed, expense);
        assert_eq!(book.get_budget(budget.id).unwrap().spent, Decimal::ZERO);
        assert_eq!(
            book.delete_expense(expense.id),
            Err(BudgetError::ExpenseNotFound(expense.id))
        );
    }

    #[test]
    fn test_delete_expense_floors_spent_at_zero() {
        let snapshot = Snapshot {
            budgets: vec![Budget {
                id: BudgetId(1),
                name: "Food".into(),
                amount: dec!(100),
                spent: dec!(20),
            }],
            expenses: vec![],
        };
        let (mut book, _) = BudgetBook::from_snapshot(snapshot);
        // Force the stale state a hand-edited file could leave behind.
        book.budgets.get_mut(&BudgetId(1)).unwrap().spent = dec!(20);
        let expense = Expense {
            id: ExpenseId(2),
            name: "Dinner".into(),
            amount: dec!(30),
            budget_id: BudgetId(1),
            budget: "Food".into(),
            date: NaiveDate::from_ymd_opt(2024, 12, 3).unwrap(),
        };
        book.by_budget.entry(BudgetId(1)).or_default().insert(expense.id);
        book.expenses.insert(expense.id, expense.clone());

        book.delete_expense(expense.id).unwrap();

        assert_eq!(book.get_budget(BudgetId(1)).unwrap().spent, Decimal::ZERO);
    }

    #[test]
    fn test_list_expenses_filter_preserves_order() {
        let mut book = BudgetBook::new();
        book.create_budget(budget_input("Food", dec!(100))).unwrap();
        book.create_budget(budget_input("Rent", dec!(500))).unwrap();
        let a = book.create_expense(expense_input("A", dec!(1), "Food")).unwrap();
        book.create_expense(expense_input("B", dec!(2), "Rent")).unwrap();
        let c = book.create_expense(expense_input("C", dec!(3), "Food")).unwrap();

        assert_eq!(book.list_expenses(Some("Food")), vec![a, c]);
        assert_eq!(book.list_expenses(None).len(), 3);
        assert!(book.list_expenses(Some("Nope")).is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let (mut book, _, _) = food_with_lunch();
        book.reset();

        assert!(book.list_budgets().is_empty());
        assert!(book.list_expenses(None).is_empty());
    }

    #[test]
    fn test_ids_continue_after_snapshot() {
        let (book, budget, expense) = food_with_lunch();
        let (mut restored, report) = BudgetBook::from_snapshot(book.snapshot());

        assert!(report.is_clean());
        let next = restored.create_budget(budget_input("Rent", dec!(1))).unwrap();
        assert!(next.id.0 > budget.id.0);
        assert!(next.id.0 > expense.id.0);
    }

    #[test]
    fn test_from_snapshot_repairs_legacy_data() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 3).unwrap();
        let snapshot = Snapshot {
            budgets: vec![Budget {
                id: BudgetId(10),
                name: "Food".into(),
                amount: dec!(100),
                spent: dec!(999),
            }],
            expenses: vec![
                Expense {
                    id: ExpenseId(11),
                    name: "Lunch".into(),
                    amount: dec!(20),
                    budget_id: BudgetId::default(),
                    budget: "Food".into(),
                    date,
                },
                Expense {
                    id: ExpenseId(12),
                    name: "Orphan".into(),
                    amount: dec!(5),
                    budget_id: BudgetId::default(),
                    budget: "Gone".into(),
                    date,
                },
            ],
        };

        let (book, report) = BudgetBook::from_snapshot(snapshot);

        assert_eq!(report.relinked_expenses, vec![ExpenseId(11)]);
        assert_eq!(report.dropped_expenses, vec![ExpenseId(12)]);
        assert_eq!(report.corrected_budgets, vec![BudgetId(10)]);
        assert_eq!(book.get_budget(BudgetId(10)).unwrap().spent, dec!(20));
        assert_eq!(book.get_expense(ExpenseId(11)).unwrap().budget_id, BudgetId(10));
        assert!(book.is_consistent());
    }

    #[test]
    fn test_expense_overflowing_spent_is_rejected() {
        let mut book = BudgetBook::new();
        let food = book.create_budget(budget_input("Food", dec!(100))).unwrap();
        book.create_expense(expense_input("Big", Decimal::MAX, "Food"))
            .unwrap();

        assert_eq!(
            book.create_expense(expense_input("Bigger", Decimal::MAX, "Food")),
            Err(BudgetError::AmountOverflow)
        );
        assert_eq!(book.get_budget(food.id).unwrap().spent, Decimal::MAX);
        assert_eq!(book.expense_count(), 1);
        assert!(book.is_consistent());
    }

    #[test]
    fn test_tiny_budget_with_expense_has_capped_percentage() {
        let mut book = BudgetBook::new();
        book.create_budget(budget_input("Food", Decimal::new(1, 28)))
            .unwrap();
        book.create_expense(expense_input("Lunch", dec!(10), "Food"))
            .unwrap();

        assert_eq!(
            BudgetService::percentage(&book.list_budgets()[0]),
            dec!(100)
        );
    }

    #[test]
    fn test_from_snapshot_drops_expense_that_would_overflow() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 3).unwrap();
        let expense = |id: i64| Expense {
            id: ExpenseId(id),
            name: "Huge".into(),
            amount: Decimal::MAX,
            budget_id: BudgetId(1),
            budget: "Food".into(),
            date,
        };
        let snapshot = Snapshot {
            budgets: vec![Budget {
                id: BudgetId(1),
                name: "Food".into(),
                amount: dec!(100),
                spent: Decimal::MAX,
            }],
            expenses: vec![expense(2), expense(3)],
        };

        let (book, report) = BudgetBook::from_snapshot(snapshot);

        assert_eq!(report.dropped_expenses, vec![ExpenseId(3)]);
        assert_eq!(book.get_budget(BudgetId(1)).unwrap().spent, Decimal::MAX);
        assert!(book.is_consistent());
    }
}
