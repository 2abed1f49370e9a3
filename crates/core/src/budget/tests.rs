//! Property-based tests for the budget book.
//!
//! Any sequence of operations, successful or rejected, must leave every budget's
//! `spent` equal to the sum of its expenses.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::book::BudgetBook;
use super::service::BudgetService;
use super::types::{Budget, CreateBudgetInput, CreateExpenseInput, UpdateBudgetInput};
use budgein_shared::types::BudgetId;

/// Budget names drawn from a small pool so renames and duplicates collide often.
const NAMES: [&str; 4] = ["Food", "Rent", "Fun", "Travel"];

#[derive(Debug, Clone)]
enum Op {
    CreateBudget { name: usize, amount: Decimal },
    UpdateBudget { pick: usize, name: Option<usize>, amount: Option<Decimal> },
    DeleteBudget { pick: usize },
    CreateExpense { budget: usize, amount: Decimal },
    DeleteExpense { pick: usize },
    Reset,
}

/// Strategy to generate amounts (0.00 to 10,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..NAMES.len(), amount()).prop_map(|(name, amount)| Op::CreateBudget { name, amount }),
        2 => (any::<usize>(), proptest::option::of(0..NAMES.len()), proptest::option::of(amount()))
            .prop_map(|(pick, name, amount)| Op::UpdateBudget { pick, name, amount }),
        1 => any::<usize>().prop_map(|pick| Op::DeleteBudget { pick }),
        5 => (0..NAMES.len(), amount()).prop_map(|(budget, amount)| Op::CreateExpense { budget, amount }),
        2 => any::<usize>().prop_map(|pick| Op::DeleteExpense { pick }),
        1 => Just(Op::Reset),
    ]
}

fn pick_budget(book: &BudgetBook, pick: usize) -> Option<BudgetId> {
    let budgets = book.list_budgets();
    budgets.get(pick % budgets.len().max(1)).map(|b| b.id)
}

fn apply(book: &mut BudgetBook, op: Op) {
    match op {
        Op::CreateBudget { name, amount } => {
            let _ = book.create_budget(CreateBudgetInput {
                name: NAMES[name].to_string(),
                amount,
            });
        }
        Op::UpdateBudget { pick, name, amount } => {
            if let Some(id) = pick_budget(book, pick) {
                let _ = book.update_budget(
                    id,
                    UpdateBudgetInput {
                        name: name.map(|n| NAMES[n].to_string()),
                        amount,
                    },
                );
            }
        }
        Op::DeleteBudget { pick } => {
            if let Some(id) = pick_budget(book, pick) {
                book.delete_budget(id).unwrap();
            }
        }
        Op::CreateExpense { budget, amount } => {
            let _ = book.create_expense(CreateExpenseInput {
                name: "item".to_string(),
                amount,
                budget_name: NAMES[budget].to_string(),
                date: None,
            });
        }
        Op::DeleteExpense { pick } => {
            let expenses = book.list_expenses(None);
            if let Some(expense) = expenses.get(pick % expenses.len().max(1)) {
                book.delete_expense(expense.id).unwrap();
            }
        }
        Op::Reset => book.reset(),
    }
}

proptest! {
    /// Spent always equals the sum of attached expenses.
    #[test]
    fn test_invariant_holds_after_every_operation(ops in prop::collection::vec(op(), 1..60)) {
        let mut book = BudgetBook::new();
        for op in ops {
            apply(&mut book, op);
            prop_assert!(book.is_consistent());
            for budget in book.list_budgets() {
                prop_assert!(budget.spent >= Decimal::ZERO);
            }
        }
    }

    /// Names stay unique whatever mix of creates and renames is attempted.
    #[test]
    fn test_budget_names_stay_unique(ops in prop::collection::vec(op(), 1..60)) {
        let mut book = BudgetBook::new();
        for op in ops {
            apply(&mut book, op);
        }
        let mut names: Vec<String> = book.list_budgets().into_iter().map(|b| b.name).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        prop_assert_eq!(names.len(), total);
    }

    /// Reloading a snapshot reproduces the same book without repairs.
    #[test]
    fn test_snapshot_reload_is_clean(ops in prop::collection::vec(op(), 1..40)) {
        let mut book = BudgetBook::new();
        for op in ops {
            apply(&mut book, op);
        }
        let snapshot = book.snapshot();
        let (restored, report) = BudgetBook::from_snapshot(snapshot.clone());
        prop_assert!(report.is_clean());
        prop_assert_eq!(restored.snapshot(), snapshot);
    }

    /// Percentage stays within 0..=100 for any amounts.
    #[test]
    fn test_percentage_bounded(amount in amount(), spent in amount()) {
        let budget = Budget { id: BudgetId(1), name: "x".into(), amount, spent };
        let pct = BudgetService::percentage(&budget);
        prop_assert!(pct >= Decimal::ZERO);
        prop_assert!(pct <= Decimal::ONE_HUNDRED);
    }
}
