// ═══════════════════════════════════════════════════════════════════
// Service Tests — LedgerService, order reconciliation, AssetService,
// PlanService, AnnualService, reducer
// ═══════════════════════════════════════════════════════════════════

use asset_hub_core::errors::CoreError;
use asset_hub_core::models::action::Action;
use asset_hub_core::models::annual::AnnualTrend;
use asset_hub_core::models::category::Category;
use asset_hub_core::models::month::MonthKey;
use asset_hub_core::models::order::RowKey;
use asset_hub_core::models::plan::{MonthlyPlan, PlanItem, PlanList};
use asset_hub_core::models::product::{AssetProduct, ProductPatch};
use asset_hub_core::models::profile::UserProfile;
use asset_hub_core::models::state::{AppState, AssetBuckets};
use asset_hub_core::models::trend::TrendLedger;
use asset_hub_core::services::annual_service::AnnualService;
use asset_hub_core::services::asset_service::AssetService;
use asset_hub_core::services::ledger_service::LedgerService;
use asset_hub_core::services::order_service::{reconcile_order, reorder};
use asset_hub_core::services::plan_service::PlanService;
use asset_hub_core::services::reducer;

fn m(year: i32, month: u32) -> MonthKey {
    MonthKey::new(year, month).unwrap()
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Ledger from the worked example: A = {01: 500000, 02: -100000}, B = {01: 200000}.
fn example_ledger() -> TrendLedger {
    let mut ledger = TrendLedger::new();
    ledger.set("A", m(2025, 1), 500_000);
    ledger.set("A", m(2025, 2), -100_000);
    ledger.set("B", m(2025, 1), 200_000);
    ledger
}

/// A in deposits, B in pension, C in insurance; ids match names.
fn example_state() -> AppState {
    let mut state = AppState::default();
    for (category, name, amount) in [
        (Category::DepositSavings, "A", 1_000_000),
        (Category::Pension, "B", 2_000_000),
        (Category::Insurance, "C", 300_000),
    ] {
        let mut product = AssetProduct::named(name, amount);
        product.id = name.to_string();
        state.assets.products_mut(category).push(product);
    }
    state.trend = example_ledger();
    state
}

// ═══════════════════════════════════════════════════════════════════
// LedgerService
// ═══════════════════════════════════════════════════════════════════

mod ledger {
    use super::*;

    #[test]
    fn monthly_total_worked_example() {
        let svc = LedgerService::new();
        let ledger = example_ledger();
        let live = names(&["A", "B"]);
        assert_eq!(svc.monthly_total(&ledger, &live, m(2025, 1)), 700_000);
        assert_eq!(svc.monthly_total(&ledger, &live, m(2025, 2)), -100_000);
    }

    #[test]
    fn month_over_month_worked_example() {
        let svc = LedgerService::new();
        let ledger = example_ledger();
        let live = names(&["A", "B"]);
        let months = [m(2025, 1), m(2025, 2)];
        assert_eq!(
            svc.month_over_month_change(&ledger, &live, &months, 1),
            Some(-800_000)
        );
    }

    #[test]
    fn first_month_has_no_change_but_zero_change_is_some() {
        let svc = LedgerService::new();
        let ledger = example_ledger();
        let live = names(&["A", "B"]);
        let months = [m(2025, 3), m(2025, 4)];
        assert_eq!(svc.month_over_month_change(&ledger, &live, &months, 0), None);
        assert_eq!(svc.month_over_month_change(&ledger, &live, &months, 1), Some(0));
        assert_eq!(svc.month_over_month_change(&ledger, &live, &months, 2), None);
    }

    #[test]
    fn orphaned_names_do_not_count() {
        let svc = LedgerService::new();
        let ledger = example_ledger();
        assert_eq!(svc.monthly_total(&ledger, &names(&["A"]), m(2025, 1)), 500_000);
        assert_eq!(svc.monthly_total(&ledger, &[], m(2025, 1)), 0);
        // the orphaned entries are still stored
        assert_eq!(ledger.delta("B", m(2025, 1)), 200_000);
    }

    #[test]
    fn total_is_additive() {
        let svc = LedgerService::new();
        let ledger = example_ledger();
        let month = m(2025, 1);
        let whole = svc.monthly_total(&ledger, &names(&["A", "B"]), month);
        let parts = svc.monthly_total(&ledger, &names(&["A"]), month)
            + svc.monthly_total(&ledger, &names(&["B"]), month);
        assert_eq!(whole, parts);
    }

    #[test]
    fn set_delta_text_normalizes() {
        let svc = LedgerService::new();
        let mut ledger = TrendLedger::new();
        assert_eq!(svc.set_delta_text(&mut ledger, "A", m(2025, 1), "-1,200"), -1200);
        assert_eq!(ledger.delta("A", m(2025, 1)), -1200);

        assert_eq!(svc.set_delta_text(&mut ledger, "A", m(2025, 1), "-"), 0);
        assert_eq!(ledger.delta("A", m(2025, 1)), 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn running_balance_stays_within_year() {
        let svc = LedgerService::new();
        let mut ledger = TrendLedger::new();
        ledger.set("A", m(2024, 12), 1000);
        ledger.set("A", m(2025, 1), 500);
        ledger.set("A", m(2025, 3), 200);

        assert_eq!(svc.running_balance(&ledger, "A", m(2024, 12)), 1000);
        assert_eq!(svc.running_balance(&ledger, "A", m(2025, 1)), 500);
        assert_eq!(svc.running_balance(&ledger, "A", m(2025, 2)), 500);
        assert_eq!(svc.running_balance(&ledger, "A", m(2025, 3)), 700);
        assert_eq!(svc.running_balance(&ledger, "nobody", m(2025, 3)), 0);
    }

    #[test]
    fn totals_saturate() {
        let svc = LedgerService::new();
        let mut ledger = TrendLedger::new();
        ledger.set("A", m(2025, 1), i64::MAX);
        ledger.set("B", m(2025, 1), 1);
        assert_eq!(
            svc.monthly_total(&ledger, &names(&["A", "B"]), m(2025, 1)),
            i64::MAX
        );
    }

    #[test]
    fn trend_table_layout() {
        let svc = LedgerService::new();
        let mut state = example_state();
        state.row_order = vec![RowKey::new(Category::Pension, "B")];

        let table = svc.trend_table(&state, 2025).unwrap();
        assert_eq!(table.year, 2025);
        assert_eq!(table.months.len(), 12);

        let keys: Vec<String> = table.rows.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(keys, vec!["pension:B", "depositSavings:A", "insurance:C"]);

        let a = &table.rows[1];
        assert_eq!(a.deltas.len(), 12);
        assert_eq!(a.deltas[0], 500_000);
        assert_eq!(a.deltas[1], -100_000);
        assert_eq!(a.balances[0], 500_000);
        assert_eq!(a.balances[1], 400_000);
        assert_eq!(a.balances[11], 400_000);

        assert_eq!(table.totals[0], 700_000);
        assert_eq!(table.totals[1], -100_000);
        assert_eq!(table.changes[0], None);
        assert_eq!(table.changes[1], Some(-800_000));
        assert_eq!(table.changes[2], Some(100_000));
    }

    #[test]
    fn trend_table_rejects_unrepresentable_year() {
        let svc = LedgerService::new();
        let err = svc.trend_table(&AppState::default(), 10_000).unwrap_err();
        assert!(matches!(err, CoreError::InvalidMonthKey(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Order reconciliation
// ═══════════════════════════════════════════════════════════════════

mod ordering {
    use super::*;

    #[test]
    fn reconcile_worked_example() {
        let result = reconcile_order(&["x", "y", "z"], &["z", "w"]);
        assert_eq!(result, vec!["z", "x", "y"]);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let live = ["a", "b", "c", "d"];
        let stored = ["d", "zz", "b"];
        let once = reconcile_order(&live, &stored);
        let twice = reconcile_order(&live, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn reconcile_is_a_permutation_of_live() {
        let live = ["a", "b", "c"];
        let mut result = reconcile_order(&live, &["c", "c", "gone", "a"]);
        assert_eq!(result, vec!["c", "a", "b"]);
        result.sort();
        assert_eq!(result, vec!["a", "b", "c"]);
    }

    #[test]
    fn reconcile_with_empty_inputs() {
        assert_eq!(reconcile_order::<&str>(&[], &["a"]), Vec::<&str>::new());
        assert_eq!(reconcile_order(&["a", "b"], &[]), vec!["a", "b"]);
    }

    #[test]
    fn reorder_moves_element() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        reorder(&mut v, 0, 2);
        assert_eq!(v, vec!['b', 'c', 'a', 'd']);
        reorder(&mut v, 3, 0);
        assert_eq!(v, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    fn reorder_out_of_range() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        reorder(&mut v, 9, 0);
        assert_eq!(v, vec!['a', 'b', 'c', 'd']);
        reorder(&mut v, 1, 99);
        assert_eq!(v, vec!['a', 'c', 'd', 'b']);
    }
}

// ═══════════════════════════════════════════════════════════════════
// AssetService
// ═══════════════════════════════════════════════════════════════════

mod assets {
    use super::*;

    fn buckets() -> AssetBuckets {
        example_state().assets
    }

    #[test]
    fn totals() {
        let svc = AssetService::new();
        let b = buckets();
        assert_eq!(svc.category_total(&b, Category::DepositSavings), 1_000_000);
        assert_eq!(svc.category_total(&b, Category::Investment), 0);
        assert_eq!(svc.grand_total(&b), 3_300_000);
    }

    #[test]
    fn update_applies_only_given_fields() {
        let svc = AssetService::new();
        let mut b = buckets();
        svc.update_product(
            &mut b,
            Category::DepositSavings,
            "A",
            ProductPatch {
                amount: Some(42),
                ..ProductPatch::default()
            },
        )
        .unwrap();
        let a = svc.find(&b, Category::DepositSavings, "A").unwrap();
        assert_eq!(a.amount, 42);
        assert_eq!(a.name, "A");
    }

    #[test]
    fn lookups_are_per_category() {
        let svc = AssetService::new();
        let mut b = buckets();
        assert!(svc.find(&b, Category::Pension, "A").is_none());
        let err = svc.delete_product(&mut b, Category::Pension, "A").unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(id) if id == "A"));
    }

    #[test]
    fn delete_returns_removed() {
        let svc = AssetService::new();
        let mut b = buckets();
        let removed = svc.delete_product(&mut b, Category::Pension, "B").unwrap();
        assert_eq!(removed.name, "B");
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn memo_blank_clears() {
        let svc = AssetService::new();
        let mut b = buckets();
        svc.set_memo(&mut b, Category::Insurance, "C", Some("만기 자동연장".into()))
            .unwrap();
        assert_eq!(
            svc.find(&b, Category::Insurance, "C").unwrap().memo.as_deref(),
            Some("만기 자동연장")
        );
        svc.set_memo(&mut b, Category::Insurance, "C", Some("  ".into()))
            .unwrap();
        assert_eq!(svc.find(&b, Category::Insurance, "C").unwrap().memo, None);
    }

    #[test]
    fn validation_requires_names() {
        let svc = AssetService::new();
        let mut b = buckets();
        assert!(svc.validate_for_save(&b).is_ok());

        svc.add_product(&mut b, Category::Investment, AssetProduct::new_empty());
        let err = svc.validate_for_save(&b).unwrap_err();
        match err {
            CoreError::ValidationError(msg) => {
                assert!(msg.contains("Product name is required"));
                assert!(msg.contains("investment/"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn live_names_are_distinct_and_skip_blanks() {
        let svc = AssetService::new();
        let mut b = AssetBuckets::default();
        svc.add_product(&mut b, Category::Pension, AssetProduct::named("IRP", 0));
        svc.add_product(&mut b, Category::DepositSavings, AssetProduct::named("IRP", 0));
        svc.add_product(&mut b, Category::DepositSavings, AssetProduct::named("", 0));

        assert_eq!(svc.live_names(&b), vec!["IRP".to_string()]);
        assert_eq!(
            svc.row_keys(&b),
            vec![
                RowKey::new(Category::DepositSavings, "IRP"),
                RowKey::new(Category::Pension, "IRP"),
            ]
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
// PlanService
// ═══════════════════════════════════════════════════════════════════

mod plan {
    use super::*;

    fn plan() -> MonthlyPlan {
        let svc = PlanService::new();
        let mut plan = MonthlyPlan {
            income: 3_000_000,
            ..MonthlyPlan::default()
        };
        svc.add_item(&mut plan, PlanList::Savings, PlanItem::new("적금", 1_000_000));
        svc.add_item(&mut plan, PlanList::Savings, PlanItem::new("연금", 500_000));
        svc.add_item(&mut plan, PlanList::Cash, PlanItem::new("생활비", 2_000_000));
        plan
    }

    #[test]
    fn available_ignores_cash() {
        let svc = PlanService::new();
        let plan = plan();
        assert_eq!(svc.list_total(&plan, PlanList::Savings), 1_500_000);
        assert_eq!(svc.list_total(&plan, PlanList::Cash), 2_000_000);
        assert_eq!(svc.available_amount(&plan), 1_500_000);
    }

    #[test]
    fn available_floors_at_zero() {
        let svc = PlanService::new();
        let mut plan = plan();
        plan.income = 1_000_000;
        assert_eq!(svc.available_amount(&plan), 0);
    }

    #[test]
    fn update_remove_reorder() {
        let svc = PlanService::new();
        let mut plan = plan();
        let first = plan.savings[0].id.clone();

        svc.update_item(&mut plan, PlanList::Savings, &first, None, Some(700_000))
            .unwrap();
        assert_eq!(plan.savings[0].amount, 700_000);
        assert_eq!(plan.savings[0].name, "적금");

        svc.reorder_items(&mut plan, PlanList::Savings, 0, 1);
        assert_eq!(plan.savings[1].id, first);

        let removed = svc.remove_item(&mut plan, PlanList::Savings, &first).unwrap();
        assert_eq!(removed.amount, 700_000);
        assert_eq!(plan.savings.len(), 1);
    }

    #[test]
    fn unknown_item_is_an_error() {
        let svc = PlanService::new();
        let mut plan = plan();
        assert!(matches!(
            svc.remove_item(&mut plan, PlanList::Cash, "missing"),
            Err(CoreError::ValidationError(_))
        ));
        assert!(matches!(
            svc.update_item(&mut plan, PlanList::Cash, "missing", None, None),
            Err(CoreError::ValidationError(_))
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// AnnualService
// ═══════════════════════════════════════════════════════════════════

mod annual {
    use super::*;

    #[test]
    fn snapshots_and_changes() {
        let svc = AnnualService::new();
        let mut annual = AnnualTrend::new();
        svc.set_snapshot(&mut annual, 2025, 1, 10_000_000).unwrap();
        svc.set_snapshot(&mut annual, 2025, 2, 9_500_000).unwrap();

        let row = svc.year_row(&annual, 2025);
        assert_eq!(row.len(), 12);
        assert_eq!(row[0], Some(10_000_000));
        assert_eq!(row[2], None);

        assert_eq!(svc.change_from_previous(&annual, 2025, 1), None);
        assert_eq!(svc.change_from_previous(&annual, 2025, 2), Some(-500_000));
        assert_eq!(svc.change_from_previous(&annual, 2025, 3), None);
    }

    #[test]
    fn month_out_of_range() {
        let svc = AnnualService::new();
        let mut annual = AnnualTrend::new();
        assert!(matches!(
            svc.set_snapshot(&mut annual, 2025, 13, 1),
            Err(CoreError::ValidationError(_))
        ));
        assert!(svc.remove_snapshot(&mut annual, 2025, 0).is_err());
    }

    #[test]
    fn years_sorted_and_pruned() {
        let svc = AnnualService::new();
        let mut annual = AnnualTrend::new();
        svc.set_snapshot(&mut annual, 2025, 1, 1).unwrap();
        svc.set_snapshot(&mut annual, 2023, 6, 1).unwrap();
        assert_eq!(svc.years(&annual), vec![2023, 2025]);

        assert_eq!(svc.remove_snapshot(&mut annual, 2023, 6).unwrap(), Some(1));
        assert_eq!(svc.years(&annual), vec![2025]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Reducer
// ═══════════════════════════════════════════════════════════════════

mod reducer_actions {
    use super::*;

    #[test]
    fn failed_action_leaves_state_untouched() {
        let mut state = example_state();
        let before = state.clone();
        let err = reducer::apply(
            &mut state,
            Action::UpdateProduct {
                category: Category::Pension,
                id: "missing".into(),
                patch: ProductPatch::default(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn delete_leaves_other_deltas_alone() {
        let mut state = example_state();
        reducer::apply(
            &mut state,
            Action::DeleteProduct {
                category: Category::Pension,
                id: "B".into(),
            },
        )
        .unwrap();

        let svc = LedgerService::new();
        let live = AssetService::new().live_names(&state.assets);
        assert_eq!(svc.monthly_total(&state.trend, &live, m(2025, 1)), 500_000);
        assert_eq!(state.trend.delta("A", m(2025, 2)), -100_000);
        assert_eq!(state.trend.delta("B", m(2025, 1)), 200_000);
    }

    #[test]
    fn reorder_rows_reconciles_first() {
        let mut state = example_state();
        state.row_order = vec![RowKey::new(Category::Investment, "gone")];
        let trend_before = state.trend.clone();

        reducer::apply(&mut state, Action::ReorderRows { from: 2, to: 0 }).unwrap();
        let keys: Vec<String> = state.row_order.iter().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["pension:B", "depositSavings:A", "insurance:C"]);
        assert_eq!(state.trend, trend_before);
    }

    #[test]
    fn rename_orphans_history_by_default() {
        let mut state = example_state();
        reducer::apply(
            &mut state,
            Action::RenameProduct {
                category: Category::DepositSavings,
                id: "A".into(),
                name: "A2".into(),
                migrate_trend: false,
            },
        )
        .unwrap();
        assert_eq!(state.trend.delta("A", m(2025, 1)), 500_000);
        assert_eq!(state.trend.delta("A2", m(2025, 1)), 0);
    }

    #[test]
    fn rename_with_migration_moves_history_and_row() {
        let mut state = example_state();
        state.row_order = vec![
            RowKey::new(Category::DepositSavings, "A"),
            RowKey::new(Category::Pension, "B"),
        ];
        reducer::apply(
            &mut state,
            Action::RenameProduct {
                category: Category::DepositSavings,
                id: "A".into(),
                name: "A2".into(),
                migrate_trend: true,
            },
        )
        .unwrap();
        assert_eq!(state.trend.delta("A", m(2025, 1)), 0);
        assert_eq!(state.trend.delta("A2", m(2025, 1)), 500_000);
        assert_eq!(state.trend.delta("A2", m(2025, 2)), -100_000);
        assert_eq!(state.row_order[0], RowKey::new(Category::DepositSavings, "A2"));
    }

    #[test]
    fn name_patch_renames_row_without_moving_history() {
        let mut state = example_state();
        state.row_order = vec![
            RowKey::new(Category::Pension, "B"),
            RowKey::new(Category::DepositSavings, "A"),
        ];
        reducer::apply(
            &mut state,
            Action::UpdateProduct {
                category: Category::DepositSavings,
                id: "A".into(),
                patch: ProductPatch {
                    name: Some("A2".into()),
                    amount: Some(7),
                    ..ProductPatch::default()
                },
            },
        )
        .unwrap();
        let product = &state.assets.products(Category::DepositSavings)[0];
        assert_eq!((product.name.as_str(), product.amount), ("A2", 7));
        assert_eq!(
            state.row_order,
            vec![
                RowKey::new(Category::Pension, "B"),
                RowKey::new(Category::DepositSavings, "A2"),
            ]
        );
        assert_eq!(state.trend.delta("A", m(2025, 1)), 500_000);
        assert_eq!(state.trend.delta("A2", m(2025, 1)), 0);
    }

    #[test]
    fn rename_keeps_history_when_name_still_used() {
        let mut state = example_state();
        let mut twin = AssetProduct::named("A", 0);
        twin.id = "A-twin".into();
        state.assets.products_mut(Category::Investment).push(twin);

        reducer::apply(
            &mut state,
            Action::RenameProduct {
                category: Category::DepositSavings,
                id: "A".into(),
                name: "A2".into(),
                migrate_trend: true,
            },
        )
        .unwrap();
        assert_eq!(state.trend.delta("A", m(2025, 1)), 500_000);
        assert_eq!(state.trend.delta("A2", m(2025, 1)), 0);
    }

    #[test]
    fn delta_text_dash_stores_nothing() {
        let mut state = AppState::default();
        reducer::apply(
            &mut state,
            Action::SetDeltaText {
                asset_name: "A".into(),
                month: m(2025, 1),
                text: "-".into(),
            },
        )
        .unwrap();
        assert!(state.trend.is_empty());
    }

    #[test]
    fn plan_and_snapshot_actions() {
        let mut state = AppState::default();
        reducer::apply(&mut state, Action::SetIncome(2_000_000)).unwrap();
        reducer::apply(
            &mut state,
            Action::AddPlanItem {
                list: PlanList::Savings,
                item: PlanItem::new("적금", 500_000),
            },
        )
        .unwrap();
        reducer::apply(
            &mut state,
            Action::SetSnapshot {
                year: 2025,
                month: 6,
                value: 42,
            },
        )
        .unwrap();

        assert_eq!(PlanService::new().available_amount(&state.plan), 1_500_000);
        assert_eq!(state.annual.get(2025, 6), Some(42));
        assert!(reducer::apply(
            &mut state,
            Action::RemoveSnapshot {
                year: 2025,
                month: 13
            }
        )
        .is_err());
    }

    #[test]
    fn profile_is_normalized() {
        let mut state = AppState::default();
        reducer::apply(
            &mut state,
            Action::SetProfile(UserProfile {
                name: Some(" 홍길동 ".into()),
                gender: Some(String::new()),
                birth_date: None,
            }),
        )
        .unwrap();
        assert_eq!(state.profile.name.as_deref(), Some("홍길동"));
        assert_eq!(state.profile.gender, None);
    }
}
