#[cfg(test)]
mod tests {
    use crate::accounts::{AccountClass, Compounding};
    use crate::assets::{AssetCategory, AssetRowMetrics};
    use crate::fixed_deposits::FixedDeposit;
    use crate::fx::{Currency, FxOverridesMap};
    use crate::movements::{Movement, MovementIndex};
    use crate::portfolio::item_valuation::value_fixed_deposit;
    use crate::portfolio::{
        build_lot_detail, build_plazo_detail, build_wallet_yield_detail, value_row,
        CollectingDiagnostics, DiagnosticEvent, Item, NoopDiagnostics, PriceSource,
        ValuationContext, YieldMeta,
    };
    use crate::test_fixtures::{buy, cash_ars, date, rates, row, sell};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn broker_item(row: &AssetRowMetrics) -> Item {
        let rates = rates();
        let overrides = FxOverridesMap::new();
        let movements: Vec<Movement> = Vec::new();
        let index = MovementIndex::new(&movements);
        let ctx = ValuationContext {
            account_id: "acc",
            class: AccountClass::Broker,
            overrides: &overrides,
            rates: &rates,
            movements: &index,
        };
        value_row(&ctx, row)
    }

    fn aapl(quantity: Decimal, price: Option<Decimal>) -> Item {
        broker_item(&row("AAPL", AssetCategory::Cedear, quantity, price, Currency::Ars))
    }

    // ==================== Lot Detail Tests ====================

    #[test]
    fn test_lot_cost_uses_rate_at_trade() {
        let item = aapl(dec!(10), Some(dec!(150)));
        let b1 = buy("b1", "acc", "AAPL", dec!(10), dec!(100), 1);

        let detail = build_lot_detail(&item, &[&b1], &NoopDiagnostics);

        assert_eq!(detail.lots.len(), 1);
        let lot = &detail.lots[0];
        assert_eq!(lot.fx_at_trade, Some(dec!(1000)));
        assert!(!lot.fx_missing);
        assert_eq!(lot.cost_native, dec!(1000));
        assert_eq!(lot.cost_usd, dec!(1));
        assert_eq!(lot.value_native, dec!(1500));
        assert_eq!(lot.value_ars, dec!(1500));
        assert_eq!(lot.pnl_native, dec!(500));
        assert_eq!(lot.pnl_pct, Some(dec!(50)));
        assert_eq!(detail.cost_native, dec!(1000));
        assert_eq!(detail.pnl_native, dec!(500));
        assert_eq!(detail.lot_quantity, dec!(10));
    }

    #[test]
    fn test_lot_without_trade_rate_uses_current_rate() {
        let item = aapl(dec!(10), Some(dec!(150)));
        let mut b1 = buy("b1", "acc", "AAPL", dec!(10), dec!(115), 1);
        b1.fx = None;

        let detail = build_lot_detail(&item, &[&b1], &NoopDiagnostics);
        let lot = &detail.lots[0];

        // 1150 ARS at MEP buy 1150
        assert!(lot.fx_missing);
        assert_eq!(lot.fx_at_trade, None);
        assert_eq!(lot.cost_usd, dec!(1));
    }

    #[test]
    fn test_lots_follow_fifo_after_partial_sale() {
        let item = aapl(dec!(3), Some(dec!(150)));
        let movements: Vec<Movement> = vec![
            buy("b1", "acc", "AAPL", dec!(10), dec!(100), 1),
            buy("b2", "acc", "AAPL", dec!(5), dec!(120), 2),
            sell("s1", "acc", "AAPL", dec!(12), dec!(150), 3),
        ];
        let refs: Vec<&Movement> = movements.iter().collect();
        let diagnostics = CollectingDiagnostics::new();

        let detail = build_lot_detail(&item, &refs, &diagnostics);

        assert_eq!(detail.lots.len(), 1);
        assert_eq!(detail.lots[0].lot_id, "b2");
        assert_eq!(detail.lots[0].quantity, dec!(3));
        assert_eq!(detail.cost_native, dec!(360));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_lot_quantity_mismatch_is_reported() {
        let item = aapl(dec!(10), Some(dec!(150)));
        let b1 = buy("b1", "acc", "AAPL", dec!(8), dec!(100), 1);
        let diagnostics = CollectingDiagnostics::new();

        let detail = build_lot_detail(&item, &[&b1], &diagnostics);

        assert_eq!(detail.lot_quantity, dec!(8));
        assert_eq!(
            diagnostics.events(),
            vec![DiagnosticEvent::LotQuantityMismatch {
                item_id: "acc:AAPL".to_string(),
                lot_quantity: dec!(8),
                item_quantity: dec!(10),
            }]
        );
    }

    #[test]
    fn test_no_movements_gives_empty_detail_without_diagnostics() {
        let item = aapl(dec!(10), Some(dec!(150)));
        let diagnostics = CollectingDiagnostics::new();

        let detail = build_lot_detail(&item, &[], &diagnostics);

        assert!(detail.lots.is_empty());
        assert_eq!(detail.cost_native, Decimal::ZERO);
        assert_eq!(detail.pnl_pct, None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unpriced_item_values_lots_at_zero() {
        let item = aapl(dec!(10), None);
        let b1 = buy("b1", "acc", "AAPL", dec!(10), dec!(100), 1);

        let detail = build_lot_detail(&item, &[&b1], &NoopDiagnostics);

        assert_eq!(detail.price_meta.source, PriceSource::Missing);
        assert_eq!(detail.value_native, Decimal::ZERO);
        assert_eq!(detail.pnl_native, dec!(-1000));
    }

    // ==================== Wallet Yield Tests ====================

    fn yield_meta(compounding: Compounding) -> YieldMeta {
        YieldMeta {
            tna: dec!(36.5),
            tea: dec!(44),
            compounding,
            last_accrual_date: Some(date(2024, 1, 5)),
        }
    }

    #[test]
    fn test_wallet_yield_projection() {
        let item = broker_item(&cash_ars(dec!(365000)));

        let simple = build_wallet_yield_detail(
            &item,
            &yield_meta(Compounding::Simple),
            date(2024, 1, 10),
        );
        assert_eq!(simple.daily_interest, dec!(365));
        assert_eq!(simple.interest_30d, dec!(10950));
        assert_eq!(simple.pending_accrual_days, Some(5));
        assert_eq!(simple.balance_ars, dec!(365000));

        let monthly = build_wallet_yield_detail(
            &item,
            &yield_meta(Compounding::Monthly),
            date(2024, 1, 10),
        );
        assert_eq!(monthly.interest_30d, dec!(11102.083333));

        let daily = build_wallet_yield_detail(
            &item,
            &yield_meta(Compounding::Daily),
            date(2024, 1, 10),
        );
        // 1.001^30 compounds past both
        assert!(daily.interest_30d > monthly.interest_30d);
        assert!(daily.interest_30d > simple.interest_30d);
    }

    #[test]
    fn test_pending_accrual_never_negative() {
        let item = broker_item(&cash_ars(dec!(1000)));
        let detail = build_wallet_yield_detail(
            &item,
            &yield_meta(Compounding::Daily),
            date(2024, 1, 1),
        );
        assert_eq!(detail.pending_accrual_days, Some(0));
    }

    // ==================== Plazo Detail Tests ====================

    #[test]
    fn test_plazo_detail_projects_deposit() {
        let deposit = FixedDeposit {
            id: "pf-1".to_string(),
            bank_id: "galicia".to_string(),
            bank_name: "Galicia".to_string(),
            principal: dec!(890000),
            currency: Currency::Ars,
            tna: dec!(36.5),
            term_days: 30,
            start_date: date(2024, 1, 1),
            maturity_date: date(2024, 1, 31),
            expected_interest: None,
        };
        let valuation_date = date(2024, 1, 11);
        let item = value_fixed_deposit(&deposit, valuation_date, &FxOverridesMap::new(), &rates());

        let detail = build_plazo_detail(&item, &deposit, valuation_date);

        assert_eq!(detail.item_id, "galicia:pf-1");
        assert_eq!(detail.elapsed_days, 10);
        assert_eq!(detail.remaining_days, 20);
        assert_eq!(detail.accrued_interest, dec!(8900));
        assert_eq!(detail.current_value, dec!(898900));
        assert_eq!(detail.expected_interest, dec!(26700));
        assert_eq!(detail.expected_payout, dec!(916700));
    }
}
