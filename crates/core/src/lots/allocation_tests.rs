#[cfg(test)]
mod tests {
    use crate::fx::Currency;
    use crate::lots::{allocate_sale, AllocationError, CostingMethod, Lot, ManualAllocation};
    use crate::test_fixtures::day;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn lot(id: &str, quantity: Decimal, unit_cost: Decimal, d: u32) -> Lot {
        Lot {
            id: id.to_string(),
            trade_date: day(d),
            quantity,
            unit_cost,
            currency: Currency::Ars,
            fx_at_trade: None,
            fx_missing: true,
        }
    }

    fn open_lots() -> Vec<Lot> {
        vec![
            lot("l1", dec!(10), dec!(100), 1),
            lot("l2", dec!(5), dec!(120), 2),
        ]
    }

    fn pick(lot_id: &str, quantity: Decimal) -> ManualAllocation {
        ManualAllocation {
            lot_id: lot_id.to_string(),
            quantity,
        }
    }

    // ==================== Automatic Methods ====================

    #[test]
    fn test_fifo_relieves_oldest_lot() {
        let sale =
            allocate_sale(&open_lots(), dec!(12), dec!(150), CostingMethod::Fifo, None).unwrap();

        assert_eq!(sale.allocations.len(), 2);
        assert_eq!(sale.allocations[0].lot_id, "l1");
        assert_eq!(sale.allocations[0].quantity, dec!(10));
        assert_eq!(sale.allocations[1].quantity, dec!(2));
        assert_eq!(sale.total_qty_sold, dec!(12));
        assert_eq!(sale.total_cost_native, dec!(1240));
        assert_eq!(sale.proceeds_native, dec!(1800));
        assert_eq!(sale.realized_pnl_native, dec!(560));
    }

    #[test]
    fn test_lifo_relieves_newest_lot() {
        let sale =
            allocate_sale(&open_lots(), dec!(6), dec!(150), CostingMethod::Lifo, None).unwrap();

        assert_eq!(sale.allocations[0].lot_id, "l2");
        assert_eq!(sale.allocations[0].quantity, dec!(5));
        assert_eq!(sale.allocations[1].lot_id, "l1");
        assert_eq!(sale.allocations[1].quantity, dec!(1));
        assert_eq!(sale.total_cost_native, dec!(700));
    }

    #[test]
    fn test_average_uses_blended_cost() {
        // (10 * 100 + 5 * 120) / 15 = 106.666...
        let sale =
            allocate_sale(&open_lots(), dec!(3), dec!(150), CostingMethod::Average, None).unwrap();

        assert_eq!(sale.total_qty_sold, dec!(3));
        assert_eq!(sale.allocations[0].quantity, dec!(2));
        assert_eq!(sale.allocations[1].quantity, dec!(1));
        assert_eq!(sale.total_cost_native, dec!(320));
        assert_eq!(sale.realized_pnl_native, dec!(130));
    }

    #[test]
    fn test_average_full_sale_with_fine_quantities() {
        let lots = vec![
            lot("e1", dec!(0.123456789), dec!(2000), 1),
            lot("e2", dec!(0.5), dec!(2000), 2),
        ];

        let sale =
            allocate_sale(&lots, dec!(0.623456789), dec!(2500), CostingMethod::Average, None)
                .unwrap();

        assert_eq!(sale.total_qty_sold, dec!(0.623456789));
        assert_eq!(sale.allocations[0].quantity, dec!(0.123456789));
        assert_eq!(sale.allocations[1].quantity, dec!(0.5));
        for (allocation, lot) in sale.allocations.iter().zip(&lots) {
            assert!(allocation.quantity <= lot.quantity);
        }
    }

    #[test]
    fn test_sale_beyond_open_quantity_is_rejected() {
        let err = allocate_sale(&open_lots(), dec!(16), dec!(150), CostingMethod::Fifo, None)
            .unwrap_err();

        assert_eq!(
            err,
            AllocationError::InsufficientQuantity {
                requested: dec!(16),
                available: dec!(15),
            }
        );
    }

    #[test]
    fn test_negative_inputs_are_rejected() {
        assert_eq!(
            allocate_sale(&open_lots(), dec!(-1), dec!(150), CostingMethod::Fifo, None),
            Err(AllocationError::NegativeQuantity(dec!(-1)))
        );
        assert_eq!(
            allocate_sale(&open_lots(), dec!(1), dec!(-150), CostingMethod::Fifo, None),
            Err(AllocationError::NegativePrice(dec!(-150)))
        );
    }

    #[test]
    fn test_zero_quantity_sale_allocates_nothing() {
        let sale =
            allocate_sale(&open_lots(), dec!(0), dec!(150), CostingMethod::Fifo, None).unwrap();

        assert!(sale.allocations.is_empty());
        assert_eq!(sale.realized_pnl_native, Decimal::ZERO);
    }

    // ==================== Manual Selection ====================

    #[test]
    fn test_manual_without_selection_is_pending() {
        let lots = open_lots();
        assert_eq!(
            allocate_sale(&lots, dec!(3), dec!(150), CostingMethod::Manual, None),
            Err(AllocationError::SelectionPending)
        );
        assert_eq!(
            allocate_sale(&lots, dec!(3), dec!(150), CostingMethod::Manual, Some(&[])),
            Err(AllocationError::SelectionPending)
        );
    }

    #[test]
    fn test_manual_selection_of_zeroes_is_empty() {
        let selection = [pick("l1", dec!(0)), pick("l2", dec!(0))];

        assert_eq!(
            allocate_sale(
                &open_lots(),
                dec!(3),
                dec!(150),
                CostingMethod::Manual,
                Some(&selection)
            ),
            Err(AllocationError::EmptySelection { desired: dec!(3) })
        );
    }

    #[test]
    fn test_manual_selection_must_match_sale_quantity() {
        let selection = [pick("l1", dec!(1)), pick("l2", dec!(1))];

        assert_eq!(
            allocate_sale(
                &open_lots(),
                dec!(3),
                dec!(150),
                CostingMethod::Manual,
                Some(&selection)
            ),
            Err(AllocationError::SelectionMismatch {
                selected: dec!(2),
                desired: dec!(3),
            })
        );
    }

    #[test]
    fn test_manual_selection_errors_per_lot() {
        let lots = open_lots();
        let run = |selection: &[ManualAllocation]| {
            allocate_sale(&lots, dec!(3), dec!(150), CostingMethod::Manual, Some(selection))
                .unwrap_err()
        };

        assert_eq!(
            run(&[pick("nope", dec!(3))]),
            AllocationError::UnknownLot("nope".to_string())
        );
        assert_eq!(
            run(&[pick("l1", dec!(1)), pick("l1", dec!(2))]),
            AllocationError::DuplicateLot("l1".to_string())
        );
        assert_eq!(
            run(&[pick("l1", dec!(-1)), pick("l2", dec!(4))]),
            AllocationError::NegativeSelection {
                lot_id: "l1".to_string(),
                quantity: dec!(-1),
            }
        );
        assert_eq!(
            run(&[pick("l2", dec!(6))]),
            AllocationError::ExceedsLot {
                lot_id: "l2".to_string(),
                requested: dec!(6),
                available: dec!(5),
            }
        );
    }

    #[test]
    fn test_manual_allocations_follow_lot_order() {
        let selection = [pick("l2", dec!(2)), pick("l1", dec!(1))];

        let sale = allocate_sale(
            &open_lots(),
            dec!(3),
            dec!(150),
            CostingMethod::Manual,
            Some(&selection),
        )
        .unwrap();

        assert_eq!(sale.allocations[0].lot_id, "l1");
        assert_eq!(sale.allocations[1].lot_id, "l2");
        assert_eq!(sale.total_cost_native, dec!(340));
        assert_eq!(sale.method, CostingMethod::Manual);
    }
}
