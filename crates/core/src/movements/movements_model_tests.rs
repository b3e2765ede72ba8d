#[cfg(test)]
mod tests {
    use crate::fx::Currency;
    use crate::movements::{
        AssetClass, Fee, FeeMode, LotEffect, Movement, MovementIndex, MovementType,
    };
    use crate::test_fixtures::{buy, day, movement, sell};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    // ==================== Amount Tests ====================

    #[test]
    fn test_percent_fee_adds_to_buy_net() {
        let mut m = buy("b1", "acc", "AAPL", dec!(10), dec!(100), 1);
        m.fee = Some(Fee {
            mode: FeeMode::Percent,
            amount: dec!(0.5),
            currency: None,
        });
        assert_eq!(m.gross_amount(), dec!(1000));
        assert_eq!(m.fee_amount(), dec!(5));
        assert_eq!(m.net_amount(), dec!(1005));
        assert_eq!(m.net_unit_price(), Some(dec!(100.5)));
    }

    #[test]
    fn test_fixed_fee_subtracts_from_sell_net() {
        let mut m = sell("s1", "acc", "AAPL", dec!(4), dec!(150), 2);
        m.fee = Some(Fee {
            mode: FeeMode::Fixed,
            amount: dec!(12),
            currency: Some(Currency::Ars),
        });
        assert_eq!(m.net_amount(), dec!(588));
    }

    #[test]
    fn test_fixed_fee_in_other_currency_uses_trade_rate() {
        // USD fee on an ARS trade, trade-time rate 1000
        let mut m = buy("b1", "acc", "AAPL", dec!(1), dec!(20000), 1);
        m.fee = Some(Fee {
            mode: FeeMode::Fixed,
            amount: dec!(2),
            currency: Some(Currency::Usd),
        });
        assert_eq!(m.fee_amount(), dec!(2000));

        m.fx = None;
        assert_eq!(m.fee_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_ledger_net_takes_precedence() {
        let mut m = buy("b1", "acc", "AAPL", dec!(10), dec!(100), 1);
        m.totals.net = Some(dec!(1010));
        assert_eq!(m.net_amount(), dec!(1010));
    }

    #[test]
    fn test_lot_effects() {
        assert_eq!(MovementType::Buy.lot_effect(), LotEffect::Add);
        assert_eq!(MovementType::TransferIn.lot_effect(), LotEffect::Add);
        assert_eq!(MovementType::Withdraw.lot_effect(), LotEffect::Reduce);
        assert_eq!(MovementType::TransferOut.lot_effect(), LotEffect::Reduce);
        assert_eq!(MovementType::Interest.lot_effect(), LotEffect::None);
        assert_eq!(MovementType::BuyUsd.lot_effect(), LotEffect::None);
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_movement_json_shape() {
        let json = r#"{
            "id": "m1",
            "timestamp": "2024-01-05T15:00:00Z",
            "type": "TRANSFER_IN",
            "assetClass": "crypto",
            "instrumentId": null,
            "symbol": "BTC",
            "accountId": "binance",
            "quantity": 0.5,
            "unitPrice": 42000,
            "tradeCurrency": "USDT",
            "fee": null,
            "fx": null
        }"#;
        let m: Movement = serde_json::from_str(json).unwrap();
        assert_eq!(m.movement_type, MovementType::TransferIn);
        assert_eq!(m.asset_class, AssetClass::Crypto);
        assert_eq!(m.trade_currency, Currency::Usd);
        assert_eq!(m.instrument_key(), Some("BTC"));
        assert!(m.fx_at_trade().is_none());
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_validate_rejects_negative_quantity() {
        let mut m = buy("b1", "acc", "AAPL", dec!(10), dec!(100), 1);
        assert!(m.validate().is_ok());
        m.quantity = dec!(-1);
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_validate_requires_instrument_for_cedear() {
        let mut m = buy("b1", "acc", "AAPL", dec!(10), dec!(100), 1);
        m.symbol = None;
        assert!(m.validate().is_err());

        let mut deposit = movement(
            "d1",
            MovementType::Deposit,
            AssetClass::Currency,
            "acc",
            "ARS",
            dec!(5000),
            Decimal::ONE,
            Currency::Ars,
            day(1),
        );
        deposit.symbol = None;
        assert!(deposit.validate().is_ok());
    }

    // ==================== Index Tests ====================

    #[test]
    fn test_last_trade_picks_latest_same_currency() {
        let mut usd_trade = buy("b3", "acc", "FCI1", dec!(1), dec!(0.9), 9);
        usd_trade.trade_currency = Currency::Usd;
        let movements = vec![
            buy("b1", "acc", "FCI1", dec!(10), dec!(40), 1),
            buy("b2", "acc", "FCI1", dec!(10), dec!(50), 5),
            usd_trade,
            buy("b4", "other", "FCI1", dec!(10), dec!(70), 9),
        ];
        let index = MovementIndex::new(&movements);

        let last = index.last_trade("acc", "FCI1", Currency::Ars).unwrap();
        assert_eq!(last.price, dec!(50));
        assert_eq!(last.timestamp, day(5));
        assert_eq!(index.for_position("acc", "FCI1").len(), 3);
        assert!(index.last_trade("acc", "MISSING", Currency::Ars).is_none());
    }

    #[test]
    fn test_index_lookup_with_short_lived_keys() {
        let movements = vec![
            buy("b1", "acc", "FCI1", dec!(10), dec!(40), 1),
            buy("b2", "acc", "FCI2", dec!(5), dec!(60), 2),
        ];
        let index = MovementIndex::new(&movements);

        for symbol in ["FCI1", "FCI2"] {
            let account = String::from("acc");
            let key = symbol.to_string();
            assert_eq!(index.for_position(&account, &key).len(), 1);
        }
        assert!(index.for_position("other", "FCI1").is_empty());
        assert!(!index.is_empty());
    }

    #[test]
    fn test_last_trade_ignores_zero_prices() {
        let movements = vec![buy("b1", "acc", "FCI1", dec!(10), Decimal::ZERO, 1)];
        let index = MovementIndex::new(&movements);
        assert!(index.last_trade("acc", "FCI1", Currency::Ars).is_none());
    }
}
