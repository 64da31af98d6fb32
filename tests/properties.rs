//--------------------------------------------------------------------------------------------------
// TEST MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Property-based tests using `proptest`. Random command sequences are applied to a fresh engine
// and the book invariants are checked after every step.
//--------------------------------------------------------------------------------------------------

use proptest::prelude::*;

use exchange_matching::{
    BookQuery, MatchingEngine, MatchingError, OrderId, Price, Side, Size,
};

#[derive(Debug, Clone)]
enum Op {
    Send { id: OrderId, side: Side, price: Price, size: Size },
    Modify { id: OrderId, price: Price, size: Size },
    Cancel { id: OrderId },
}

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Buy), Just(Side::Sell)]
}

/// Mostly small sizes, with the occasional one at the top of the range.
fn size() -> impl Strategy<Value = Size> {
    prop_oneof![
        8 => -2i64..15,
        1 => (Size::MAX - 4)..=Size::MAX,
    ]
}

/// Small id and price ranges so duplicates and crossings happen often.
fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0u64..20, side(), -2i64..20, size())
            .prop_map(|(id, side, price, size)| Op::Send { id, side, price, size }),
        1 => (0u64..20, -2i64..20, size())
            .prop_map(|(id, price, size)| Op::Modify { id, price, size }),
        2 => (0u64..20).prop_map(|id| Op::Cancel { id }),
    ]
}

fn snapshot(engine: &MatchingEngine) -> Vec<(OrderId, Side, Price, Size)> {
    engine
        .resting_orders()
        .into_iter()
        .map(|o| (o.id, o.side, o.price, o.size))
        .collect()
}

/// Both sides together can exceed `Size`, so sum wider.
fn resting_volume(engine: &MatchingEngine) -> i128 {
    engine.resting_orders().iter().map(|o| o.size as i128).sum()
}

proptest! {
    #[test]
    fn send_rejects_ids_already_resting(ops in prop::collection::vec(op(), 1..80)) {
        let mut engine = MatchingEngine::new();
        for op in ops {
            if let Op::Send { id, side, price, size } = op {
                let was_resting = engine.order_book().contains(id);
                let result = engine.send(id, side, price, size);
                if was_resting {
                    prop_assert_eq!(result.unwrap_err(), MatchingError::DuplicateOrderId(id));
                }
            }
        }
    }

    #[test]
    fn invalid_send_never_mutates(
        setup in prop::collection::vec(op(), 0..40),
        id in 100u64..200,
        side in side(),
        price in -50i64..=0,
        size in -50i64..20,
    ) {
        let mut engine = MatchingEngine::new();
        for op in setup {
            if let Op::Send { id, side, price, size } = op {
                let _ = engine.send(id, side, price, size);
            }
        }
        let before = snapshot(&engine);

        prop_assert!(engine.send(id, side, price, size).is_err());
        prop_assert!(engine.send(id, side, 10, -size.abs()).is_err());
        prop_assert_eq!(snapshot(&engine), before);
    }

    #[test]
    fn crossing_conserves_volume(ops in prop::collection::vec(op(), 1..80)) {
        let mut engine = MatchingEngine::new();
        for op in ops {
            let Op::Send { id, side, price, size } = op else { continue };
            let volume_before = resting_volume(&engine);
            let resting_before = engine.order_book().len();

            if let Ok(outcome) = engine.send(id, side, price, size) {
                let filled = outcome.filled_size();
                // Each fill takes the same size from both sides
                prop_assert_eq!(volume_before + size as i128, resting_volume(&engine) + 2 * filled as i128);
                prop_assert!(filled <= size);
                // Every step but the last removes a resting order
                prop_assert!(outcome.fills.len() <= resting_before);
                for fill in &outcome.fills {
                    prop_assert!(fill.size > 0);
                    prop_assert!(side.crosses(price, fill.price));
                }
            }
        }
    }

    #[test]
    fn book_holds_only_valid_uncrossed_orders(ops in prop::collection::vec(op(), 1..80)) {
        let mut engine = MatchingEngine::new();
        for op in ops {
            match op {
                Op::Send { id, side, price, size } => { let _ = engine.send(id, side, price, size); }
                Op::Cancel { id } => { let _ = engine.cancel(id); }
                // Modify may legitimately cross the book
                Op::Modify { .. } => continue,
            }

            for order in engine.resting_orders() {
                prop_assert!(order.size > 0);
                prop_assert!(order.price > 0);
            }
            for side in [Side::Buy, Side::Sell] {
                prop_assert!(engine.depth(side, usize::MAX).iter().all(|level| level.total_size > 0));
            }
            prop_assert!(engine.total_size_at_price(Price::MAX, Side::Buy).is_ok_and(|size| size >= 0));
            prop_assert!(engine.total_size_at_price(0, Side::Sell).is_ok_and(|size| size >= 0));
            if let (Ok(buy), Ok(sell)) = (engine.highest_buy_price(), engine.lowest_sell_price()) {
                prop_assert!(buy.price < sell.price);
            }
        }
    }

    #[test]
    fn failed_modify_and_cancel_never_mutate(ops in prop::collection::vec(op(), 1..80)) {
        let mut engine = MatchingEngine::new();
        for op in ops {
            let before = snapshot(&engine);
            let failed = match op {
                Op::Send { id, side, price, size } => engine.send(id, side, price, size).is_err(),
                Op::Modify { id, price, size } => engine.modify(id, price, size).is_err(),
                Op::Cancel { id } => engine.cancel(id).is_err(),
            };
            if failed {
                prop_assert_eq!(snapshot(&engine), before);
            }
        }
    }

    #[test]
    fn cancel_of_unknown_id_always_fails(
        setup in prop::collection::vec(op(), 0..40),
        ids in prop::collection::vec(20u64..40, 1..20),
    ) {
        let mut engine = MatchingEngine::new();
        for op in setup {
            if let Op::Send { id, side, price, size } = op {
                let _ = engine.send(id, side, price, size);
            }
        }
        let before = snapshot(&engine);

        for id in ids {
            prop_assert_eq!(engine.cancel(id), Err(MatchingError::OrderNotFound(id)));
            prop_assert_eq!(snapshot(&engine), before.clone());
        }
    }
}
