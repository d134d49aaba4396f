//! Counter-order selection and settlement
//!
//! A match attempt runs once per newly placed order. It scans the order store
//! for the oldest open counter-order whose price crosses the taker's, takes
//! exclusive hold of both orders and both accounts, re-validates under the
//! hold, and settles in one atomic unit. Losing a race to a concurrent
//! attempt is not an error: the attempt simply produces no trade.

use rust_decimal::Decimal;
use types::account::Account;
use types::errors::ExchangeError;
use types::fee::FeeSchedule;
use types::ids::{OrderId, Symbol};
use types::numeric::Price;
use types::order::Side;
use types::trade::Trade;

use crate::store::{AccountStore, OrderStore, SharedOrder, TradeStore};

/// True when an order at `taker_price` crosses a resting counter-order at
/// `counter_price`.
fn crosses(taker_side: Side, taker_price: Price, counter_price: Price) -> bool {
    match taker_side {
        Side::Buy => counter_price <= taker_price,
        Side::Sell => counter_price >= taker_price,
    }
}

struct TakerSnapshot {
    order_id: OrderId,
    symbol: Symbol,
    side: Side,
    price: Price,
}

/// Select the oldest open counter-order whose price crosses the taker's.
///
/// First-come-first-served: candidates are ranked by creation time alone,
/// never by price; ties break on order id. Quantity is deliberately not part
/// of eligibility — the whole-quantity check happens after selection, and a
/// mismatch ends the attempt.
fn select_counter(orders: &OrderStore, taker: &TakerSnapshot) -> Option<(OrderId, SharedOrder)> {
    let mut best: Option<(i64, OrderId, SharedOrder)> = None;
    for handle in orders.handles() {
        let candidate = handle.lock();
        if candidate.order_id == taker.order_id || !candidate.is_open() {
            continue;
        }
        if candidate.symbol != taker.symbol || candidate.side != taker.side.opposite() {
            continue;
        }
        if !crosses(taker.side, taker.price, candidate.price) {
            continue;
        }
        let key = (candidate.created_at, candidate.order_id);
        let better = match &best {
            None => true,
            Some((created_at, order_id, _)) => key < (*created_at, *order_id),
        };
        if better {
            drop(candidate);
            best = Some((key.0, key.1, handle));
        }
    }
    best.map(|(_, order_id, handle)| (order_id, handle))
}

/// Attempt one match for the given taker order.
///
/// Returns the settled trade, or `None` when no trade was produced (no
/// crossing counter-order, a quantity mismatch, or a lost race). Only an
/// internal invariant break is an error.
pub(crate) fn attempt(
    fees: &FeeSchedule,
    accounts: &AccountStore,
    orders: &OrderStore,
    trades: &TradeStore,
    taker: &SharedOrder,
    now: i64,
) -> Result<Option<Trade>, ExchangeError> {
    let snapshot = {
        let guard = taker.lock();
        if !guard.is_open() {
            return Ok(None);
        }
        TakerSnapshot {
            order_id: guard.order_id,
            symbol: guard.symbol.clone(),
            side: guard.side,
            price: guard.price,
        }
    };

    let Some((counter_id, counter)) = select_counter(orders, &snapshot) else {
        tracing::debug!(order_id = %snapshot.order_id, "no crossing counter-order");
        return Ok(None);
    };

    // Exclusive holds: both orders by ascending id, then both accounts by
    // ascending id. Every code path acquires in this sequence, so two
    // concurrent settlements cannot deadlock.
    let (first, second) = if snapshot.order_id < counter_id {
        (taker, &counter)
    } else {
        (&counter, taker)
    };
    let mut first_guard = first.lock();
    let mut second_guard = second.lock();

    // Re-validate under the hold: a concurrent attempt may have settled or
    // the owner cancelled either side since the scan. Side, symbol and price
    // are immutable, so the crossing still holds if both are open.
    if !first_guard.is_open() || !second_guard.is_open() {
        tracing::debug!(
            taker = %snapshot.order_id,
            counter = %counter_id,
            "counter-order no longer open, lost the race"
        );
        return Ok(None);
    }

    let (buy, sell) = if first_guard.side == Side::Buy {
        (&mut *first_guard, &mut *second_guard)
    } else {
        (&mut *second_guard, &mut *first_guard)
    };

    // Whole-quantity matching only: a crossing counter-order of a different
    // size is not partially filled; both orders stay open.
    if buy.quantity != sell.quantity {
        tracing::debug!(
            buy = %buy.order_id,
            sell = %sell.order_id,
            "quantity mismatch, no fill"
        );
        return Ok(None);
    }

    // The resting seller's quoted price is honored regardless of which side
    // is the taker.
    let breakdown = fees.breakdown(sell.price, sell.quantity);
    let total_cost = breakdown.total();
    if buy.reserved_usd < total_cost {
        tracing::error!(
            buy = %buy.order_id,
            reserved = %buy.reserved_usd,
            cost = %total_cost,
            "reservation does not cover settlement cost"
        );
        return Err(ExchangeError::Inconsistency {
            detail: format!(
                "buy order {} reserved {} but settlement costs {}",
                buy.order_id, buy.reserved_usd, total_cost
            ),
        });
    }
    let refund = buy.reserved_usd - total_cost;
    let quantity = sell.quantity.as_decimal();
    let symbol = sell.symbol.clone();

    let buyer_handle = accounts.get(&buy.account_id).ok_or_else(|| {
        ExchangeError::Inconsistency {
            detail: format!("buyer account {} missing", buy.account_id),
        }
    })?;
    let seller_handle = accounts.get(&sell.account_id).ok_or_else(|| {
        ExchangeError::Inconsistency {
            detail: format!("seller account {} missing", sell.account_id),
        }
    })?;

    if buy.account_id == sell.account_id {
        // An account is allowed to fill its own order; it simply pays the fee.
        let mut account = buyer_handle.lock();
        settle_seller(&mut account, &symbol, breakdown.volume, quantity)?;
        settle_buyer(&mut account, &symbol, refund, quantity);
        account.touch(now);
    } else {
        let (low, high) = if buy.account_id < sell.account_id {
            (&buyer_handle, &seller_handle)
        } else {
            (&seller_handle, &buyer_handle)
        };
        let mut low_guard = low.lock();
        let mut high_guard = high.lock();
        let (buyer, seller) = if low_guard.account_id == buy.account_id {
            (&mut *low_guard, &mut *high_guard)
        } else {
            (&mut *high_guard, &mut *low_guard)
        };
        settle_seller(seller, &symbol, breakdown.volume, quantity)?;
        settle_buyer(buyer, &symbol, refund, quantity);
        buyer.touch(now);
        seller.touch(now);
    }

    buy.fill(now);
    sell.fill(now);

    let trade = Trade::new(
        symbol,
        buy.order_id,
        sell.order_id,
        buy.account_id,
        sell.account_id,
        sell.price,
        sell.quantity,
        breakdown.volume,
        breakdown.fee,
        now,
    );
    trades.insert(trade.clone());

    tracing::info!(
        trade_id = %trade.trade_id,
        symbol = %trade.symbol,
        price = %trade.price,
        quantity = %trade.quantity,
        volume_usd = %trade.volume_usd,
        fee_usd = %trade.fee_usd,
        "trade settled"
    );
    Ok(Some(trade))
}

/// Seller side: hand over the reserved quantity, collect the gross volume.
///
/// The holding deduction is the only fallible settlement step and runs before
/// any other mutation, so a failure leaves no partial state.
fn settle_seller(
    account: &mut Account,
    symbol: &Symbol,
    volume: Decimal,
    quantity: Decimal,
) -> Result<(), ExchangeError> {
    account
        .holding_mut(symbol)
        .settle_reserved(quantity)
        .map_err(|e| ExchangeError::Inconsistency {
            detail: format!("seller settlement: {e}"),
        })?;
    account.credit_usd(volume);
    Ok(())
}

/// Buyer side: refund the unspent reservation, credit the asset.
fn settle_buyer(account: &mut Account, symbol: &Symbol, refund: Decimal, quantity: Decimal) {
    account.credit_usd(refund);
    account.holding_mut(symbol).credit(quantity);
}
