//! Order placement and cancellation
//!
//! Placement validates the request, applies the reservation under the owner's
//! exclusive hold, and inserts the order as open before the hold is released —
//! the debit and the order appear together or not at all. Cancellation is the
//! exact inverse for an order that never matched.

use rust_decimal::Decimal;
use types::errors::{AccountError, ExchangeError, OrderError, ValidationError};
use types::ids::{AccountId, OrderId};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

use crate::config::EngineConfig;
use crate::engine::PlaceOrderRequest;
use crate::store::{AccountStore, OrderStore, SharedOrder};

pub(crate) fn place(
    config: &EngineConfig,
    accounts: &AccountStore,
    orders: &OrderStore,
    request: &PlaceOrderRequest,
    now: i64,
) -> Result<SharedOrder, ExchangeError> {
    if !config.supports(&request.symbol) {
        return Err(ValidationError::UnsupportedSymbol {
            symbol: request.symbol.to_string(),
        }
        .into());
    }
    let price = Price::try_new(request.price)?;
    let quantity = Quantity::try_new(request.quantity)?;
    if price.as_decimal() < config.min_price {
        return Err(ValidationError::InvalidPrice(format!(
            "price {price} below minimum increment {}",
            config.min_price
        ))
        .into());
    }
    if quantity.as_decimal() < config.min_quantity {
        return Err(ValidationError::InvalidQuantity(format!(
            "quantity {quantity} below minimum lot {}",
            config.min_quantity
        ))
        .into());
    }

    let account = accounts.get(&request.account_id).ok_or(AccountError::NotFound {
        account_id: request.account_id,
    })?;
    let mut owner = account.lock();

    let order = match request.side {
        Side::Buy => {
            // Reserve gross volume plus the buyer-side fee up front so a
            // later fill at or below this limit is always fundable.
            let required = config.fees.breakdown(price, quantity).total();
            owner.debit_usd(required)?;
            Order::new(
                request.account_id,
                request.symbol.clone(),
                Side::Buy,
                price,
                quantity,
                required,
                now,
            )
        }
        Side::Sell => {
            owner
                .holding_mut(&request.symbol)
                .reserve(quantity.as_decimal())?;
            Order::new(
                request.account_id,
                request.symbol.clone(),
                Side::Sell,
                price,
                quantity,
                Decimal::ZERO,
                now,
            )
        }
    };
    owner.touch(now);

    tracing::info!(
        order_id = %order.order_id,
        account_id = %order.account_id,
        symbol = %order.symbol,
        side = ?order.side,
        price = %order.price,
        quantity = %order.quantity,
        "order placed"
    );

    // Inserted while the owner is still held so the reservation and the open
    // order become visible together.
    Ok(orders.insert(order))
}

pub(crate) fn cancel(
    accounts: &AccountStore,
    orders: &OrderStore,
    owner_id: AccountId,
    order_id: OrderId,
    now: i64,
) -> Result<Order, ExchangeError> {
    let handle = orders
        .get(&order_id)
        .ok_or(OrderError::NotFound { order_id })?;
    let mut order = handle.lock();

    if order.account_id != owner_id {
        return Err(OrderError::Forbidden.into());
    }
    if !order.is_open() {
        return Err(OrderError::InvalidState {
            status: order.status,
        }
        .into());
    }

    let account = accounts
        .get(&owner_id)
        .ok_or(AccountError::NotFound {
            account_id: owner_id,
        })?;
    // Lock order: order record first, then the owning account.
    let mut owner = account.lock();

    match order.side {
        Side::Buy => owner.credit_usd(order.reserved_usd),
        Side::Sell => {
            let symbol = order.symbol.clone();
            owner
                .holding_mut(&symbol)
                .release(order.quantity.as_decimal())
                .map_err(|e| ExchangeError::Inconsistency {
                    detail: format!("cancel of order {order_id}: {e}"),
                })?;
        }
    }
    owner.touch(now);
    order.cancel(now);

    tracing::info!(order_id = %order_id, account_id = %owner_id, "order cancelled");
    Ok(order.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::account::Account;
    use types::ids::Symbol;

    const TS: i64 = 1_708_123_456_789_000_000;

    fn setup(balance: u64) -> (EngineConfig, AccountStore, OrderStore, AccountId) {
        let config = EngineConfig::default();
        let accounts = AccountStore::new();
        let orders = OrderStore::new();
        let account_id = accounts.insert(Account::new(Decimal::from(balance), TS));
        (config, accounts, orders, account_id)
    }

    fn buy_request(account_id: AccountId, price: u64, quantity: &str) -> PlaceOrderRequest {
        PlaceOrderRequest {
            account_id,
            symbol: Symbol::new("BTC"),
            side: Side::Buy,
            price: Decimal::from(price),
            quantity: Decimal::from_str_exact(quantity).unwrap(),
        }
    }

    #[test]
    fn test_place_buy_reserves_volume_plus_fee() {
        let (config, accounts, orders, account_id) = setup(10_000);
        let handle = place(&config, &accounts, &orders, &buy_request(account_id, 100, "1"), TS).unwrap();

        let order = handle.lock();
        assert!(order.is_open());
        assert_eq!(order.reserved_usd, Decimal::from_str_exact("101.5").unwrap());

        let account = accounts.get(&account_id).unwrap();
        assert_eq!(account.lock().balance, Decimal::from_str_exact("9898.5").unwrap());
    }

    #[test]
    fn test_place_buy_insufficient_funds_leaves_no_trace() {
        let (config, accounts, orders, account_id) = setup(100);
        let err = place(&config, &accounts, &orders, &buy_request(account_id, 100, "1"), TS).unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Account(AccountError::InsufficientFunds { .. })
        ));
        assert_eq!(accounts.get(&account_id).unwrap().lock().balance, Decimal::from(100));
        assert!(orders.open_orders(None).is_empty());
    }

    #[test]
    fn test_place_sell_moves_quantity_to_reserved() {
        let (config, accounts, orders, account_id) = setup(0);
        let btc = Symbol::new("BTC");
        accounts
            .get(&account_id)
            .unwrap()
            .lock()
            .holding_mut(&btc)
            .credit(Decimal::from(10));

        let request = PlaceOrderRequest {
            account_id,
            symbol: btc.clone(),
            side: Side::Sell,
            price: Decimal::from(100),
            quantity: Decimal::ONE,
        };
        let handle = place(&config, &accounts, &orders, &request, TS).unwrap();
        assert_eq!(handle.lock().reserved_usd, Decimal::ZERO);

        let account = accounts.get(&account_id).unwrap();
        let guard = account.lock();
        let holding = guard.holding(&btc).unwrap();
        assert_eq!(holding.available, Decimal::from(9));
        assert_eq!(holding.reserved, Decimal::ONE);
    }

    #[test]
    fn test_place_sell_without_assets_rejected() {
        let (config, accounts, orders, account_id) = setup(1_000);
        let request = PlaceOrderRequest {
            account_id,
            symbol: Symbol::new("BTC"),
            side: Side::Sell,
            price: Decimal::from(100),
            quantity: Decimal::ONE,
        };
        let err = place(&config, &accounts, &orders, &request, TS).unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Account(AccountError::InsufficientAsset { .. })
        ));
    }

    #[test]
    fn test_place_rejects_unsupported_symbol() {
        let (config, accounts, orders, account_id) = setup(1_000);
        let request = PlaceOrderRequest {
            account_id,
            symbol: Symbol::new("DOGE"),
            side: Side::Buy,
            price: Decimal::ONE,
            quantity: Decimal::ONE,
        };
        let err = place(&config, &accounts, &orders, &request, TS).unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Validation(ValidationError::UnsupportedSymbol { .. })
        ));
    }

    #[test]
    fn test_place_rejects_non_positive_price() {
        let (config, accounts, orders, account_id) = setup(1_000);
        let mut request = buy_request(account_id, 100, "1");
        request.price = Decimal::ZERO;
        let err = place(&config, &accounts, &orders, &request, TS).unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Validation(ValidationError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_cancel_buy_is_exact_inverse_of_place() {
        let (config, accounts, orders, account_id) = setup(10_000);
        let handle = place(&config, &accounts, &orders, &buy_request(account_id, 100, "1"), TS).unwrap();
        let order_id = handle.lock().order_id;

        let cancelled = cancel(&accounts, &orders, account_id, order_id, TS + 1).unwrap();
        assert_eq!(cancelled.status, types::order::OrderStatus::Cancelled);
        assert_eq!(cancelled.reserved_usd, Decimal::ZERO);
        assert_eq!(accounts.get(&account_id).unwrap().lock().balance, Decimal::from(10_000));
    }

    #[test]
    fn test_cancel_by_non_owner_forbidden() {
        let (config, accounts, orders, account_id) = setup(10_000);
        let stranger = accounts.insert(Account::new(Decimal::ZERO, TS));
        let handle = place(&config, &accounts, &orders, &buy_request(account_id, 100, "1"), TS).unwrap();
        let order_id = handle.lock().order_id;

        let err = cancel(&accounts, &orders, stranger, order_id, TS + 1).unwrap_err();
        assert!(matches!(err, ExchangeError::Order(OrderError::Forbidden)));
    }

    #[test]
    fn test_cancel_cancelled_order_invalid_state() {
        let (config, accounts, orders, account_id) = setup(10_000);
        let handle = place(&config, &accounts, &orders, &buy_request(account_id, 100, "1"), TS).unwrap();
        let order_id = handle.lock().order_id;

        cancel(&accounts, &orders, account_id, order_id, TS + 1).unwrap();
        let err = cancel(&accounts, &orders, account_id, order_id, TS + 2).unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Order(OrderError::InvalidState { .. })
        ));
    }
}
