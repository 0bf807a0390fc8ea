//! End-to-end engine tests against an in-memory SQLite database.
//!
//! Exercises the order lifecycle and payment reconciliation engines
//! together and checks the bookkeeping invariants: the order payment
//! status mirrors its debt, and the customer's cached totals track the
//! underlying rows.

use cantina_server::db::DbService;
use cantina_server::db::repository::{customer, debt, order};
use cantina_server::services::Notifier;
use cantina_server::utils::AppError;
use cantina_server::{orders, payments};
use shared::Money;
use shared::models::{
    CartItemInput, Customer, OrderCreate, OrderStatus, PaymentMethod, PaymentStatus,
};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Single-connection pool so every query sees the same :memory: database
async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    DbService::migrate(&pool).await.expect("migrations");
    pool
}

async fn test_customer(pool: &SqlitePool) -> Customer {
    customer::insert(pool, "Maria Silva", "11987654321")
        .await
        .expect("customer insert")
}

fn item(name: &str, price: &str, quantity: i64) -> CartItemInput {
    CartItemInput {
        product_id: 1,
        product_name: name.to_string(),
        unit_price: price.parse().expect("price"),
        quantity,
        flavor: None,
    }
}

/// Two coxinhas at 3.50 plus a juice at 4.00: total 11.00
fn cart(customer_id: i64, method: PaymentMethod) -> OrderCreate {
    OrderCreate {
        customer_id,
        items: vec![item("Coxinha", "3.50", 2), item("Suco de Laranja", "4.00", 1)],
        total_amount: None,
        payment_method: method,
        is_walk_in: false,
        notes: None,
    }
}

fn money(s: &str) -> Money {
    s.parse().expect("money literal")
}

#[tokio::test]
async fn pay_later_order_creates_debt() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    let detail = orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::PayLater))
        .await
        .unwrap();

    assert_eq!(detail.order.total_amount, money("11.00"));
    assert_eq!(detail.order.order_number, 1);
    assert_eq!(detail.order.payment_status, PaymentStatus::Pending);
    assert_eq!(detail.order.order_status, OrderStatus::AwaitingPayment);
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.items[0].subtotal, money("7.00"));

    let d = debt::find_by_order(&pool, detail.order.id)
        .await
        .unwrap()
        .expect("debt row");
    assert!(!d.is_paid);
    assert_eq!(d.amount, money("11.00"));

    let cust = customer::find_by_id(&pool, cust.id).await.unwrap().unwrap();
    assert_eq!(cust.total_debt, money("11.00"));
    assert_eq!(cust.total_spent, Money::ZERO);
}

#[tokio::test]
async fn cash_order_has_no_debt() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    let detail = orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::Cash))
        .await
        .unwrap();

    assert!(
        debt::find_by_order(&pool, detail.order.id)
            .await
            .unwrap()
            .is_none()
    );
    let cust = customer::find_by_id(&pool, cust.id).await.unwrap().unwrap();
    assert_eq!(cust.total_debt, Money::ZERO);
}

#[tokio::test]
async fn large_carts_keep_every_item_in_order() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    // All 50 item ids are minted within a couple of milliseconds; every
    // row must insert and come back in cart order.
    let req = OrderCreate {
        customer_id: cust.id,
        items: (0..50).map(|i| item(&format!("Item {i:02}"), "1.00", 1)).collect(),
        total_amount: None,
        payment_method: PaymentMethod::Cash,
        is_walk_in: false,
        notes: None,
    };
    let detail = orders::create_order(&pool, &notifier, req).await.unwrap();
    assert_eq!(detail.order.total_amount, money("50.00"));
    assert_eq!(detail.items.len(), 50);

    let stored = order::find_items(&pool, detail.order.id).await.unwrap();
    assert_eq!(stored.len(), 50);
    for (i, stored_item) in stored.iter().enumerate() {
        assert_eq!(stored_item.position, i as i64);
        assert_eq!(stored_item.product_name, format!("Item {i:02}"));
    }
}

#[tokio::test]
async fn client_total_echo_is_ignored() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    let mut req = cart(cust.id, PaymentMethod::Cash);
    req.total_amount = Some(money("1.00"));
    let detail = orders::create_order(&pool, &notifier, req).await.unwrap();

    assert_eq!(detail.order.total_amount, money("11.00"));
}

#[tokio::test]
async fn create_rejects_unknown_customer_and_empty_cart() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    let err = orders::create_order(&pool, &notifier, cart(999, PaymentMethod::Cash))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let mut req = cart(cust.id, PaymentMethod::Cash);
    req.items.clear();
    let err = orders::create_order(&pool, &notifier, req).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn order_numbers_increment_within_a_day() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    for expected in 1..=3 {
        let detail = orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::Cash))
            .await
            .unwrap();
        assert_eq!(detail.order.order_number, expected);
    }
}

#[tokio::test]
async fn settling_a_debt_updates_all_mirrors() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    let detail = orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::PayLater))
        .await
        .unwrap();
    let d = debt::find_by_order(&pool, detail.order.id)
        .await
        .unwrap()
        .unwrap();

    let settled = payments::mark_debt_as_paid(&pool, &notifier, d.id)
        .await
        .unwrap();
    assert!(settled.is_paid);
    assert!(settled.paid_at.is_some());

    let ord = order::find_by_id(&pool, detail.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ord.payment_status, PaymentStatus::Paid);

    let cust = customer::find_by_id(&pool, cust.id).await.unwrap().unwrap();
    assert_eq!(cust.total_debt, Money::ZERO);
    assert_eq!(cust.total_spent, money("11.00"));
}

#[tokio::test]
async fn settling_a_debt_twice_moves_totals_once() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    let detail = orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::PayLater))
        .await
        .unwrap();
    let d = debt::find_by_order(&pool, detail.order.id)
        .await
        .unwrap()
        .unwrap();

    payments::mark_debt_as_paid(&pool, &notifier, d.id)
        .await
        .unwrap();
    let again = payments::mark_debt_as_paid(&pool, &notifier, d.id)
        .await
        .unwrap();
    assert!(again.is_paid);

    let cust = customer::find_by_id(&pool, cust.id).await.unwrap().unwrap();
    assert_eq!(cust.total_debt, Money::ZERO);
    assert_eq!(cust.total_spent, money("11.00"));
}

#[tokio::test]
async fn payment_update_and_debt_settlement_converge() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    let detail = orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::PayLater))
        .await
        .unwrap();

    // Entry point one: the generic payment update also settles the debt.
    payments::update_payment_status(&pool, &notifier, detail.order.id, PaymentStatus::Paid)
        .await
        .unwrap();
    let d = debt::find_by_order(&pool, detail.order.id)
        .await
        .unwrap()
        .unwrap();
    assert!(d.is_paid);

    // Entry point two afterwards is a no-op.
    payments::mark_debt_as_paid(&pool, &notifier, d.id)
        .await
        .unwrap();

    let cust = customer::find_by_id(&pool, cust.id).await.unwrap().unwrap();
    assert_eq!(cust.total_debt, Money::ZERO);
    assert_eq!(cust.total_spent, money("11.00"));
}

#[tokio::test]
async fn same_payment_status_does_not_double_credit() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    let detail = orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::Cash))
        .await
        .unwrap();

    payments::update_payment_status(&pool, &notifier, detail.order.id, PaymentStatus::Paid)
        .await
        .unwrap();
    payments::update_payment_status(&pool, &notifier, detail.order.id, PaymentStatus::Paid)
        .await
        .unwrap();

    let cust = customer::find_by_id(&pool, cust.id).await.unwrap().unwrap();
    assert_eq!(cust.total_spent, money("11.00"));
}

#[tokio::test]
async fn reverting_paid_to_pending_restores_the_debt() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    let detail = orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::PayLater))
        .await
        .unwrap();
    payments::update_payment_status(&pool, &notifier, detail.order.id, PaymentStatus::Paid)
        .await
        .unwrap();
    payments::update_payment_status(&pool, &notifier, detail.order.id, PaymentStatus::Pending)
        .await
        .unwrap();

    let d = debt::find_by_order(&pool, detail.order.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!d.is_paid);
    assert!(d.paid_at.is_none());

    let cust = customer::find_by_id(&pool, cust.id).await.unwrap().unwrap();
    assert_eq!(cust.total_debt, money("11.00"));
    assert_eq!(cust.total_spent, Money::ZERO);
}

#[tokio::test]
async fn payment_update_rejects_cancelled_target() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    let detail = orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::Cash))
        .await
        .unwrap();
    let err =
        payments::update_payment_status(&pool, &notifier, detail.order.id, PaymentStatus::Cancelled)
            .await
            .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[tokio::test]
async fn cancelling_removes_the_unpaid_debt() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    let detail = orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::PayLater))
        .await
        .unwrap();
    let cancelled = orders::cancel_order(&pool, &notifier, detail.order.id)
        .await
        .unwrap()
        .expect("order exists");

    assert_eq!(cancelled.order_status, OrderStatus::Cancelled);
    assert_eq!(cancelled.payment_status, PaymentStatus::Cancelled);
    assert!(
        debt::find_by_order(&pool, detail.order.id)
            .await
            .unwrap()
            .is_none()
    );

    let cust = customer::find_by_id(&pool, cust.id).await.unwrap().unwrap();
    assert_eq!(cust.total_debt, Money::ZERO);
}

#[tokio::test]
async fn cancelling_preserves_a_settled_debt() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    let detail = orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::PayLater))
        .await
        .unwrap();
    let d = debt::find_by_order(&pool, detail.order.id)
        .await
        .unwrap()
        .unwrap();
    payments::mark_debt_as_paid(&pool, &notifier, d.id)
        .await
        .unwrap();

    let cancelled = orders::cancel_order(&pool, &notifier, detail.order.id)
        .await
        .unwrap()
        .unwrap();

    // Financial history stays: the paid debt and the paid marker survive.
    assert_eq!(cancelled.order_status, OrderStatus::Cancelled);
    assert_eq!(cancelled.payment_status, PaymentStatus::Paid);
    let d = debt::find_by_order(&pool, detail.order.id)
        .await
        .unwrap()
        .unwrap();
    assert!(d.is_paid);

    let cust = customer::find_by_id(&pool, cust.id).await.unwrap().unwrap();
    assert_eq!(cust.total_spent, money("11.00"));
}

#[tokio::test]
async fn cancelling_a_missing_order_is_a_noop() {
    let pool = test_pool().await;
    let notifier = Notifier::default();

    let result = orders::cancel_order(&pool, &notifier, 424242).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn cancelling_twice_adjusts_debt_once() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    // Second pay-later order keeps the customer's debt non-zero.
    orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::PayLater))
        .await
        .unwrap();
    let detail = orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::PayLater))
        .await
        .unwrap();

    orders::cancel_order(&pool, &notifier, detail.order.id)
        .await
        .unwrap();
    orders::cancel_order(&pool, &notifier, detail.order.id)
        .await
        .unwrap();

    let cust = customer::find_by_id(&pool, cust.id).await.unwrap().unwrap();
    assert_eq!(cust.total_debt, money("11.00"));
}

#[tokio::test]
async fn order_status_moves_forward_only() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    let detail = orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::Cash))
        .await
        .unwrap();
    let id = detail.order.id;

    let ord = orders::update_order_status(&pool, &notifier, id, OrderStatus::Ready)
        .await
        .unwrap();
    assert_eq!(ord.order_status, OrderStatus::Ready);

    let err = orders::update_order_status(&pool, &notifier, id, OrderStatus::Preparing)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    // Same status is accepted and changes nothing.
    let ord = orders::update_order_status(&pool, &notifier, id, OrderStatus::Ready)
        .await
        .unwrap();
    assert_eq!(ord.order_status, OrderStatus::Ready);

    let err = orders::update_order_status(&pool, &notifier, id, OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    orders::cancel_order(&pool, &notifier, id).await.unwrap();
    let err = orders::update_order_status(&pool, &notifier, id, OrderStatus::Delivered)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[tokio::test]
async fn recalculate_repairs_a_drifted_total() {
    let pool = test_pool().await;
    let notifier = Notifier::default();
    let cust = test_customer(&pool).await;

    orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::PayLater))
        .await
        .unwrap();
    orders::create_order(&pool, &notifier, cart(cust.id, PaymentMethod::PayLater))
        .await
        .unwrap();

    // Induce drift in the cached column.
    customer::set_total_debt(&pool, cust.id, money("999.99"))
        .await
        .unwrap();

    let total = payments::recalculate_customer_debt(&pool, cust.id)
        .await
        .unwrap();
    assert_eq!(total, money("22.00"));

    let cust = customer::find_by_id(&pool, cust.id).await.unwrap().unwrap();
    assert_eq!(cust.total_debt, money("22.00"));
}

#[tokio::test]
async fn identify_by_phone_is_stable_across_formats() {
    let pool = test_pool().await;

    let phone = shared::util::normalize_phone("(11) 98765-4321");
    assert_eq!(phone, "11987654321");

    let created = customer::insert(&pool, "Maria Silva", &phone).await.unwrap();
    let found = customer::find_by_phone(&pool, &shared::util::normalize_phone("11 98765 4321"))
        .await
        .unwrap()
        .expect("lookup after normalization");
    assert_eq!(found.id, created.id);

    // The phone column is unique; a second insert for the same number fails.
    let err = customer::insert(&pool, "Other Maria", &phone).await.unwrap_err();
    assert!(matches!(
        err,
        cantina_server::db::repository::RepoError::Duplicate(_)
    ));
}
