use order_ledger::application::ledger::PaymentLedger;
use order_ledger::application::request::PaymentRequest;
use order_ledger::domain::ledger::OrderLedger;
use order_ledger::domain::money::Money;
use order_ledger::domain::payment::PaymentMethod;
use order_ledger::domain::ports::{OrderPersistenceWriterBox, OrderSnapshotProviderBox};
use order_ledger::domain::status::PaymentStatus;
use order_ledger::infrastructure::in_memory::InMemoryOrderStore;
use rust_decimal_macros::dec;
use std::sync::Arc;

#[tokio::test]
async fn test_stores_as_trait_objects() {
    let store = InMemoryOrderStore::new();
    let snapshots: OrderSnapshotProviderBox = Box::new(store.clone());
    let writer: OrderPersistenceWriterBox = Box::new(store);

    let ledger = OrderLedger::new(1, Money::new(dec!(100.0)), None);

    // Verify Send + Sync by spawning tasks
    let write_handle = tokio::spawn(async move {
        writer.create(ledger).await.unwrap();
    });
    write_handle.await.unwrap();

    let read_handle = tokio::spawn(async move { snapshots.get(1).await.unwrap().unwrap() });
    let retrieved = read_handle.await.unwrap();
    assert_eq!(retrieved.order_id, 1);
    assert_eq!(retrieved.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn test_independent_orders_in_parallel() {
    let store = InMemoryOrderStore::new();
    let ledger = Arc::new(PaymentLedger::new(Box::new(store.clone()), Box::new(store)));

    for order in 1..=10u64 {
        ledger
            .open_order(order, Money::new(dec!(50.00)), None)
            .await
            .unwrap();
    }

    let mut handles = Vec::new();
    for order in 1..=10u64 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..5 {
                ledger
                    .record_payment(order, PaymentRequest::new(dec!(10.00), PaymentMethod::Cash))
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let ledgers = ledger.list_ledgers().await.unwrap();
    assert_eq!(ledgers.len(), 10);
    for (i, snapshot) in ledgers.iter().enumerate() {
        assert_eq!(snapshot.order_id, i as u64 + 1);
        assert_eq!(snapshot.total_paid, Money::new(dec!(50.00)));
        assert_eq!(snapshot.payment_status, PaymentStatus::Completed);
        let ids: Vec<u32> = snapshot.payment_history.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
