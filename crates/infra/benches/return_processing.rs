use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use std::sync::Arc;

use chrono::Utc;
use vendora_auth::{ActorToken, Role, StaticTokenResolver, User};
use vendora_core::{ExpectedVersion, Money, OrderId, OrderItemId, ReturnOrderId, UserId};
use vendora_infra::services::{ProcessReturnRequest, ReturnProcessor, TransactionLedger};
use vendora_infra::store::{record_type, InMemoryStateStore, RecordWrite, StateStore};
use vendora_returns::{ReturnOrder, ReturnOrderItem};

fn setup() -> (
    Arc<InMemoryStateStore>,
    Arc<StaticTokenResolver>,
    ReturnProcessor<
        Arc<InMemoryStateStore>,
        Arc<StaticTokenResolver>,
        TransactionLedger<Arc<InMemoryStateStore>, Arc<StaticTokenResolver>>,
    >,
) {
    let store = Arc::new(InMemoryStateStore::new());
    let resolver = Arc::new(StaticTokenResolver::new());
    let ledger = TransactionLedger::new(store.clone(), resolver.clone());
    let processor = ReturnProcessor::new(store.clone(), resolver.clone(), ledger);
    (store, resolver, processor)
}

fn seed_user(
    store: &InMemoryStateStore,
    resolver: &StaticTokenResolver,
    role: Role,
    token: &str,
) -> UserId {
    let id = UserId::new();
    let user = User::new(id, "bench user", role);
    store
        .commit(vec![RecordWrite::from_typed(
            record_type::USER,
            *id.as_uuid(),
            ExpectedVersion::Exact(0),
            &user,
        )
        .unwrap()])
        .unwrap();
    resolver.grant(ActorToken::new(token), id);
    id
}

fn seed_claim(store: &InMemoryStateStore, requested_by: UserId, item_count: usize) -> ReturnOrderId {
    let items = (0..item_count)
        .map(|_| ReturnOrderItem::new(OrderItemId::new(), 1, Money::from_minor(100), "damaged"))
        .collect();
    let claim = ReturnOrder::new(
        ReturnOrderId::new(),
        OrderId::new(),
        requested_by,
        Money::from_minor(100 * item_count as i64),
        items,
        Utc::now(),
    );
    store
        .commit(vec![RecordWrite::from_typed(
            record_type::RETURN_ORDER,
            *claim.id_typed().as_uuid(),
            ExpectedVersion::Exact(0),
            &claim,
        )
        .unwrap()])
        .unwrap();
    claim.id_typed()
}

fn bench_return_decision_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("return_decision_latency");
    group.sample_size(1000);

    // Approval: claim write + user balance write + transaction insert.
    group.bench_function("approve", |b| {
        let (store, resolver, processor) = setup();
        seed_user(&store, &resolver, Role::Admin, "admin-token");
        let customer = seed_user(&store, &resolver, Role::Customer, "customer-token");
        let token = ActorToken::new("admin-token");

        b.iter(|| {
            let claim_id = seed_claim(&store, customer, 1);
            processor
                .process_return_request(
                    &token,
                    ProcessReturnRequest {
                        return_order_id: black_box(claim_id),
                        approve: true,
                        reason: "bench".to_string(),
                    },
                    Utc::now(),
                )
                .unwrap();
        });
    });

    // Rejection: claim write only, no money movement.
    group.bench_function("reject", |b| {
        let (store, resolver, processor) = setup();
        seed_user(&store, &resolver, Role::Admin, "admin-token");
        let customer = seed_user(&store, &resolver, Role::Customer, "customer-token");
        let token = ActorToken::new("admin-token");

        b.iter(|| {
            let claim_id = seed_claim(&store, customer, 1);
            processor
                .process_return_request(
                    &token,
                    ProcessReturnRequest {
                        return_order_id: black_box(claim_id),
                        approve: false,
                        reason: "bench".to_string(),
                    },
                    Utc::now(),
                )
                .unwrap();
        });
    });

    group.finish();
}

fn bench_item_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("item_cascade");

    for item_count in [1, 10, 100].iter() {
        group.throughput(Throughput::Elements(*item_count as u64));
        group.bench_with_input(
            BenchmarkId::new("approve_with_items", item_count),
            item_count,
            |b, &count| {
                let (store, resolver, processor) = setup();
                seed_user(&store, &resolver, Role::Admin, "admin-token");
                let customer = seed_user(&store, &resolver, Role::Customer, "customer-token");
                let token = ActorToken::new("admin-token");

                b.iter(|| {
                    let claim_id = seed_claim(&store, customer, count);
                    processor
                        .process_return_request(
                            &token,
                            ProcessReturnRequest {
                                return_order_id: claim_id,
                                approve: true,
                                reason: "bench".to_string(),
                            },
                            Utc::now(),
                        )
                        .unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_commit_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit_throughput");

    for batch_size in [1, 10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));
        group.bench_with_input(
            BenchmarkId::new("batch_insert", batch_size),
            batch_size,
            |b, &size| {
                let store = InMemoryStateStore::new();

                b.iter(|| {
                    let writes: Vec<RecordWrite> = (0..size)
                        .map(|_| {
                            let id = UserId::new();
                            let user = User::new(id, "bench user", Role::Customer);
                            RecordWrite::from_typed(
                                record_type::USER,
                                *id.as_uuid(),
                                ExpectedVersion::Exact(0),
                                &user,
                            )
                            .unwrap()
                        })
                        .collect();

                    black_box(store.commit(writes).unwrap());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_return_decision_latency,
    bench_item_cascade,
    bench_commit_throughput
);
criterion_main!(benches);
