use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::events::domain::CreateEventInput;
use service::events::EventService;
use service::store::memory::MemoryStore;

fn bench_vote(c: &mut Criterion) {
    let store = Arc::new(MemoryStore::default());
    let svc = EventService::new(store);

    // pre-create the event outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    let event = rt
        .block_on(svc.create(CreateEventInput {
            title: "bench".into(),
            description: "bench".into(),
            location: "bench".into(),
            ..Default::default()
        }))
        .unwrap();

    // each iteration votes as a fresh user, so the happy path is measured
    c.bench_function("event_vote_happy_path", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.vote(&event.id, uuid::Uuid::new_v4())).unwrap();
        });
    });
}

criterion_group!(benches, bench_vote);
criterion_main!(benches);
