mod common;

use std::sync::Arc;

use cardbinder::config::ReleasePolicy;

use common::harness;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_acquires_on_same_collection_commute() {
    let h = harness(ReleasePolicy::Strict);
    let service = Arc::clone(&h.service);

    let a = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.acquire("c1", "pikachu-025", 2, None).await })
    };
    let b = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.acquire("c1", "pikachu-025", 3, None).await })
    };

    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    // Regardless of arrival order, the serialized total is 5
    let collection = service.get_collection("c1").await.unwrap().unwrap();
    assert_eq!(collection.entry("pikachu-025").unwrap().quantity, 5);
    assert_eq!(collection.cards_count, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn many_concurrent_mutations_preserve_the_count_invariant() {
    let h = harness(ReleasePolicy::Clamp);
    let service = Arc::clone(&h.service);

    let mut tasks = Vec::new();
    for i in 0..20u32 {
        let service = Arc::clone(&service);
        tasks.push(tokio::spawn(async move {
            let card = if i % 2 == 0 { "pikachu-025" } else { "charmander-004" };
            service.acquire("c1", card, 1, None).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let collection = service.get_collection("c1").await.unwrap().unwrap();
    let sum: u32 = collection.entries.values().map(|e| e.quantity).sum();
    assert_eq!(collection.cards_count, sum);
    assert_eq!(sum, 20);
    assert_eq!(collection.entry("pikachu-025").unwrap().quantity, 10);
    assert_eq!(collection.entry("charmander-004").unwrap().quantity, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_collections_proceed_independently() {
    let h = harness(ReleasePolicy::Strict);
    let service = Arc::clone(&h.service);

    let mut tasks = Vec::new();
    for i in 0..8u32 {
        let service = Arc::clone(&service);
        tasks.push(tokio::spawn(async move {
            let collection_id = format!("c{}", i);
            service.acquire(&collection_id, "pikachu-025", i + 1, None).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    for i in 0..8u32 {
        let collection = service
            .get_collection(&format!("c{}", i))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(collection.cards_count, i + 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_replays_of_one_token_apply_once() {
    let h = harness(ReleasePolicy::Strict);
    let service = Arc::clone(&h.service);

    let mut tasks = Vec::new();
    for _ in 0..5 {
        let service = Arc::clone(&service);
        tasks.push(tokio::spawn(async move {
            service.acquire("c1", "pikachu-025", 1, Some("retry-burst")).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let collection = service.get_collection("c1").await.unwrap().unwrap();
    assert_eq!(collection.cards_count, 1);
}
