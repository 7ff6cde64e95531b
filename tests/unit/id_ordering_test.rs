//! Property tests for record id ordering and store contract

use proptest::prelude::*;
use uuid::Uuid;

use webhook_inspector::models::NewWebhook;
use webhook_inspector::store::{IdGenerator, InMemoryWebhookStore, WebhookStore};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn ids_strictly_increase(count in 1usize..500) {
        let ids = IdGenerator::new();
        let generated: Vec<Uuid> = (0..count).map(|_| ids.next_id()).collect();

        for pair in generated.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        prop_assert!(generated.iter().all(|id| id.get_version_num() == 7));
    }

    #[test]
    fn insert_then_get_preserves_fields(
        method in "[A-Z]{1,10}",
        path in "/[a-z0-9/]{0,40}",
        header_value in "[ -~]{0,32}",
        body in proptest::option::of("\\PC{0,64}"),
    ) {
        runtime().block_on(async {
            let store = InMemoryWebhookStore::new();
            let mut new = NewWebhook::new(method.clone(), path.clone(), "10.0.0.1")
                .with_header("x-value", header_value.clone());
            new.body = body.clone();

            let before = chrono::Utc::now();
            let inserted = store.insert(new).await.unwrap();
            let fetched = store.get_by_id(inserted.id).await.unwrap().unwrap();

            prop_assert!(!fetched.id.is_nil());
            prop_assert!(fetched.created_at >= before);
            prop_assert_eq!(&fetched.method, &method);
            prop_assert_eq!(&fetched.path, &path);
            prop_assert_eq!(&fetched.headers["x-value"], &header_value);
            prop_assert_eq!(&fetched.body, &body);
            prop_assert_eq!(fetched.status_code, 200);
            Ok(())
        })?;
    }

    #[test]
    fn listing_pages_never_overlap(count in 1usize..40, page_size in 1u32..10) {
        runtime().block_on(async {
            let store = InMemoryWebhookStore::new();
            let mut inserted = Vec::new();
            for i in 0..count {
                let record = store
                    .insert(NewWebhook::new("POST", format!("/{}", i), "10.0.0.1"))
                    .await
                    .unwrap();
                inserted.push(record.id);
            }

            let mut seen = Vec::new();
            let mut cursor = None;
            loop {
                let page = store.list(cursor, page_size).await.unwrap();
                if page.is_empty() {
                    break;
                }
                cursor = page.last().map(|w| w.id);
                seen.extend(page.into_iter().map(|w| w.id));
            }

            inserted.reverse();
            prop_assert_eq!(seen, inserted);
            Ok(())
        })?;
    }
}
