//! Integration tests for the subscriber registry backends.

use std::collections::BTreeSet;

use resale_watch::{
    config::RegistryConfig,
    models::Subscriber,
    persistence::{FileSubscriberRegistry, PersistenceError, SubscriberRegistry, open_registry},
};

#[tokio::test]
async fn test_file_registry_round_trip_including_empty_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chat_ids.txt");
    let registry = FileSubscriberRegistry::new(&path);

    registry.save(&[]).await.unwrap();
    assert!(path.exists());
    assert!(registry.load().await.unwrap().is_empty());

    let subscribers = vec![Subscriber::registered_now("77"), Subscriber::registered_now("42")];
    registry.save(&subscribers).await.unwrap();

    let reopened = FileSubscriberRegistry::new(&path);
    let loaded = reopened.load().await.unwrap();
    let ids: Vec<_> = loaded.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["42", "77"]);
    assert!(loaded.iter().all(|s| s.registered_at.is_some()));
}

#[tokio::test]
async fn test_file_registry_reads_bare_id_lists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chat_ids.txt");
    tokio::fs::write(&path, "123456\n\n987654\n123456\n").await.unwrap();

    let registry = FileSubscriberRegistry::new(&path);
    assert_eq!(
        registry.list().await.unwrap(),
        BTreeSet::from(["123456".to_string(), "987654".to_string()])
    );
    assert!(registry.remove("123456").await.unwrap());

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(content, "987654\n");
}

#[tokio::test]
async fn test_sqlite_registry_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let database_url = format!("sqlite://{}", dir.path().join("subscribers.db").display());
    let config = RegistryConfig::Sqlite { database_url };

    let registry = open_registry(&config).await.unwrap();
    assert!(registry.add("42").await.unwrap());
    assert!(registry.add("77").await.unwrap());
    assert!(registry.remove("77").await.unwrap());
    drop(registry);

    let reopened = open_registry(&config).await.unwrap();
    assert_eq!(reopened.list().await.unwrap(), BTreeSet::from(["42".to_string()]));
    assert!(reopened.contains("42").await.unwrap());
    assert!(!reopened.add("42").await.unwrap());
}

#[tokio::test]
async fn test_open_registry_defaults_to_file_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ids.txt");
    let registry = open_registry(&RegistryConfig::File { path: path.clone() }).await.unwrap();

    assert!(registry.list().await.unwrap().is_empty());
    registry.add("5").await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn test_file_registry_save_rejects_ids_that_would_not_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chat_ids.txt");
    let registry = FileSubscriberRegistry::new(&path);
    registry.save(&[Subscriber::registered_now("42")]).await.unwrap();

    for bad in ["a\tb", "a\nb", " 5", "7 ", ""] {
        let subscribers = [Subscriber::registered_now("1"), Subscriber::registered_now(bad)];
        let result = registry.save(&subscribers).await;
        assert!(
            matches!(result, Err(PersistenceError::InvalidInput(_))),
            "id {bad:?} should be rejected"
        );
    }

    let ids: Vec<_> = registry.load().await.unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["42".to_string()]);
}
