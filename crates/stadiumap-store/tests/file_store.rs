//! `FileStore` against a real directory under the system temp dir.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use stadiumap_store::{
    current_identity, login, logout, toggle_visited, FileStore, Identity, KeyValueStore,
    StoreError, VisitedSet,
};

static NEXT_DIR: AtomicU32 = AtomicU32::new(0);

/// Fresh, not-yet-created directory unique to this process and test.
fn scratch_dir(label: &str) -> PathBuf {
    let n = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "stadiumap-store-{label}-{}-{n}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = scratch_dir("missing");
    let store = FileStore::in_dir(&dir);

    assert_eq!(store.get("anything").unwrap(), None);
    assert!(!store.path().exists());
}

#[test]
fn writes_create_directory_and_persist_across_instances() {
    let dir = scratch_dir("persist");
    {
        let store = FileStore::in_dir(&dir);
        store.set("alpha", "1").unwrap();
        store.set("beta", "2").unwrap();
        store.remove("alpha").unwrap();
    }

    let reopened = FileStore::in_dir(&dir);
    assert_eq!(reopened.get("alpha").unwrap(), None);
    assert_eq!(reopened.get("beta").unwrap().as_deref(), Some("2"));
    assert!(!dir.join("store.json.tmp").exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn corrupt_file_is_reported() {
    let dir = scratch_dir("corrupt");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("store.json"), "[1, 2, 3]").unwrap();

    let store = FileStore::in_dir(&dir);
    assert!(matches!(
        store.get("x"),
        Err(StoreError::Corrupt { .. })
    ));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn session_and_visited_survive_restart() {
    let dir = scratch_dir("session");
    {
        let store = FileStore::in_dir(&dir);
        let user = login(&store, "marta", "pw").unwrap();
        assert!(toggle_visited(&store, &user, "san-siro").unwrap());
        assert!(toggle_visited(&store, &Identity::Guest, "azteca").unwrap());
    }

    let store = FileStore::in_dir(&dir);
    let identity = current_identity(&store).unwrap();
    assert_eq!(identity, Identity::User("marta".into()));
    assert!(VisitedSet::load(&store, &identity).unwrap().contains("san-siro"));
    assert!(!VisitedSet::load(&store, &identity).unwrap().contains("azteca"));

    logout(&store).unwrap();
    assert_eq!(current_identity(&store).unwrap(), Identity::Guest);
    assert!(VisitedSet::load(&store, &Identity::Guest)
        .unwrap()
        .contains("azteca"));

    let _ = std::fs::remove_dir_all(&dir);
}
