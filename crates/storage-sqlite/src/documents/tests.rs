use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

use sitekit_core::documents::{Document, DocumentStoreTrait, Filter};
use sitekit_core::errors::{DatabaseError, Error};
use sitekit_core::records::PageRequest;
use sitekit_core::users::{NewUser, UserRepository, UserRepositoryTrait, UserUpdate, USERS_COLLECTION};

use super::DocumentDatabase;

fn open_database(name: &str) -> (DocumentDatabase, TempDir) {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("site.db");
    let database = DocumentDatabase::initialize(&db_path.to_string_lossy(), name)
        .expect("Failed to open database");
    (database, temp_dir)
}

fn doc(value: Value) -> Document {
    value.as_object().cloned().expect("object literal")
}

#[tokio::test]
async fn test_insert_assigns_identity_and_ignores_input_id() {
    let (database, _dir) = open_database("site");
    let users = database.collection("users");

    let id = users
        .insert_one(doc(json!({"_id": "mine", "email": "a@b.com"})))
        .await
        .unwrap();
    assert_ne!(id, "mine");

    let found = users.find_one(&Filter::by_id(&id)).await.unwrap().unwrap();
    assert_eq!(found["_id"], Value::String(id.clone()));
    assert_eq!(found["email"], "a@b.com");
    assert!(users
        .find_one(&Filter::by_id("mine"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_equality_filters_on_fields() {
    let (database, _dir) = open_database("site");
    let items = database.collection("items");
    items
        .insert_one(doc(json!({"name": "a", "rank": 1, "active": true})))
        .await
        .unwrap();
    items
        .insert_one(doc(json!({"name": "b", "rank": 2, "active": false, "note": null})))
        .await
        .unwrap();
    items
        .insert_one(doc(json!({"name": "c", "rank": 2, "active": true, "note": "x"})))
        .await
        .unwrap();

    let by_name = items.find_one(&Filter::eq("name", "b")).await.unwrap().unwrap();
    assert_eq!(by_name["rank"], 2);

    assert_eq!(items.count(&Filter::eq("rank", 2)).await.unwrap(), 2);
    assert_eq!(
        items
            .count(&Filter::eq("rank", 2).and_eq("active", true))
            .await
            .unwrap(),
        1
    );
    // Null matches both an explicit null and a missing field.
    assert_eq!(items.count(&Filter::eq("note", Value::Null)).await.unwrap(), 2);
    assert_eq!(items.count(&Filter::eq("name", "zzz")).await.unwrap(), 0);
}

#[tokio::test]
async fn test_equality_filters_distinguish_json_types() {
    let (database, _dir) = open_database("site");
    let items = database.collection("items");
    items
        .insert_one(doc(json!({"name": "flagged", "flag": true})))
        .await
        .unwrap();
    items
        .insert_one(doc(json!({"name": "numbered", "flag": 1})))
        .await
        .unwrap();
    items
        .insert_one(doc(json!({"name": "texted", "flag": "1"})))
        .await
        .unwrap();

    let by_bool = items.find(&Filter::eq("flag", true), 0, 10).await.unwrap();
    assert_eq!(by_bool.len(), 1);
    assert_eq!(by_bool[0]["name"], "flagged");

    let by_int = items.find(&Filter::eq("flag", 1), 0, 10).await.unwrap();
    assert_eq!(by_int.len(), 1);
    assert_eq!(by_int[0]["name"], "numbered");

    assert_eq!(items.count(&Filter::eq("flag", "1")).await.unwrap(), 1);
    assert_eq!(items.count(&Filter::eq("flag", false)).await.unwrap(), 0);
}

#[tokio::test]
async fn test_find_windows_in_insertion_order() {
    let (database, _dir) = open_database("site");
    let items = database.collection("items");
    for n in 0..5 {
        items.insert_one(doc(json!({ "n": n }))).await.unwrap();
    }

    let window = items.find(&Filter::all(), 1, 2).await.unwrap();
    let ns: Vec<i64> = window.iter().map(|d| d["n"].as_i64().unwrap()).collect();
    assert_eq!(ns, vec![1, 2]);

    assert_eq!(items.find(&Filter::all(), 3, 0).await.unwrap().len(), 2);
    assert_eq!(items.find(&Filter::all(), -4, 0).await.unwrap().len(), 5);
    assert!(items.find(&Filter::all(), 10, 2).await.unwrap().is_empty());
    assert_eq!(items.count(&Filter::all()).await.unwrap(), 5);
}

#[tokio::test]
async fn test_collections_and_databases_are_isolated() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("shared.db");
    let path = db_path.to_string_lossy();
    let site = DocumentDatabase::initialize(&path, "site").unwrap();
    let staging = DocumentDatabase::initialize(&path, "staging").unwrap();

    site.collection("users")
        .insert_one(doc(json!({"email": "a@b.com"})))
        .await
        .unwrap();

    assert_eq!(site.collection("users").count(&Filter::all()).await.unwrap(), 1);
    assert_eq!(site.collection("posts").count(&Filter::all()).await.unwrap(), 0);
    assert_eq!(
        staging.collection("users").count(&Filter::all()).await.unwrap(),
        0
    );
    assert_eq!(site.collection("users").namespace(), "site.users");
}

#[tokio::test]
async fn test_find_one_and_update_returns_post_image() {
    let (database, _dir) = open_database("site");
    let users = database.collection("users");
    let id = users
        .insert_one(doc(json!({"email": "a@b.com", "externalId": ""})))
        .await
        .unwrap();

    let updated = users
        .find_one_and_update(
            &Filter::by_id(&id),
            doc(json!({"externalId": "ext-1", "_id": "other"})),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated["_id"], Value::String(id.clone()));
    assert_eq!(updated["externalId"], "ext-1");
    assert_eq!(updated["email"], "a@b.com");

    let stored = users.find_one(&Filter::by_id(&id)).await.unwrap().unwrap();
    assert_eq!(stored, updated);

    assert!(users
        .find_one_and_update(&Filter::by_id("missing"), doc(json!({"x": 1})))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_delete_one_removes_first_match_only() {
    let (database, _dir) = open_database("site");
    let items = database.collection("items");
    items.insert_one(doc(json!({"k": "dup", "n": 1}))).await.unwrap();
    items.insert_one(doc(json!({"k": "dup", "n": 2}))).await.unwrap();

    assert_eq!(items.delete_one(&Filter::eq("k", "dup")).await.unwrap(), 1);
    let left = items.find(&Filter::all(), 0, 0).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0]["n"], 2);

    assert_eq!(items.delete_one(&Filter::by_id("missing")).await.unwrap(), 0);
}

#[tokio::test]
async fn test_shutdown_is_idempotent_and_closes_collections() {
    let (database, _dir) = open_database("site");
    let users = database.collection("users");
    users.insert_one(doc(json!({"email": "a@b.com"}))).await.unwrap();

    database.shutdown();
    database.shutdown();
    assert!(database.is_closed());

    let err = users.count(&Filter::all()).await.unwrap_err();
    assert!(matches!(err, Error::Database(DatabaseError::Closed)));
    let err = users
        .insert_one(doc(json!({"email": "c@d.com"})))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Database(DatabaseError::Closed)));
}

#[tokio::test]
async fn test_documents_survive_reopen() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("nested").join("site.db");
    let path = format!("sqlite://{}", db_path.to_string_lossy());

    let first = DocumentDatabase::initialize(&path, "site").unwrap();
    first
        .collection("users")
        .insert_one(doc(json!({"email": "a@b.com"})))
        .await
        .unwrap();
    first.shutdown();

    let second = DocumentDatabase::initialize(&path, "site").unwrap();
    assert_eq!(
        second.collection("users").count(&Filter::all()).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_initialize_requires_url_and_name() {
    assert!(DocumentDatabase::initialize("", "site").is_err());

    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("site.db");
    assert!(DocumentDatabase::initialize(&db_path.to_string_lossy(), " ").is_err());
}

#[tokio::test]
async fn test_user_repository_over_sqlite() {
    let (database, _dir) = open_database("site");
    let repo = UserRepository::new(Arc::new(database.collection(USERS_COLLECTION)));

    let pending = repo.create(NewUser::pending("a@b.com")).await.unwrap();
    assert_eq!(pending.created_at, pending.updated_at);
    repo.create(NewUser::linked("c@d.com", "ext-2")).await.unwrap();

    let linked = repo
        .update(&pending.id, UserUpdate::external_id("ext-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(linked.created_at, pending.created_at);
    assert!(linked.updated_at >= pending.updated_at);

    assert_eq!(
        repo.find_by_external_id("ext-1").await.unwrap().unwrap().id,
        pending.id
    );

    let page = repo.list(PageRequest::new(1, 1)).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].email, "a@b.com");

    assert!(repo.delete(&pending.id).await.unwrap());
    assert!(!repo.delete(&pending.id).await.unwrap());
    assert!(repo.find_by_id(&pending.id).await.unwrap().is_none());
}
