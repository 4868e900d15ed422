//! Tests for the generic record repository.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, Utc};
    use serde::{Deserialize, Serialize};

    use crate::documents::{DocumentStoreTrait, Filter, InMemoryDocumentStore};
    use crate::records::{PageRequest, Record, Repository};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Note {
        #[serde(rename = "_id")]
        id: String,
        title: String,
        tag: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct NewNote {
        title: String,
        tag: Option<String>,
        #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
        imported_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        created_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Clone, Default, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct NotePatch {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        created_at: Option<DateTime<Utc>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        updated_at: Option<DateTime<Utc>>,
    }

    impl Record for Note {
        type New = NewNote;
        type Patch = NotePatch;
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> &str {
            &self.id
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn updated_at(&self) -> DateTime<Utc> {
            self.updated_at
        }
    }

    fn repository() -> (Arc<InMemoryDocumentStore>, Repository<Note>) {
        let store = Arc::new(InMemoryDocumentStore::new(Note::COLLECTION));
        let repo = Repository::<Note>::new(store.clone());
        (store, repo)
    }

    fn new_note(title: &str) -> NewNote {
        NewNote {
            title: title.to_string(),
            tag: None,
            imported_id: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_sets_identity_and_equal_timestamps() {
        let (_store, repo) = repository();
        let before = Utc::now();

        let note = repo
            .create(NewNote {
                tag: Some("news".to_string()),
                ..new_note("Hello")
            })
            .await
            .unwrap();

        assert!(!note.id().is_empty());
        assert_eq!(note.created_at(), note.updated_at());
        assert!(note.created_at() >= before);
        assert_eq!(note.title, "Hello");
        assert_eq!(note.tag.as_deref(), Some("news"));

        let stored = repo.find_by_id(note.id()).await.unwrap().unwrap();
        assert_eq!(stored, note);
    }

    #[tokio::test]
    async fn test_create_ignores_reserved_fields_in_input() {
        let (store, repo) = repository();
        let ancient = Utc::now() - Duration::days(3650);

        let note = repo
            .create(NewNote {
                imported_id: Some("chosen".to_string()),
                created_at: Some(ancient),
                ..new_note("Imported")
            })
            .await
            .unwrap();

        assert_ne!(note.id, "chosen");
        assert_ne!(note.created_at, ancient);
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_stamps_updated_at_and_keeps_created_at() {
        let (_store, repo) = repository();
        let note = repo.create(new_note("Draft")).await.unwrap();
        let caller_time = Utc::now() - Duration::days(30);

        let updated = repo
            .update(
                note.id(),
                NotePatch {
                    title: Some("Final".to_string()),
                    created_at: Some(caller_time),
                    updated_at: Some(caller_time),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, note.id);
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.created_at, note.created_at);
        assert!(updated.updated_at >= note.updated_at);
        assert_ne!(updated.updated_at, caller_time);
    }

    #[tokio::test]
    async fn test_update_unknown_id_returns_none() {
        let (_store, repo) = repository();
        let result = repo
            .update(
                "does-not-exist",
                NotePatch {
                    title: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_reports_whether_a_record_was_removed() {
        let (_store, repo) = repository();
        let note = repo.create(new_note("Gone soon")).await.unwrap();

        assert!(!repo.delete("does-not-exist").await.unwrap());
        assert!(repo.delete(note.id()).await.unwrap());
        assert!(repo.find_by_id(note.id()).await.unwrap().is_none());
        assert!(!repo.delete(note.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_windows_items_and_counts_all_matches() {
        let (_store, repo) = repository();
        for i in 0..7 {
            repo.create(NewNote {
                tag: Some(if i % 2 == 0 { "even" } else { "odd" }.to_string()),
                ..new_note(&format!("note {i}"))
            })
            .await
            .unwrap();
        }

        let first = repo
            .find(&Filter::all(), PageRequest::new(1, 3))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 3);
        assert_eq!(first.total, 7);
        assert_eq!(first.items[0].title, "note 0");

        let last = repo
            .find(&Filter::all(), PageRequest::new(3, 3))
            .await
            .unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].title, "note 6");
        assert_eq!(last.total, 7);

        let evens = repo
            .find(&Filter::eq("tag", "even"), PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(evens.items.len(), 2);
        assert_eq!(evens.total, 4);
    }

    #[tokio::test]
    async fn test_find_defaults_to_first_page_of_ten() {
        let (_store, repo) = repository();
        for i in 0..12 {
            repo.create(new_note(&format!("n{i}"))).await.unwrap();
        }
        let page = repo.find(&Filter::all(), PageRequest::default()).await.unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total, 12);
    }

    #[tokio::test]
    async fn test_find_one_by_field() {
        let (store, repo) = repository();
        repo.create(new_note("alpha")).await.unwrap();
        let beta = repo.create(new_note("beta")).await.unwrap();

        let found = repo
            .find_one(&Filter::eq("title", "beta"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, beta.id);
        assert!(repo
            .find_one(&Filter::eq("title", "gamma"))
            .await
            .unwrap()
            .is_none());
        assert_eq!(store.collection_name(), "notes");
    }

    #[test]
    fn test_page_request_skip() {
        assert_eq!(PageRequest::new(1, 10).skip(), 0);
        assert_eq!(PageRequest::new(3, 10).skip(), 20);
        assert_eq!(PageRequest::new(0, 10).skip(), -10);
        assert_eq!(PageRequest::default(), PageRequest::new(1, 10));
    }
}
