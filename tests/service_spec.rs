use std::sync::Arc;

use notes_api::models::*;
use notes_api::service::NoteService;
use notes_api::storage::{MemoryNoteStore, NoteStore};
use notes_api::validation::{CreateNoteRequest, UpdateNoteRequest};
use serde_json::json;
use speculate2::speculate;
use uuid::Uuid;

fn new_note(title: &str, content: &str) -> NewNote {
    NewNote {
        title: title.to_string(),
        content: content.to_string(),
    }
}

speculate! {
    before {
        let store = MemoryNoteStore::new();
        let service = NoteService::new(Arc::new(store.clone()));
    }

    describe "create_note" {
        it "stores the note in the injected store" {
            let note = service.create_note(new_note("Buy groceries", "Milk, eggs"))
                .expect("Failed to create note");

            assert!(store.exists(note.id).expect("Query failed"));
            assert_eq!(store.get(note.id).expect("Query failed"), Some(note));
        }

        it "starts incomplete with equal timestamps" {
            let note = service.create_note(new_note("t", "c")).expect("Failed to create note");

            assert!(!note.completed);
            assert_eq!(note.created_at, note.updated_at);
        }

        it "accepts input produced by request validation" {
            let request: CreateNoteRequest = serde_json::from_value(json!({
                "title": "  Spaced  ",
                "content": "Body"
            })).expect("Failed to parse request");
            let input = request.validate().expect("Validation failed");

            let note = service.create_note(input).expect("Failed to create note");
            assert_eq!(note.title, "Spaced");
        }
    }

    describe "get_all_notes" {
        it "returns an empty list for a fresh store" {
            assert!(service.get_all_notes().expect("Query failed").is_empty());
        }

        it "returns every created note" {
            service.create_note(new_note("a", "1")).expect("Failed to create");
            service.create_note(new_note("b", "2")).expect("Failed to create");

            let titles: Vec<String> = service.get_all_notes()
                .expect("Query failed")
                .into_iter()
                .map(|n| n.title)
                .collect();
            assert_eq!(titles, vec!["a".to_string(), "b".to_string()]);
        }
    }

    describe "get_note" {
        it "returns None for a never-created id" {
            assert!(service.get_note(Uuid::new_v4()).expect("Query failed").is_none());
        }
    }

    describe "update_note" {
        it "merges supplied fields and keeps the rest" {
            let note = service.create_note(new_note("Title", "Content")).expect("Failed to create");

            let request: UpdateNoteRequest = serde_json::from_value(json!({ "completed": true }))
                .expect("Failed to parse request");
            let updated = service
                .update_note(note.id, request.validate().expect("Validation failed"))
                .expect("Update failed")
                .expect("Note missing");

            assert_eq!(updated.title, "Title");
            assert_eq!(updated.content, "Content");
            assert!(updated.completed);
            assert_eq!(updated.created_at, note.created_at);
            assert!(updated.updated_at > note.updated_at);
        }

        it "keeps created_at <= updated_at across many updates" {
            let note = service.create_note(new_note("Title", "Content")).expect("Failed to create");

            for i in 0..10 {
                let updated = service
                    .update_note(note.id, NoteChanges {
                        title: Some(format!("Title {i}")),
                        ..Default::default()
                    })
                    .expect("Update failed")
                    .expect("Note missing");
                assert!(updated.created_at <= updated.updated_at);
                assert_eq!(updated.id, note.id);
            }
        }

        it "returns None for a deleted note" {
            let note = service.create_note(new_note("Title", "Content")).expect("Failed to create");
            assert!(service.delete_note(note.id).expect("Delete failed"));

            let result = service
                .update_note(note.id, NoteChanges { completed: Some(true), ..Default::default() })
                .expect("Update failed");
            assert!(result.is_none());
            assert!(!store.exists(note.id).expect("Query failed"));
        }
    }

    describe "delete_note" {
        it "removes the note on the first call only" {
            let note = service.create_note(new_note("Title", "Content")).expect("Failed to create");

            assert!(service.delete_note(note.id).expect("Delete failed"));
            assert!(!service.delete_note(note.id).expect("Delete failed"));
            assert!(service.get_note(note.id).expect("Query failed").is_none());
        }
    }

    describe "concurrent access" {
        it "last writer wins for concurrent updates to one note" {
            let note = service.create_note(new_note("Title", "Content")).expect("Failed to create");

            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let service = service.clone();
                    std::thread::spawn(move || {
                        service
                            .update_note(note.id, NoteChanges {
                                title: Some(format!("Writer {i}")),
                                ..Default::default()
                            })
                            .expect("Update failed")
                    })
                })
                .collect();

            for handle in handles {
                assert!(handle.join().expect("Thread panicked").is_some());
            }

            let stored = service.get_note(note.id).expect("Query failed").expect("Note missing");
            assert!(stored.title.starts_with("Writer "));
            assert_eq!(service.get_all_notes().expect("Query failed").len(), 1);
        }
    }
}
