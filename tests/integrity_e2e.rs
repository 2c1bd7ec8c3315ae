use std::collections::HashSet;

use postql::{
    CreateComment, CreatePost, CreateUser, DeletePayload, EngineResponse, EntityKind, Operation,
    PostPatch, PostqlEngine, Request, StoreError, UpdatePayload, UserPatch,
};

fn assert_no_orphans(engine: &PostqlEngine) {
    let view = engine.read().unwrap();
    for post in view.posts(None) {
        assert!(view.post_author(post).is_some(), "post {} lost its author", post.id);
    }
    for comment in view.comments() {
        assert!(view.comment_author(comment).is_some());
        assert!(view.comment_post(comment).is_some());
    }
}

fn assert_unique_emails(engine: &PostqlEngine) {
    let users = engine.users(None).unwrap();
    let emails: HashSet<&str> = users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails.len(), users.len());
}

#[test]
fn duplicate_email_leaves_store_unchanged() {
    let engine = PostqlEngine::new();
    engine
        .create_user(CreateUser::new("A", "a@x.com"))
        .unwrap();
    let before = engine.users(None).unwrap();

    let err = engine
        .create_user(CreateUser::new("B", "a@x.com"))
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(engine.users(None).unwrap(), before);
}

#[test]
fn emails_stay_unique_across_updates() {
    let engine = PostqlEngine::new();
    let a = engine
        .create_user(CreateUser::new("A", "a@x.com"))
        .unwrap();
    let b = engine
        .create_user(CreateUser::new("B", "b@x.com"))
        .unwrap();

    let err = engine
        .update_user(
            b.id,
            UserPatch {
                email: Some("a@x.com".to_string()),
                ..UserPatch::default()
            },
        )
        .unwrap_err();
    assert!(err.is_conflict());

    // Freeing an email makes it available again.
    engine
        .update_user(
            a.id,
            UserPatch {
                email: Some("a2@x.com".to_string()),
                ..UserPatch::default()
            },
        )
        .unwrap();
    engine
        .update_user(
            b.id,
            UserPatch {
                email: Some("a@x.com".to_string()),
                ..UserPatch::default()
            },
        )
        .unwrap();
    assert_unique_emails(&engine);
}

#[test]
fn comment_references_are_validated() {
    let engine = PostqlEngine::new();
    let a = engine
        .create_user(CreateUser::new("A", "a@x.com"))
        .unwrap();
    let draft = engine
        .create_post(CreatePost::new("D", "B", false, a.id))
        .unwrap();

    let err = engine
        .create_comment(CreateComment::new("x", a.id, draft.id))
        .unwrap_err();
    assert_eq!(err, StoreError::not_found(EntityKind::Post, draft.id));

    let ghost = postql::UserId::new();
    let err = engine
        .create_comment(CreateComment::new("x", ghost, draft.id))
        .unwrap_err();
    assert_eq!(err, StoreError::not_found(EntityKind::User, ghost));

    engine.update_post(draft.id, PostPatch::published(true)).unwrap();
    engine
        .create_comment(CreateComment::new("x", a.id, draft.id))
        .unwrap();
    assert_eq!(engine.comments().unwrap().len(), 1);
}

#[test]
fn delete_user_cascade_leaves_no_orphans() {
    let engine = PostqlEngine::new();
    let a = engine
        .create_user(CreateUser::new("A", "a@x.com"))
        .unwrap();
    let b = engine
        .create_user(CreateUser::new("B", "b@x.com"))
        .unwrap();

    let a1 = engine
        .create_post(CreatePost::new("a1", "x", true, a.id))
        .unwrap();
    engine
        .create_post(CreatePost::new("a2", "x", false, a.id))
        .unwrap();
    let b1 = engine
        .create_post(CreatePost::new("b1", "x", true, b.id))
        .unwrap();

    engine
        .create_comment(CreateComment::new("b on a1", b.id, a1.id))
        .unwrap();
    engine
        .create_comment(CreateComment::new("a on b1", a.id, b1.id))
        .unwrap();
    let kept = engine
        .create_comment(CreateComment::new("b on b1", b.id, b1.id))
        .unwrap();

    let removed = engine.delete_user(a.id).unwrap();
    assert_eq!(removed, a);

    assert_eq!(engine.posts(None).unwrap(), vec![b1]);
    assert_eq!(engine.comments().unwrap(), vec![kept]);
    assert_no_orphans(&engine);
}

#[test]
fn failed_lookups_name_the_missing_record() {
    let engine = PostqlEngine::new();
    let id = postql::PostId::new();
    let err = engine.delete_post(id).unwrap_err();
    assert_eq!(err.to_string(), format!("Post not found: {id}"));
}

#[test]
fn execute_json_request() {
    let engine = PostqlEngine::new();
    let request = postql::ir::from_json(
        r#"{
            "version": "1.0",
            "request_id": "6f1f3b2e-4e43-4c1e-9a7a-8a1d2b3c4d5e",
            "timestamp": "2024-01-01T00:00:00Z",
            "operation": {
                "op": "create_user",
                "payload": { "id": "smuggled", "name": "A", "email": "a@x.com", "age": 30 }
            }
        }"#,
    )
    .unwrap();

    let EngineResponse::User(user) = engine.execute(request).unwrap() else {
        panic!("expected user response");
    };
    assert_eq!(user.age, Some(30));
    assert_ne!(user.id.to_string(), "smuggled");

    let resp = engine
        .execute(Request::new(Operation::UpdateUser(UpdatePayload {
            id: user.id,
            data: UserPatch {
                age: Some(None),
                ..UserPatch::default()
            },
        })))
        .unwrap();
    assert!(matches!(resp, EngineResponse::User(ref u) if u.age.is_none() && u.name == "A"));

    let resp = engine
        .execute(Request::new(Operation::DeleteUser(DeletePayload { id: user.id })))
        .unwrap();
    assert_eq!(resp, EngineResponse::User(postql::User { age: None, ..user }));
    assert!(engine.users(None).unwrap().is_empty());
}

#[test]
fn random_mutation_sequence_keeps_invariants() {
    let engine = PostqlEngine::new();
    let mut users = Vec::new();
    for i in 0..6 {
        users.push(
            engine
                .create_user(CreateUser::new(format!("u{i}"), format!("u{i}@x.com")))
                .unwrap(),
        );
    }

    let mut posts = Vec::new();
    for (i, u) in users.iter().enumerate() {
        for j in 0..3 {
            posts.push(
                engine
                    .create_post(CreatePost::new(format!("p{i}{j}"), "b", (i + j) % 2 == 0, u.id))
                    .unwrap(),
            );
        }
    }

    for (i, p) in posts.iter().enumerate() {
        let author = users[(i * 5) % users.len()].id;
        let result = engine.create_comment(CreateComment::new("c", author, p.id));
        assert_eq!(result.is_ok(), p.published);
    }

    // Conflicting email attempts never change anything.
    for u in &users[1..] {
        assert!(engine
            .update_user(
                u.id,
                UserPatch {
                    email: Some("u0@x.com".to_string()),
                    ..UserPatch::default()
                }
            )
            .is_err());
    }
    assert_unique_emails(&engine);

    engine.delete_user(users[2].id).unwrap();
    assert_no_orphans(&engine);
    engine.delete_post(posts[0].id).unwrap();
    assert_no_orphans(&engine);
    engine.delete_user(users[5].id).unwrap();
    assert_no_orphans(&engine);
    assert_unique_emails(&engine);

    assert_eq!(engine.users(None).unwrap().len(), 4);
}
