use std::thread;
use std::time::Duration;

use postql::{
    CommentPatch, CreateComment, CreatePost, CreateUser, EngineConfig, MutationKind, Notification,
    PostPatch, PostqlEngine, StoreError, Topic,
};

const WAIT: Duration = Duration::from_secs(1);

fn engine_with_author() -> (PostqlEngine, postql::User) {
    let engine = PostqlEngine::new();
    let author = engine
        .create_user(CreateUser::new("A", "a@x.com"))
        .unwrap();
    (engine, author)
}

fn tags(events: &[Notification]) -> Vec<MutationKind> {
    events.iter().map(Notification::mutation).collect()
}

#[test]
fn draft_publish_delete_scenario() {
    let (engine, a) = engine_with_author();
    let feed = engine.subscribe_posts().unwrap();

    let post = engine
        .create_post(CreatePost::new("T", "B", false, a.id))
        .unwrap();
    assert!(feed.try_recv().unwrap().is_none(), "drafts are invisible");

    engine.update_post(post.id, PostPatch::published(true)).unwrap();
    let created = feed.recv_timeout(WAIT).unwrap();
    assert_eq!(created.mutation(), MutationKind::Created);
    let data = created.post().unwrap();
    assert_eq!(data.title, "T");
    assert_eq!(data.body, "B");
    assert!(data.published);
    assert!(feed.try_recv().unwrap().is_none(), "exactly one event");

    engine.delete_post(post.id).unwrap();
    let deleted = feed.recv_timeout(WAIT).unwrap();
    assert_eq!(deleted.mutation(), MutationKind::Deleted);
    assert_eq!(deleted.post().unwrap().id, post.id);
    assert!(feed.try_recv().unwrap().is_none());
}

#[test]
fn toggle_round_trip_matches_fresh_subscriber_view() {
    let (engine, a) = engine_with_author();
    let post = engine
        .create_post(CreatePost::new("T", "B", false, a.id))
        .unwrap();

    let feed = engine.subscribe_posts().unwrap();
    engine.update_post(post.id, PostPatch::published(true)).unwrap();
    engine.update_post(post.id, PostPatch::published(false)).unwrap();

    let events = feed.drain();
    assert_eq!(tags(&events), vec![MutationKind::Created, MutationKind::Deleted]);
    // DELETED carries the pre-update snapshot, which was still published.
    assert!(events[1].post().unwrap().published);
}

#[test]
fn draft_edits_are_silent_and_published_edits_update() {
    let (engine, a) = engine_with_author();
    let draft = engine
        .create_post(CreatePost::new("T", "B", false, a.id))
        .unwrap();
    let live = engine
        .create_post(CreatePost::new("L", "B", true, a.id))
        .unwrap();

    let feed = engine.subscribe_posts().unwrap();
    engine.update_post(draft.id, PostPatch::title("T2")).unwrap();
    engine.update_post(live.id, PostPatch::title("L2")).unwrap();
    engine.delete_post(draft.id).unwrap();

    let events = feed.drain();
    assert_eq!(tags(&events), vec![MutationKind::Updated]);
    assert_eq!(events[0].post().unwrap().title, "L2");
}

#[test]
fn comment_events_are_scoped_to_their_post() {
    let (engine, a) = engine_with_author();
    let p = engine
        .create_post(CreatePost::new("P", "B", true, a.id))
        .unwrap();
    let q = engine
        .create_post(CreatePost::new("Q", "B", true, a.id))
        .unwrap();

    let on_p = engine.subscribe_comments(p.id).unwrap();
    let on_q = engine.subscribe_comments(q.id).unwrap();
    let posts = engine.subscribe_posts().unwrap();

    let comment = engine
        .create_comment(CreateComment::new("hi", a.id, p.id))
        .unwrap();

    let n = on_p.recv_timeout(WAIT).unwrap();
    assert_eq!(n.topic, Topic::CommentsForPost(p.id));
    assert_eq!(n.mutation(), MutationKind::Created);
    assert_eq!(n.comment(), Some(&comment));

    assert!(on_q.try_recv().unwrap().is_none());
    assert!(posts.try_recv().unwrap().is_none());
}

#[test]
fn comment_update_and_delete_are_reported() {
    let (engine, a) = engine_with_author();
    let p = engine
        .create_post(CreatePost::new("P", "B", true, a.id))
        .unwrap();
    let c = engine
        .create_comment(CreateComment::new("hi", a.id, p.id))
        .unwrap();

    let feed = engine.subscribe_comments(p.id).unwrap();
    engine.update_comment(c.id, CommentPatch::text("edited")).unwrap();
    engine.delete_comment(c.id).unwrap();

    let events = feed.drain();
    assert_eq!(tags(&events), vec![MutationKind::Updated, MutationKind::Deleted]);
    assert_eq!(events[0].comment().unwrap().text, "edited");
    assert_eq!(events[1].comment().unwrap().id, c.id);
}

#[test]
fn delete_post_reports_post_then_cascaded_comments() {
    let (engine, a) = engine_with_author();
    let p = engine
        .create_post(CreatePost::new("P", "B", true, a.id))
        .unwrap();
    engine
        .create_comment(CreateComment::new("one", a.id, p.id))
        .unwrap();
    engine
        .create_comment(CreateComment::new("two", a.id, p.id))
        .unwrap();

    let posts = engine.subscribe_posts().unwrap();
    let comments = engine.subscribe_comments(p.id).unwrap();
    engine.delete_post(p.id).unwrap();

    assert_eq!(tags(&posts.drain()), vec![MutationKind::Deleted]);
    assert_eq!(
        tags(&comments.drain()),
        vec![MutationKind::Deleted, MutationKind::Deleted]
    );
}

#[test]
fn delete_user_reports_only_visible_posts() {
    let (engine, a) = engine_with_author();
    let live = engine
        .create_post(CreatePost::new("L", "B", true, a.id))
        .unwrap();
    engine
        .create_post(CreatePost::new("D", "B", false, a.id))
        .unwrap();

    let feed = engine.subscribe_posts().unwrap();
    engine.delete_user(a.id).unwrap();

    let events = feed.drain();
    assert_eq!(tags(&events), vec![MutationKind::Deleted]);
    assert_eq!(events[0].post().unwrap().id, live.id);
}

#[test]
fn delete_user_reports_cascaded_comments_on_every_post_topic() {
    let (engine, a) = engine_with_author();
    let b = engine
        .create_user(CreateUser::new("B", "b@x.com"))
        .unwrap();
    let a_post = engine
        .create_post(CreatePost::new("A's", "B", true, a.id))
        .unwrap();
    let b_post = engine
        .create_post(CreatePost::new("B's", "B", true, b.id))
        .unwrap();

    let a_on_b = engine
        .create_comment(CreateComment::new("from a", a.id, b_post.id))
        .unwrap();
    let b_on_b = engine
        .create_comment(CreateComment::new("from b", b.id, b_post.id))
        .unwrap();
    let b_on_a = engine
        .create_comment(CreateComment::new("from b", b.id, a_post.id))
        .unwrap();
    let a_on_a = engine
        .create_comment(CreateComment::new("from a", a.id, a_post.id))
        .unwrap();

    let surviving = engine.subscribe_comments(b_post.id).unwrap();
    let removed = engine.subscribe_comments(a_post.id).unwrap();
    engine.delete_user(a.id).unwrap();

    // B's post stays; only A's comment on it goes.
    let events = surviving.drain();
    assert_eq!(tags(&events), vec![MutationKind::Deleted]);
    assert_eq!(events[0].comment().unwrap().id, a_on_b.id);
    assert_eq!(engine.comments().unwrap(), vec![b_on_b]);

    // A's post goes, taking every comment on it regardless of author.
    let events = removed.drain();
    assert_eq!(
        tags(&events),
        vec![MutationKind::Deleted, MutationKind::Deleted]
    );
    let ids: Vec<_> = events.iter().map(|n| n.comment().unwrap().id).collect();
    assert_eq!(ids, vec![b_on_a.id, a_on_a.id]);
}

#[test]
fn failed_mutations_publish_nothing() {
    let (engine, a) = engine_with_author();
    let draft = engine
        .create_post(CreatePost::new("D", "B", false, a.id))
        .unwrap();
    let feed = engine.subscribe_comments(draft.id).unwrap();

    let err = engine
        .create_comment(CreateComment::new("x", a.id, draft.id))
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(feed.try_recv().unwrap().is_none());
}

#[test]
fn unsubscribed_listener_stops_receiving() {
    let (engine, a) = engine_with_author();
    let kept = engine.subscribe_posts().unwrap();
    let gone = engine.subscribe_posts().unwrap();

    gone.unsubscribe();
    assert_eq!(engine.bus().subscriber_count(Topic::AllPosts), 1);

    engine
        .create_post(CreatePost::new("T", "B", true, a.id))
        .unwrap();
    assert!(kept.recv_timeout(WAIT).is_ok());
    assert!(matches!(gone.try_recv(), Err(StoreError::Disconnected { .. })));
}

#[test]
fn late_subscriber_sees_no_history() {
    let (engine, a) = engine_with_author();
    engine
        .create_post(CreatePost::new("T", "B", true, a.id))
        .unwrap();

    let feed = engine.subscribe_posts().unwrap();
    let err = feed.recv_timeout(Duration::from_millis(20)).unwrap_err();
    assert!(matches!(err, StoreError::Timeout { .. }));
}

#[test]
fn bounded_listener_overflow_does_not_block_mutations() {
    let engine = PostqlEngine::with_config(EngineConfig {
        subscription_capacity: Some(1),
        ..EngineConfig::default()
    })
    .unwrap();
    let a = engine
        .create_user(CreateUser::new("A", "a@x.com"))
        .unwrap();
    let slow = engine.subscribe_posts().unwrap();

    for i in 0..3 {
        engine
            .create_post(CreatePost::new(format!("T{i}"), "B", true, a.id))
            .unwrap();
    }
    assert_eq!(engine.posts(None).unwrap().len(), 3);
    assert_eq!(slow.drain().len(), 1);
    assert_eq!(engine.bus().dropped_events(), 2);
}

#[test]
fn subscription_streams_across_threads() {
    let (engine, a) = engine_with_author();
    let feed = engine.subscribe_posts().unwrap();

    let reader = thread::spawn(move || feed.take(3).map(|n| n.mutation()).collect::<Vec<_>>());

    let post = engine
        .create_post(CreatePost::new("T", "B", true, a.id))
        .unwrap();
    engine.update_post(post.id, PostPatch::title("T2")).unwrap();
    engine.delete_post(post.id).unwrap();

    assert_eq!(
        reader.join().unwrap(),
        vec![MutationKind::Created, MutationKind::Updated, MutationKind::Deleted]
    );
}

#[test]
fn stream_ends_when_engine_is_dropped() {
    let (engine, a) = engine_with_author();
    let feed = engine.subscribe_posts().unwrap();
    engine
        .create_post(CreatePost::new("T", "B", true, a.id))
        .unwrap();
    drop(engine);

    assert_eq!(feed.count(), 1);
}
