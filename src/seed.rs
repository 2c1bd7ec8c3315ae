//! Bootstrap data set for demos and manual testing.
//!
//! Records go through the regular integrity checks, so the seeded state
//! satisfies every invariant a mutation would enforce.

use crate::comment::CreateComment;
use crate::error::StoreResult;
use crate::integrity;
use crate::post::CreatePost;
use crate::storage::Tables;
use crate::user::CreateUser;

/// Insert three users, three posts (two published) and three comments.
pub fn load(tables: &mut Tables) -> StoreResult<()> {
    let javi = integrity::create_user(
        tables,
        CreateUser::new("Javi", "javi@example.com").with_age(30),
    )?
    .record;
    let miguel = integrity::create_user(tables, CreateUser::new("Miguel", "miguel@example.com"))?
        .record;
    let manolo = integrity::create_user(
        tables,
        CreateUser::new("Manolo", "manolo@example.com").with_age(33),
    )?
    .record;

    let first = integrity::create_post(
        tables,
        CreatePost::new("first post title", "first post body", true, javi.id),
    )?
    .record;
    integrity::create_post(
        tables,
        CreatePost::new("second post title", "second post body", false, miguel.id),
    )?;
    let third = integrity::create_post(
        tables,
        CreatePost::new("third post title", "third post body", true, manolo.id),
    )?
    .record;

    integrity::create_comment(tables, CreateComment::new("Nice post!", miguel.id, first.id))?;
    integrity::create_comment(tables, CreateComment::new("Agreed.", manolo.id, first.id))?;
    integrity::create_comment(tables, CreateComment::new("Thanks for sharing", javi.id, third.id))?;
    Ok(())
}

/// Fresh tables holding the demo data set.
pub fn demo_tables() -> StoreResult<Tables> {
    let mut tables = Tables::new();
    load(&mut tables)?;
    Ok(tables)
}
