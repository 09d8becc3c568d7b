//! Identity and visited-set commands.

use stadiumap_store::{current_identity, login, logout, toggle_visited, Identity, VisitedSet};

use crate::context::AppContext;

pub(crate) fn run_visited(ctx: &AppContext) -> anyhow::Result<()> {
    let identity = current_identity(&ctx.store)?;
    let visited = VisitedSet::load(&ctx.store, &identity)?;

    if visited.is_empty() {
        println!("no stadiums marked visited for {identity}");
        return Ok(());
    }

    println!("{} stadium(s) visited by {identity}:", visited.len());
    for id in visited.iter() {
        match ctx.seed_stadium(id) {
            Some(stadium) => println!("  {id:<24}{}, {}", stadium.display_name(), stadium.city),
            None => println!("  {id}"),
        }
    }
    Ok(())
}

pub(crate) fn run_visited_toggle(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let id = id.trim();
    anyhow::ensure!(!id.is_empty(), "stadium id must not be blank");

    let identity = current_identity(&ctx.store)?;
    let now_visited = toggle_visited(&ctx.store, &identity, id)?;
    if now_visited {
        println!("marked {id} visited");
    } else {
        println!("unmarked {id}");
    }
    if identity.is_guest() {
        println!("(guest list; log in to keep a list of your own)");
    }
    Ok(())
}

pub(crate) fn run_login(ctx: &AppContext, username: &str, password: &str) -> anyhow::Result<()> {
    let identity = login(&ctx.store, username, password)?;
    let visited = VisitedSet::load(&ctx.store, &identity)?;
    println!(
        "logged in as {identity} ({} stadium(s) visited)",
        visited.len()
    );
    Ok(())
}

pub(crate) fn run_logout(ctx: &AppContext) -> anyhow::Result<()> {
    let was = current_identity(&ctx.store)?;
    logout(&ctx.store)?;
    match was {
        Identity::Guest => println!("already in guest mode"),
        Identity::User(name) => println!("logged out {name}; now in guest mode"),
    }
    Ok(())
}

pub(crate) fn run_whoami(ctx: &AppContext) -> anyhow::Result<()> {
    match current_identity(&ctx.store)? {
        Identity::Guest => println!("guest (not logged in)"),
        Identity::User(name) => println!("{name}"),
    }
    Ok(())
}
