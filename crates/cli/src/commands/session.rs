//! Mock login and logout.
//!
//! There is no password check: signing in with an email already in the
//! roster resumes that account, anything else registers a new one.

use uhsin_core::{Email, Role, User};
use uhsin_store::{CacheKey, StateCacheExt};

use super::{CommandError, Context};

/// Sign in as `email`, registering the account if needed.
pub fn login(context: &Context, email: &str, name: &str, admin: bool) -> Result<(), CommandError> {
    let email = Email::parse(email)?;
    let mut store = context.open_store()?;

    let roster: Vec<User> = context.cache.load(CacheKey::Users).unwrap_or_default();
    let user = match roster.into_iter().find(|u| u.email == email) {
        Some(existing) => {
            tracing::info!("Resuming account {} ({})", existing.email, existing.role);
            existing
        }
        None => {
            let role = if admin { Role::Admin } else { Role::User };
            tracing::info!("Registering new {role} account {email}");
            User::new(email, name, role)
        }
    };

    store.sign_in(user);
    if let Some(user) = store.user() {
        println!("Signed in as {} <{}> ({})", user.name, user.email, user.role);
    }
    store.close()?;
    Ok(())
}

/// Sign out and forget the session token.
pub fn logout(context: &Context) -> Result<(), CommandError> {
    let mut store = context.open_store()?;
    if store.user().is_none() {
        println!("Not signed in");
        return Ok(());
    }
    store.sign_out();
    store.close()?;
    println!("Signed out");
    Ok(())
}
