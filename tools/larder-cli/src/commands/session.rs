//! Login and logout.

use anyhow::{bail, Result};
use larder_commerce::UserId;

use super::LoginArgs;
use crate::context::Context;
use crate::output::owner_label;

/// Log in, merging the guest cart into the user's cart.
pub fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let user = args.user.trim();
    if user.is_empty() {
        bail!("User ID cannot be empty");
    }

    let mut session = ctx.session()?;
    let mut ledger = ctx.open_ledger(&session)?;
    let previous = session.owner();
    let pending = ledger.cart().unique_line_count();

    session.user = Some(UserId::new(user));
    ledger.on_identity_change(&previous, session.owner())?;
    ctx.save_session(&session)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "owner": ledger.owner(),
            "merged_lines": pending,
            "lines": ledger.cart().unique_line_count(),
        }));
        return Ok(());
    }

    ctx.output
        .success(&format!("Logged in as {}", owner_label(ledger.owner())));
    if previous.is_authenticated() {
        ctx.output.warn("Switched user; carts were not merged");
    } else if pending > 0 {
        ctx.output.info(&format!(
            "Merged {} guest line(s); cart now has {}",
            pending,
            ledger.cart().unique_line_count()
        ));
    }
    Ok(())
}

/// Log out, returning to the guest cart.
pub fn logout(ctx: &Context) -> Result<()> {
    let mut session = ctx.session()?;
    if session.user.is_none() {
        ctx.output.info("Not logged in");
        return Ok(());
    }

    let mut ledger = ctx.open_ledger(&session)?;
    let previous = session.owner();
    session.user = None;
    ledger.on_identity_change(&previous, session.owner())?;
    ctx.save_session(&session)?;

    ctx.output.success("Logged out");
    ctx.output.debug(&format!("Active cart: {}", ledger.owner()));
    Ok(())
}
