//! Login, logout, and account commands.

use anyhow::Result;
use dialoguer::{Input, Password, Select};
use kirana::{
    api::AuthService,
    models::user::{Credentials, Registration, Role, User},
};

use crate::cli::context::Context;

/// Prompt for credentials and log in.
pub async fn login(ctx: &Context) -> Result<()> {
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    let password = Password::new().with_prompt("Password").interact()?;

    let spinner = ctx.output.spinner("Signing in");

    let result = ctx.auth.login(Credentials { email, password }).await;

    spinner.finish_and_clear();

    let response = result?;

    ctx.cache.clear();
    ctx.output.success(&format!(
        "Logged in as {} ({})",
        response.user.full_name, response.user.role
    ));

    Ok(())
}

/// Prompt for account details and register a staff account.
pub async fn register(ctx: &Context) -> Result<()> {
    let full_name: String = Input::new().with_prompt("Full name").interact_text()?;
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "The passwords do not match")
        .interact()?;
    let role = select_role()?;

    let spinner = ctx.output.spinner("Creating the account");

    let result = ctx
        .auth
        .register(Registration {
            email,
            password,
            full_name,
            role,
        })
        .await;

    spinner.finish_and_clear();

    let response = result?;

    ctx.cache.clear();
    ctx.output.success(&format!(
        "Registered {} as {}",
        response.user.email, response.user.role
    ));

    Ok(())
}

/// Forget the stored session.
pub async fn logout(ctx: &Context) -> Result<()> {
    ctx.auth.logout().await?;
    ctx.cache.clear();
    ctx.output.success("Logged out");

    Ok(())
}

/// Show the logged-in account.
pub fn whoami(ctx: &Context) -> Result<()> {
    let Some(user) = ctx.session.user() else {
        ctx.output.warn("Not logged in");
        return Ok(());
    };

    print_account(ctx, &user);

    Ok(())
}

fn print_account(ctx: &Context, user: &User) {
    ctx.output.header("Account");
    ctx.output.kv("Name", &user.full_name);
    ctx.output.kv("Email", &user.email);
    ctx.output.kv("Role", user.role.as_str());
    ctx.output
        .kv("Session file", &ctx.session.path().display().to_string());
}

fn select_role() -> Result<Role> {
    const ROLES: [Role; 3] = [Role::Owner, Role::Cashier, Role::Staff];

    let labels: Vec<&str> = ROLES.iter().map(|role| role.as_str()).collect();
    let picked = Select::new()
        .with_prompt("Role")
        .items(&labels)
        .default(1)
        .interact()?;

    Ok(ROLES.get(picked).copied().unwrap_or(Role::Cashier))
}
