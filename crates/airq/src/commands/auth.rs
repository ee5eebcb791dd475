//! Account and session command handlers.

use serde_json::{Map, Value};

use airq_api::UserProfile;
use airq_core::{LoginForm, RegisterForm};

use crate::cli::{LoginArgs, ProfileArgs, ProfileCommand, RegisterArgs};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

fn user_detail(u: &UserProfile) -> String {
    output::detail(&[
        ("ID", u.id.clone()),
        ("Email", u.email.clone()),
        ("Name", u.name.clone().unwrap_or_default()),
        ("Role", u.role.to_string()),
    ])
}

fn print_user(ctx: &Ctx, user: &UserProfile) {
    let out = output::render_single(ctx.output, user, user_detail, |u| u.id.clone());
    ctx.print(&out);
}

pub async fn login(args: LoginArgs, ctx: &Ctx) -> Result<(), CliError> {
    let email = match args.email {
        Some(email) => email,
        None => util::prompt_text("Email")?,
    };
    let password = if args.password_stdin {
        util::read_stdin_line()?
    } else {
        util::prompt_password("Password")?
    };

    let request = LoginForm { email, password }.into_request()?;
    if let Some(user) = ctx.finish(ctx.gateway.users().login(&request).await)? {
        ctx.notifier()
            .success(&format!("Logged in as {} ({})", util::display_name(&user), user.role));
    }
    Ok(())
}

pub fn logout(ctx: &Ctx) {
    let was_logged_in = ctx.gateway.session().is_logged_in();
    ctx.gateway.users().logout();
    if was_logged_in {
        ctx.notifier().success("Logged out");
    } else {
        ctx.notifier().info("Not logged in");
    }
}

pub async fn register(args: RegisterArgs, ctx: &Ctx) -> Result<(), CliError> {
    let name = match args.name {
        Some(name) => name,
        None => util::prompt_text("Name")?,
    };
    let email = match args.email {
        Some(email) => email,
        None => util::prompt_text("Email")?,
    };
    let (password, confirm_password) = if args.password_stdin {
        let password = util::read_stdin_line()?;
        (password.clone(), password)
    } else {
        (
            util::prompt_password("Password")?,
            util::prompt_password("Confirm password")?,
        )
    };

    let request = RegisterForm {
        name,
        email,
        password,
        confirm_password,
    }
    .into_request()?;

    if let Some(user) = ctx.finish(ctx.gateway.users().register(&request).await)? {
        ctx.notifier().success(&format!(
            "Account created for {}. Run: airq login",
            user.email
        ));
    }
    Ok(())
}

pub async fn whoami(refresh: bool, ctx: &Ctx) -> Result<(), CliError> {
    let local = ctx.require_login().await?;
    let user = if refresh {
        ctx.finish(ctx.gateway.users().me().await)?.unwrap_or(local)
    } else {
        local
    };
    print_user(ctx, &user);
    Ok(())
}

pub async fn profile(args: ProfileArgs, ctx: &Ctx) -> Result<(), CliError> {
    match args.command {
        ProfileCommand::Update { name, fields } => {
            ctx.require_login().await?;

            let mut changes = Map::new();
            for raw in &fields {
                let (key, value) = util::parse_field(raw)?;
                changes.insert(key, value);
            }
            if let Some(name) = name {
                changes.insert("name".into(), Value::String(name));
            }
            if changes.is_empty() {
                return Err(CliError::Validation {
                    field: "profile".into(),
                    reason: "nothing to update; pass --name or --set KEY=VALUE".into(),
                });
            }

            if let Some(user) = ctx.finish(ctx.gateway.users().update_profile(&changes).await)? {
                ctx.notifier().success("Profile updated");
                print_user(ctx, &user);
            }
            Ok(())
        }
    }
}
