//! Account administration handlers. Every command requires the admin role.

use tabled::Tabled;

use airq_api::{Role, UserProfile};

use crate::cli::{UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
}

impl From<&UserProfile> for UserRow {
    fn from(u: &UserProfile) -> Self {
        Self {
            id: u.id.clone(),
            email: u.email.clone(),
            name: u.name.clone().unwrap_or_default(),
            role: u.role.to_string(),
        }
    }
}

pub async fn handle(args: UsersArgs, ctx: &Ctx) -> Result<(), CliError> {
    let me = ctx.require_admin().await?;
    let users = ctx.gateway.users();

    match args.command {
        UsersCommand::List => {
            let list = ctx.finish(users.list().await)?.unwrap_or_default();
            let out = output::render_list(
                ctx.output,
                &list,
                |u| UserRow::from(u),
                |u| u.id.clone(),
            );
            ctx.print(&out);
            Ok(())
        }

        UsersCommand::SetRole { id, role } => {
            let role = role.trim().to_uppercase();
            if role.is_empty() {
                return Err(CliError::Validation {
                    field: "role".into(),
                    reason: "must not be empty".into(),
                });
            }
            let role = Role::new(role);
            if let Some(user) = ctx.finish(users.set_role(&id, &role).await)? {
                ctx.notifier()
                    .success(&format!("{} is now {}", util::display_name(&user), user.role));
            }
            Ok(())
        }

        UsersCommand::Delete { id } => {
            if id == me.id {
                return Err(CliError::Validation {
                    field: "id".into(),
                    reason: "refusing to delete the account you are logged in as".into(),
                });
            }
            if !util::confirm(&format!("Delete account '{id}'?"), ctx.yes)? {
                return Ok(());
            }
            ctx.finish(users.delete(&id).await)?;
            ctx.notifier().success("Account deleted");
            Ok(())
        }
    }
}
