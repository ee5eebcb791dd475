//! Placement request command handlers.

use tabled::Tabled;

use airq_api::PlacementRequest;
use airq_core::PlacementRequestForm;

use crate::cli::{RequestsArgs, RequestsCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Coordinates")]
    coords: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&PlacementRequest> for RequestRow {
    fn from(r: &PlacementRequest) -> Self {
        Self {
            id: r.id.clone(),
            coords: util::fmt_coords(r.latitude, r.longitude),
            address: r.address.clone().unwrap_or_default(),
            status: r.status.to_string(),
            reason: util::truncate(&r.reason, 40),
            created: util::fmt_time(r.created_at),
        }
    }
}

fn request_detail(r: &PlacementRequest) -> String {
    output::detail(&[
        ("ID", r.id.clone()),
        ("Coordinates", util::fmt_coords(r.latitude, r.longitude)),
        ("Address", r.address.clone().unwrap_or_default()),
        ("Status", r.status.to_string()),
        ("Reason", r.reason.clone()),
        ("Requested by", r.requested_by.clone().unwrap_or_default()),
        ("Created", util::fmt_time(r.created_at)),
    ])
}

pub async fn handle(args: RequestsArgs, ctx: &Ctx) -> Result<(), CliError> {
    let requests = ctx.gateway.requests();

    match args.command {
        RequestsCommand::List => {
            ctx.require_login().await?;
            let list = ctx.finish(requests.list().await)?.unwrap_or_default();
            let out = output::render_list(
                ctx.output,
                &list,
                |r| RequestRow::from(r),
                |r| r.id.clone(),
            );
            ctx.print(&out);
            Ok(())
        }

        RequestsCommand::Create {
            lat,
            lon,
            address,
            reason,
        } => {
            ctx.require_login().await?;
            let body = PlacementRequestForm {
                latitude: lat,
                longitude: lon,
                address,
                reason,
            }
            .into_request()?;

            if let Some(created) = ctx.finish(requests.create(&body).await)? {
                ctx.notifier().success("Placement request submitted");
                let out =
                    output::render_single(ctx.output, &created, request_detail, |r| r.id.clone());
                ctx.print(&out);
            }
            Ok(())
        }

        RequestsCommand::Approve { id } => {
            ctx.require_admin().await?;
            ctx.finish(requests.approve(&id).await)?;
            ctx.notifier().success(&format!("Request {id} approved"));
            Ok(())
        }

        RequestsCommand::Reject { id } => {
            ctx.require_admin().await?;
            ctx.finish(requests.reject(&id).await)?;
            ctx.notifier().success(&format!("Request {id} rejected"));
            Ok(())
        }

        RequestsCommand::Delete { id } => {
            ctx.require_login().await?;
            if !util::confirm(&format!("Withdraw request '{id}'?"), ctx.yes)? {
                return Ok(());
            }
            ctx.finish(requests.delete(&id).await)?;
            ctx.notifier().success("Request withdrawn");
            Ok(())
        }
    }
}
