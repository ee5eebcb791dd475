//! Alert subscription command handlers.

use tabled::Tabled;

use airq_api::{AlertChannel, Subscription};
use airq_core::SubscriptionForm;

use crate::cli::{ChannelArg, SubscriptionsArgs, SubscriptionsCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

#[derive(Tabled)]
struct SubscriptionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Sensor")]
    sensor: String,
    #[tabled(rename = "Threshold")]
    threshold: u32,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Subscription> for SubscriptionRow {
    fn from(s: &Subscription) -> Self {
        Self {
            id: s.id.clone(),
            sensor: s.sensor_id.clone(),
            threshold: s.threshold,
            channel: s.channel.to_string(),
            created: util::fmt_time(s.created_at),
        }
    }
}

fn channel(arg: ChannelArg) -> AlertChannel {
    match arg {
        ChannelArg::Email => AlertChannel::Email,
        ChannelArg::Sms => AlertChannel::Sms,
        ChannelArg::Push => AlertChannel::Push,
    }
}

pub async fn handle(args: SubscriptionsArgs, ctx: &Ctx) -> Result<(), CliError> {
    ctx.require_login().await?;
    let subscriptions = ctx.gateway.subscriptions();

    match args.command {
        SubscriptionsCommand::List => {
            let list = ctx.finish(subscriptions.list().await)?.unwrap_or_default();
            let out = output::render_list(
                ctx.output,
                &list,
                |s| SubscriptionRow::from(s),
                |s| s.id.clone(),
            );
            ctx.print(&out);
            Ok(())
        }

        SubscriptionsCommand::Create {
            sensor,
            threshold,
            channel: ch,
        } => {
            let body = SubscriptionForm {
                sensor_id: sensor,
                threshold,
                channel: channel(ch),
            }
            .into_request()?;

            if let Some(sub) = ctx.finish(subscriptions.create(&body).await)? {
                ctx.notifier().success(&format!(
                    "Alerting via {} when sensor {} exceeds AQI {}",
                    sub.channel, sub.sensor_id, sub.threshold
                ));
                ctx.print(&output::render_single(
                    ctx.output,
                    &sub,
                    |s| {
                        output::detail(&[
                            ("ID", s.id.clone()),
                            ("Sensor", s.sensor_id.clone()),
                            ("Threshold", s.threshold.to_string()),
                            ("Channel", s.channel.to_string()),
                        ])
                    },
                    |s| s.id.clone(),
                ));
            }
            Ok(())
        }

        SubscriptionsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete subscription '{id}'?"), ctx.yes)? {
                return Ok(());
            }
            ctx.finish(subscriptions.delete(&id).await)?;
            ctx.notifier().success("Subscription deleted");
            Ok(())
        }
    }
}
