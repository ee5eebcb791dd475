//! Command dispatch and the per-invocation context.
//!
//! Every data command runs behind a `RouteGuard`: login for reads and
//! personal data, the admin role for fleet and account management.

pub mod auth;
pub mod config_cmd;
pub mod requests;
pub mod sensors;
pub mod subscriptions;
pub mod users;
pub mod util;

use std::sync::Arc;

use airq_api::{Role, UserProfile};
use airq_config::Config;
use airq_core::{
    ApiResult, FileStorage, Gateway, GuardState, MemoryStorage, Notifier, RouteGuard,
    SessionStorage, SessionStore,
};
use tracing::debug;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::navigator::{RedirectRecorder, redirect_error};
use crate::notifier::TerminalNotifier;
use crate::output;

/// Everything a handler needs for one invocation.
pub struct Ctx {
    pub gateway: Gateway,
    pub navigator: Arc<RedirectRecorder>,
    pub output: OutputFormat,
    pub quiet: bool,
    pub yes: bool,
}

impl Ctx {
    /// Hydrate the session and wire the gateway to the terminal.
    pub fn build(global: &GlobalOpts, cfg: &Config) -> Result<Self, CliError> {
        let storage: Arc<dyn SessionStorage> = if global.ephemeral {
            Arc::new(MemoryStorage::new())
        } else {
            Arc::new(FileStorage::new(cfg.session_dir()))
        };
        let session = Arc::new(SessionStore::new(storage));
        session.initialize();

        let color = output::should_color(config::color_mode(global, cfg), output::stderr_is_terminal());
        let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier::new(color, global.quiet));
        let navigator = Arc::new(RedirectRecorder::default());

        let gateway = Gateway::new(
            cfg.api_url()?,
            &cfg.transport_config(),
            session,
            notifier,
            navigator.clone(),
        )?;

        Ok(Self {
            gateway,
            navigator,
            output: config::output_format(global, cfg),
            quiet: global.quiet,
            yes: global.yes,
        })
    }

    /// Run `guard` against the session; the user on success.
    pub async fn require(&self, guard: &RouteGuard) -> Result<UserProfile, CliError> {
        let mut session = self.gateway.session().subscribe();
        let state = guard.resolve(&mut session, self.navigator.as_ref()).await;
        debug!(?state, "guard resolved");

        if state == GuardState::Authorized {
            if let Some(user) = self.gateway.session().current_user() {
                return Ok(user);
            }
        }
        let to = self
            .navigator
            .take()
            .or_else(|| state.redirect())
            .unwrap_or(airq_core::Destination::Login);
        Err(redirect_error(to, guard.required_role().map(Role::as_str)))
    }

    pub async fn require_login(&self) -> Result<UserProfile, CliError> {
        self.require(&RouteGuard::authenticated()).await
    }

    pub async fn require_admin(&self) -> Result<UserProfile, CliError> {
        self.require(&RouteGuard::require(Role::admin())).await
    }

    /// Unwrap an `ApiResult`. A failure that triggered a redirect becomes
    /// that redirect's error; anything else has already been shown.
    pub fn finish<T>(&self, result: ApiResult<T>) -> Result<Option<T>, CliError> {
        match result {
            ApiResult::Success { data } => Ok(data),
            ApiResult::Failure { error } => match self.navigator.take() {
                Some(to) => Err(redirect_error(to, None)),
                None => Err(CliError::RequestFailed { message: error }),
            },
        }
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.gateway.notifier().as_ref()
    }

    pub fn print(&self, rendered: &str) {
        output::print_output(rendered, self.quiet);
    }
}

pub async fn dispatch(cmd: Command, ctx: &Ctx) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(args, ctx).await,
        Command::Logout => {
            auth::logout(ctx);
            Ok(())
        }
        Command::Register(args) => auth::register(args, ctx).await,
        Command::Whoami { refresh } => auth::whoami(refresh, ctx).await,
        Command::Profile(args) => auth::profile(args, ctx).await,
        Command::Sensors(args) => sensors::handle(args, ctx).await,
        Command::Subscriptions(args) => subscriptions::handle(args, ctx).await,
        Command::Requests(args) => requests::handle(args, ctx).await,
        Command::Users(args) => users::handle(args, ctx).await,
        // Handled before a context exists.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
