//! `portview` command line: render screens, manage stored preferences,
//! validate data and poke the API scaffold.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::aggregate;
use crate::api::{ApiClient, UserService};
use crate::catalog::Catalog;
use crate::error::{DashboardError, ErrorPayload};
use crate::preferences::{PreferenceStore, SettingsPatch, Theme, UserPatch};
use crate::render::render_screen;
use crate::services::build_screen;
use crate::state::{self, reduce, Action, AppState, LoadingKey, PortfolioView, Tab};
use crate::types::{Config, RegionCode};

/// Bearer token for `api` subcommands.
pub const API_TOKEN_ENV: &str = "PORTVIEW_API_TOKEN";

/// Portfolio dashboard renderer.
///
/// Builds the overview, region, project, portfolio and projects screens from
/// portfolio data and writes them as SVG or JSON.
#[derive(Parser, Debug)]
#[command(name = "portview", version, about)]
pub struct Cli {
    /// Output format for screens.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout.
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// Portfolio data file (defaults to the embedded fixture).
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Svg,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Region chips, phase counts and portfolio headline numbers.
    Overview,
    /// One region, optionally narrowed to a business entity.
    Region {
        /// Region code (AMR, SCO, EUR, AFR, MEA, APAC).
        code: RegionCode,
        /// Business entity ID within the region.
        #[arg(long)]
        entity: Option<String>,
    },
    /// Project detail.
    Project { id: String },
    /// Spent donut and schedule status.
    Portfolio,
    /// AFE bar charts.
    Projects,
    /// Stored user and settings.
    User,
    /// Inspect or change stored preferences.
    #[command(subcommand)]
    Prefs(PrefsCommand),
    /// Load and validate portfolio data; report count discrepancies.
    Validate,
    /// Calls against the portfolio API.
    #[command(subcommand)]
    Api(ApiCommand),
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommand {
    Show,
    SetUser(SetUserArgs),
    Logout,
    Settings(SettingsArgs),
    Reset,
}

#[derive(Args, Debug)]
pub struct SetUserArgs {
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub authenticated: Option<bool>,
}

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,
    #[arg(long)]
    pub language: Option<String>,
    #[arg(long)]
    pub notifications: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::System => Theme::System,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ApiCommand {
    /// Fetch the signed-in user and store it in preferences.
    Whoami,
}

// =============================================================================
// Dispatch
// =============================================================================

/// Loaded once per invocation.
struct Context {
    config: Config,
    prefs: PreferenceStore,
}

impl Context {
    fn load() -> Result<Self, DashboardError> {
        let dir = state::state_dir().map_err(DashboardError::ConfigurationError)?;
        let config = state::load_config(&dir).map_err(DashboardError::ConfigurationError)?;
        Ok(Self {
            config,
            prefs: PreferenceStore::in_dir(&dir),
        })
    }

    fn catalog(&self, data: Option<&Path>) -> Result<Catalog, DashboardError> {
        let configured = self.config.data_path.as_deref().map(Path::new);
        Catalog::load(data.or(configured))
    }

    fn app_state(&self) -> Result<AppState, DashboardError> {
        Ok(AppState::with_preferences(self.prefs.load()?))
    }
}

/// The actions that take a fresh state to the screen a command asks for.
pub fn screen_actions(command: &Commands) -> Option<Vec<Action>> {
    let actions = match command {
        Commands::Overview => vec![Action::SelectTab(Tab::Overview)],
        Commands::Region { code, entity } => {
            let mut actions = vec![Action::SelectTab(Tab::Map), Action::SelectRegion(Some(*code))];
            if let Some(id) = entity {
                actions.push(Action::SelectEntity(Some(id.clone())));
            }
            actions
        }
        Commands::Project { id } => vec![Action::SelectProject(Some(id.clone()))],
        Commands::Portfolio => vec![
            Action::SelectTab(Tab::Portfolio),
            Action::SelectPortfolioView(PortfolioView::Portfolio),
        ],
        Commands::Projects => vec![
            Action::SelectTab(Tab::Portfolio),
            Action::SelectPortfolioView(PortfolioView::Projects),
        ],
        Commands::User => vec![Action::SelectTab(Tab::User)],
        Commands::Prefs(_) | Commands::Validate | Commands::Api(_) => return None,
    };
    Some(actions)
}

pub fn execute(cli: Cli) -> Result<(), DashboardError> {
    let ctx = Context::load()?;

    if let Some(actions) = screen_actions(&cli.command) {
        let catalog = ctx.catalog(cli.data.as_deref())?;
        let state = actions
            .into_iter()
            .fold(ctx.app_state()?, |state, action| reduce(&state, action));
        let screen = build_screen(&catalog, &ctx.config.chart, &state)?;
        let output = match cli.format {
            OutputFormat::Svg => render_screen(&screen),
            OutputFormat::Json => to_json(&screen)?,
        };
        return emit(cli.out.as_deref(), &output);
    }

    match cli.command {
        Commands::Prefs(cmd) => run_prefs(&ctx, cmd, cli.out.as_deref()),
        Commands::Validate => {
            run_validate(&ctx, cli.data.as_deref(), cli.format, cli.out.as_deref())
        }
        Commands::Api(ApiCommand::Whoami) => run_whoami(&ctx, cli.out.as_deref()),
        _ => Ok(()),
    }
}

fn run_prefs(ctx: &Context, cmd: PrefsCommand, out: Option<&Path>) -> Result<(), DashboardError> {
    let current = ctx.app_state()?;
    let action = match cmd {
        PrefsCommand::Show => return emit(out, &to_json(&current.preferences)?),
        PrefsCommand::SetUser(args) => Action::SetUser(UserPatch {
            id: args.id,
            name: args.name,
            email: args.email,
            is_authenticated: args.authenticated,
        }),
        PrefsCommand::Logout => Action::Logout,
        PrefsCommand::Settings(args) => Action::UpdateSettings(SettingsPatch {
            theme: args.theme.map(Theme::from),
            language: args.language,
            notifications: args.notifications,
        }),
        PrefsCommand::Reset => {
            ctx.prefs.clear()?;
            log::info!("Cleared stored preferences");
            let reset = reduce(&current, Action::Reset);
            return emit(out, &to_json(&reset.preferences)?);
        }
    };

    let next = reduce(&current, action);
    ctx.prefs.save(&next.preferences)?;
    log::info!("Saved preferences to {}", ctx.prefs.path().display());
    emit(out, &to_json(&next.preferences)?)
}

fn run_validate(
    ctx: &Context,
    data: Option<&Path>,
    format: OutputFormat,
    out: Option<&Path>,
) -> Result<(), DashboardError> {
    let catalog = ctx.catalog(data)?;
    let discrepancies = aggregate::count_discrepancies(&catalog);

    let output = match format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "regions": catalog.regions().len(),
            "entities": catalog.entities().len(),
            "projects": catalog.projects().len(),
            "discrepancies": discrepancies,
        }))?,
        OutputFormat::Svg => {
            let mut text = format!(
                "ok: {} regions, {} entities, {} projects\n",
                catalog.regions().len(),
                catalog.entities().len(),
                catalog.projects().len()
            );
            for gap in &discrepancies {
                text.push_str(&format!(
                    "reported count differs for {:?}: reported {}, found {}\n",
                    gap.scope, gap.reported, gap.derived
                ));
            }
            text
        }
    };
    emit(out, &output)
}

fn run_whoami(ctx: &Context, out: Option<&Path>) -> Result<(), DashboardError> {
    let mut client = ApiClient::from_config(&ctx.config)?;
    if let Some(token) = std::env::var(API_TOKEN_ENV).ok().filter(|t| !t.is_empty()) {
        client = client.with_token(token);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| DashboardError::ConfigurationError(format!("Async runtime: {}", e)))?;

    let state = reduce(&ctx.app_state()?, Action::SetLoading(LoadingKey::Auth, true));
    let mut service = UserService::new(client);
    let user = runtime.block_on(service.current_user())?;

    let state = reduce(&state, Action::SetUser(user.to_patch()));
    let state = reduce(&state, Action::SetLoading(LoadingKey::Auth, false));
    ctx.prefs.save(&state.preferences)?;
    log::info!("Signed in as {}", user.email);

    emit(out, &to_json(&user)?)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, DashboardError> {
    serde_json::to_string_pretty(value)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| DashboardError::ParseError(format!("Serialize error: {}", e)))
}

fn emit(out: Option<&Path>, content: &str) -> Result<(), DashboardError> {
    match out {
        Some(path) => {
            fs::write(path, content).map_err(|e| {
                DashboardError::IoError(format!("Failed to write {}: {}", path.display(), e))
            })?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Print an error the way JSON consumers expect it.
pub fn report_error(err: &DashboardError) {
    log::error!("{}", err);
    let payload = ErrorPayload::from(err);
    match serde_json::to_string_pretty(&payload) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_region_with_entity() {
        let cli = Cli::try_parse_from(["portview", "region", "amr", "--entity", "santos"]).unwrap();
        match cli.command {
            Commands::Region { code, entity } => {
                assert_eq!(code, RegionCode::Amr);
                assert_eq!(entity.as_deref(), Some("santos"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(cli.format, OutputFormat::Svg);
    }

    #[test]
    fn test_rejects_unknown_region() {
        assert!(Cli::try_parse_from(["portview", "region", "XYZ"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["portview", "portfolio", "--format", "json", "--out", "p.json"])
                .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.out, Some(PathBuf::from("p.json")));
    }

    #[test]
    fn test_prefs_settings_args() {
        let cli = Cli::try_parse_from([
            "portview",
            "prefs",
            "settings",
            "--theme",
            "dark",
            "--notifications",
            "false",
        ])
        .unwrap();
        match cli.command {
            Commands::Prefs(PrefsCommand::Settings(args)) => {
                assert_eq!(args.theme, Some(ThemeArg::Dark));
                assert_eq!(args.notifications, Some(false));
                assert!(args.language.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_region_actions_select_entity_last() {
        let cmd = Commands::Region {
            code: RegionCode::Amr,
            entity: Some("callao".into()),
        };
        let state = screen_actions(&cmd)
            .unwrap()
            .into_iter()
            .fold(AppState::default(), |s, a| reduce(&s, a));
        assert_eq!(state.tab, Tab::Map);
        assert_eq!(state.selection.region, Some(RegionCode::Amr));
        assert_eq!(state.selection.entity_id.as_deref(), Some("callao"));
    }

    #[test]
    fn test_non_screen_commands_have_no_actions() {
        assert!(screen_actions(&Commands::Validate).is_none());
        assert!(screen_actions(&Commands::Prefs(PrefsCommand::Show)).is_none());
    }

    #[test]
    fn test_emit_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        emit(Some(path.as_path()), "<svg/>").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "<svg/>");
    }
}
