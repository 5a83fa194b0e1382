mod config;
mod files;

use std::path::PathBuf;

use annotator::engine::{Action, SessionCore};
use annotator::export::{ExportError, ExportFormat};
use annotator::interfaces::InterfacesFile;
use annotator::viewer::{Lang, Side, ViewerError, ViewerState};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, warn};

use crate::config::{Config, ConfigError};
use crate::files::{DirSource, FileError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    File(#[from] FileError),
    #[error("{0}")]
    Rejected(String),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
    #[error(transparent)]
    Viewer(#[from] ViewerError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no interface numbered {0}")]
    UnknownInterface(String),
    #[error("pass either --data or --data-dir")]
    MissingData,
}

#[derive(Parser, Debug)]
#[command(name = "boardmark", about = "Annotate SBC board diagrams and build viewer data")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Load a diagram, apply annotations and commands, write exports.
    Export(ExportArgs),
    /// Load a diagram, apply commands, print every resulting action as JSON.
    Replay(SessionArgs),
    /// Print the viewer legend for one side of a board.
    Legend(ViewerArgs),
    /// Print the viewer info panel for one interface.
    Show {
        #[command(flatten)]
        viewer: ViewerArgs,
        /// Interface number, as in the click layer's `data-id`.
        id: String,
    },
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Board diagram to annotate.
    #[arg(long)]
    svg: PathBuf,

    /// Annotations file to restore (a previous `-annotations.json` export).
    #[arg(long)]
    annotations: Option<PathBuf>,

    /// JSON-lines file of session commands to replay.
    #[arg(long)]
    script: Option<PathBuf>,

    /// First annotation number (1-999).
    #[arg(long)]
    start_number: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Visible,
    Invisible,
    Interfaces,
    Annotations,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Visible => Self::VisibleSvg,
            FormatArg::Invisible => Self::InvisibleSvg,
            FormatArg::Interfaces => Self::Interfaces,
            FormatArg::Annotations => Self::Annotations,
        }
    }
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Output directory (overrides BOARDMARK_OUT_DIR).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Formats to write; all four when omitted.
    #[arg(long = "format", value_enum)]
    formats: Vec<FormatArg>,

    /// Leave the number markers out of the visible SVG.
    #[arg(long)]
    no_numbers: bool,

    /// Leave the click layer out of the visible SVG.
    #[arg(long)]
    no_click_layer: bool,
}

#[derive(Args, Debug)]
struct ViewerArgs {
    /// A single structured-data file (e.g. a `-sbc-interfaces.json` export).
    #[arg(long, conflicts_with = "data_dir")]
    data: Option<PathBuf>,

    /// Site root containing `data/{lang}/{board}.json`.
    #[arg(long, env = "BOARDMARK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[arg(long, default_value = "rock5t")]
    board: String,

    #[arg(long, default_value = "zh")]
    lang: String,

    #[arg(long, default_value = "front")]
    side: String,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    if let Err(err) = dotenvy::dotenv() {
        debug!(error = %err, "no .env loaded");
    }

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        CliCommand::Export(args) => run_export(&config, args),
        CliCommand::Replay(args) => run_replay(&config, &args),
        CliCommand::Legend(args) => run_legend(&args),
        CliCommand::Show { viewer, id } => run_show(&viewer, &id),
    }
}

// =============================================================================
// EDITOR
// =============================================================================

fn first_notice(actions: &[Action]) -> Option<&str> {
    actions.iter().find_map(|action| match action {
        Action::Notice { message } => Some(message.as_str()),
        _ => None,
    })
}

/// Build a session from the diagram and optional annotations. Every action
/// produced along the way is passed to `sink`.
fn open_session(
    config: &Config,
    args: &SessionArgs,
    mut sink: impl FnMut(&[Action]) -> Result<(), CliError>,
) -> Result<SessionCore, CliError> {
    let mut core = SessionCore::new();

    let svg = files::read_text(&args.svg)?;
    let loaded = core.load_svg(svg, files::file_name(&args.svg));
    if let Some(message) = first_notice(&loaded) {
        return Err(CliError::Rejected(format!("{}: {message}", args.svg.display())));
    }
    sink(&loaded)?;

    if let Some(path) = &args.annotations {
        let imported = core.import_annotations(&files::read_text(path)?);
        if let Some(message) = first_notice(&imported) {
            return Err(CliError::Rejected(format!("{}: {message}", path.display())));
        }
        sink(&imported)?;
    }

    if let Some(number) = args.start_number.or(config.start_number) {
        let actions = core.set_start_number(i64::from(number));
        if let Some(message) = first_notice(&actions) {
            return Err(CliError::Rejected(message.to_owned()));
        }
        sink(&actions)?;
    }

    if let Some(path) = &args.script {
        let commands = files::parse_script(path, &files::read_text(path)?)?;
        for (step, command) in commands.into_iter().enumerate() {
            let actions = core.dispatch(command);
            if let Some(message) = first_notice(&actions) {
                warn!(step = step + 1, message, "script command rejected");
            }
            sink(&actions)?;
        }
    }

    Ok(core)
}

fn run_export(config: &Config, args: ExportArgs) -> Result<(), CliError> {
    let mut core = open_session(config, &args.session, |_| Ok(()))?;

    let mut options = config.export;
    options.include_numbers &= !args.no_numbers;
    options.include_click_layer &= !args.no_click_layer;
    core.set_export_options(options);

    let formats: Vec<ExportFormat> = if args.formats.is_empty() {
        vec![ExportFormat::VisibleSvg, ExportFormat::InvisibleSvg, ExportFormat::Interfaces, ExportFormat::Annotations]
    } else {
        args.formats.into_iter().map(ExportFormat::from).collect()
    };

    let out_dir = args.out_dir.unwrap_or_else(|| config.out_dir.clone());
    for format in formats {
        let file = core.export_file(format)?;
        let path = files::write_export(&out_dir, &file)?;
        println!("{}", path.display());
    }
    Ok(())
}

fn run_replay(config: &Config, args: &SessionArgs) -> Result<(), CliError> {
    open_session(config, args, |actions| {
        for action in actions {
            println!("{}", serde_json::to_string(action)?);
        }
        Ok(())
    })?;
    Ok(())
}

// =============================================================================
// VIEWER
// =============================================================================

fn open_viewer(args: &ViewerArgs) -> Result<ViewerState, CliError> {
    let mut state = ViewerState::new();
    state.select_board(&args.board)?;
    state.set_lang(args.lang.parse::<Lang>()?);
    state.side = args.side.parse::<Side>()?;

    match (&args.data, &args.data_dir) {
        (Some(path), _) => state.set_interfaces(InterfacesFile::from_json(&files::read_text(path)?)?),
        (None, Some(root)) => {
            let loaded = state.load(&DirSource { root: root.clone() })?;
            if loaded != state.lang {
                warn!(board = state.board.id, "showing English data");
            }
        }
        (None, None) => return Err(CliError::MissingData),
    }
    Ok(state)
}

fn run_legend(args: &ViewerArgs) -> Result<(), CliError> {
    let state = open_viewer(args)?;
    println!("{} ({})", state.board.name, state.side);
    for item in state.legend() {
        println!("{:>4}  {}", item.number, item.name);
    }
    Ok(())
}

fn run_show(args: &ViewerArgs, id: &str) -> Result<(), CliError> {
    let state = open_viewer(args)?;
    let details = state.details(id).ok_or_else(|| CliError::UnknownInterface(id.to_owned()))?;
    println!("{}", details.name);
    if !details.description.is_empty() {
        println!("{}", details.description);
    }
    if !details.details.is_empty() {
        println!();
        println!("{}", details.details);
    }
    if !details.specs.is_empty() {
        println!();
        for (label, value) in &details.specs {
            println!("{label}: {value}");
        }
    }
    Ok(())
}
