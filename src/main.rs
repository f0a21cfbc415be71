mod app;
mod command;
mod config;
mod consts;
mod game;
mod highscores;
mod menu;
mod scoreboard;
mod sim;
mod util;
use crate::app::App;
use crate::config::Config;
use crate::sim::PausePolicy;
use crate::util::Globals;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use log::{info, LevelFilter};
use simplelog::WriteLogger;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

static USAGE: &str = concat!(
    "Usage: gridsnake [<options>]\n",
    "\n",
    "Play snake in the terminal on a board that follows the window size\n",
    "\n",
    "Options:\n",
    "  -c, --config <path>         Read configuration from <path>\n",
    "  -n, --name <name>           Record high scores under <name>\n",
    "  -t, --ticks-per-second <n>  Move the snake <n> times a second\n",
    "  -p, --pause-policy <policy> What to do with time that passes while\n",
    "                              paused: \"drain\" or \"reset\"\n",
    "      --log-file <path>       Write log messages to <path>\n",
    "      --log-level <level>     Log level: off, error, warn, info, debug,\n",
    "                              or trace [default: info]\n",
    "  -h, --help                  Show this help message and exit\n",
    "  -V, --version               Show the program version and exit\n",
);

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    name: Option<String>,
    ticks_per_second: Option<u32>,
    pause_policy: Option<PausePolicy>,
    log_file: Option<PathBuf>,
    log_level: Option<LevelFilter>,
}

impl Arguments {
    fn run(self) -> anyhow::Result<()> {
        let mut config = match self.config {
            Some(ref path) => Config::load(path, false),
            None => Config::load(&Config::default_path()?, true),
        }
        .context("failed to load configuration")?;
        if let Some(tps) = self.ticks_per_second {
            config.game.ticks_per_second = tps;
        }
        if let Some(policy) = self.pause_policy {
            config.game.pause_policy = policy;
        }
        if let Some(path) = self.log_file {
            config.files.log_file = Some(path);
        }
        init_logging(
            config.log_file().as_deref(),
            self.log_level.unwrap_or(LevelFilter::Info),
        );
        info!(
            "Starting {} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        let globals = Globals::new(config, self.name.as_deref());
        let terminal = ratatui::init();
        let r = App::new(globals).run(terminal);
        ratatui::restore();
        info!("Exiting");
        r.map_err(Into::into)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum CliAction {
    Run(Arguments),
    Help,
    Version,
}

impl CliAction {
    fn from_parser(mut parser: Parser) -> Result<CliAction, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('n') | Arg::Long("name") => {
                    args.name = Some(parser.value()?.string()?);
                }
                Arg::Short('t') | Arg::Long("ticks-per-second") => {
                    args.ticks_per_second = Some(parser.value()?.parse()?);
                }
                Arg::Short('p') | Arg::Long("pause-policy") => {
                    args.pause_policy = Some(parser.value()?.parse()?);
                }
                Arg::Long("log-file") => {
                    args.log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-level") => {
                    args.log_level = Some(parser.value()?.parse()?);
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(CliAction::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(CliAction::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(CliAction::Run(args))
    }
}

/// Send log messages to `path`.  If the file can't be opened, the game runs
/// without logging.
fn init_logging(path: Option<&Path>, level: LevelFilter) {
    if level == LevelFilter::Off {
        return;
    }
    let Some(path) = path else {
        eprintln!("gridsnake: could not determine log file path; logging disabled");
        return;
    };
    let file = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or(Ok(()), fs_err::create_dir_all)
        .and_then(|()| fs_err::File::create(path));
    match file {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(level, simplelog::Config::default(), file) {
                eprintln!("gridsnake: failed to set up logging: {e}");
            }
        }
        Err(e) => eprintln!("gridsnake: logging disabled: {e}"),
    }
}

fn main() -> ExitCode {
    match CliAction::from_parser(Parser::from_env()) {
        Ok(CliAction::Run(args)) => exit(args.run()),
        Ok(CliAction::Help) => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(CliAction::Version) => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("gridsnake: {e}");
            ExitCode::from(2)
        }
    }
}

fn exit(r: anyhow::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_broken_pipe(&e) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("gridsnake: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn is_broken_pipe(e: &anyhow::Error) -> bool {
    e.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe)
}
