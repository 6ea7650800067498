// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use cubby_app::{AppState, ListQuery};
use cubby_db::Store;
use runtime::{DbRuntime, FsImagePicker};
use std::env;
use std::path::{Path, PathBuf};

const MEMORY_DB: &str = ":memory:";

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse(env::args().skip(1))?;
    if options.action == Action::Help {
        print!("{}", help_text());
        return Ok(());
    }

    let config_path = match &options.config_path {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    match options.action {
        Action::PrintConfigPath => {
            println!("{}", config_path.display());
            return Ok(());
        }
        Action::PrintExampleConfig => {
            print!("{}", Config::example_config(&config_path));
            return Ok(());
        }
        _ => {}
    }

    let config = Config::load(&config_path).with_context(|| {
        format!(
            "load config {}; run `cubby --print-example-config` for a template",
            config_path.display()
        )
    })?;
    let db_path = resolve_db_path(&config, options.demo)?;
    if options.action == Action::PrintDbPath {
        println!("{}", db_path.display());
        return Ok(());
    }

    let log_path = logging::init(&config)?;
    tracing::info!(
        db_path = %db_path.display(),
        log_path = %log_path.display(),
        demo = options.demo,
        action = options.action.as_str(),
        "starting"
    );

    let store = open_store(&db_path, options.demo)?;
    if options.action == Action::Check {
        println!("{}", check_summary(&db_path, &store)?);
        return Ok(());
    }

    let mut state = AppState::default();
    let mut runtime = DbRuntime::new(&store, FsImagePicker);
    let query = ListQuery::with_sort(config.default_sort());
    let result = cubby_tui::run_app(&mut state, &mut runtime, query);
    if let Err(error) = &result {
        tracing::error!("terminal session failed: {error:#}");
    }
    result
}

/// What one invocation does. Everything except `Run` exits without
/// touching the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Action {
    #[default]
    Run,
    Check,
    PrintConfigPath,
    PrintDbPath,
    PrintExampleConfig,
    Help,
}

impl Action {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Check => "--check",
            Self::PrintConfigPath => "--print-config-path",
            Self::PrintDbPath => "--print-path",
            Self::PrintExampleConfig => "--print-example-config",
            Self::Help => "--help",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct CliOptions {
    /// `None` defers to `CUBBY_CONFIG_PATH` or the platform config dir.
    config_path: Option<PathBuf>,
    demo: bool,
    action: Action,
}

impl CliOptions {
    /// `--help` wins over anything else on the line; any other two
    /// different actions are rejected.
    fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut help = false;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            let requested = match arg {
                "--config" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--config needs a path, as --config <path>"))?;
                    options.set_config_path(value.as_ref())?;
                    continue;
                }
                "--demo" => {
                    options.demo = true;
                    continue;
                }
                "--help" | "-h" => {
                    help = true;
                    continue;
                }
                "--check" => Action::Check,
                "--print-config-path" => Action::PrintConfigPath,
                "--print-path" => Action::PrintDbPath,
                "--print-example-config" => Action::PrintExampleConfig,
                other => {
                    if let Some(value) = other.strip_prefix("--config=") {
                        options.set_config_path(value)?;
                        continue;
                    }
                    bail!("unrecognized argument {other:?}; see `cubby --help`");
                }
            };
            options.request(requested)?;
        }

        if help {
            options.action = Action::Help;
        }
        Ok(options)
    }

    fn set_config_path(&mut self, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            bail!("--config needs a non-empty path");
        }
        self.config_path = Some(PathBuf::from(value));
        Ok(())
    }

    fn request(&mut self, action: Action) -> Result<()> {
        if self.action != Action::Run && self.action != action {
            bail!(
                "{} and {} cannot be combined; pick one",
                self.action.as_str(),
                action.as_str()
            );
        }
        self.action = action;
        Ok(())
    }
}

fn help_text() -> String {
    format!(
        "\
cubby: household inventory in the terminal

usage: cubby [--config <path>] [--demo] [action]

options:
  --config <path>          config file (also --config=<path>)
  --demo                   in-memory database seeded with sample items

actions (at most one):
  --check                  load config, open and bootstrap the database, then exit
  --print-path             print the database path that would be opened
  --print-config-path      print the config path that would be read
  --print-example-config   print a commented config template
  -h, --help               show this help

environment:
  CUBBY_CONFIG_PATH        config file when --config is not given
  CUBBY_DB_PATH            database file when [storage].db_path is unset
  {}=<filter>         tracing filter, overrides [log].level
",
        logging::LOG_ENV
    )
}

/// Demo mode never touches the configured database.
fn resolve_db_path(config: &Config, demo: bool) -> Result<PathBuf> {
    if demo {
        return Ok(PathBuf::from(MEMORY_DB));
    }
    config.db_path()
}

fn open_store(db_path: &Path, demo: bool) -> Result<Store> {
    let store = if demo {
        Store::open_memory()?
    } else {
        Store::open(db_path).with_context(|| {
            format!(
                "open database {}; set [storage].db_path or CUBBY_DB_PATH to change it",
                db_path.display()
            )
        })?
    };
    store.bootstrap()?;
    if demo {
        store.seed_demo_data()?;
        tracing::debug!("demo data seeded");
    }
    Ok(store)
}

fn check_summary(db_path: &Path, store: &Store) -> Result<String> {
    let items = store.items().load_all()?.len();
    let categories = store.categories().names()?.len();
    Ok(format!(
        "ok: {} ({items} items, {categories} categories)",
        db_path.display()
    ))
}
