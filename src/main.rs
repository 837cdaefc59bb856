// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use crossterm::event::{Event, KeyEventKind};
use tracing::{info, warn, Level};

use keydrill::config::{ConfigEvent, ConfigWatcher, RootSetting, TrainerFile};
use keydrill::midi::{self, NoteScript, NoteSource};
use keydrill::music::pitch::pitch_label;
use keydrill::practice::ConsoleDisplay;
use keydrill::ui::{App, UiHandle, UiState};
use keydrill::{DisplaySurface, Mode, Session, SessionSettings};

fn print_usage() {
    println!("keydrill - MIDI scale and chord trainer");
    println!();
    println!("Usage: keydrill [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <FILE>      Load settings (YAML or TOML); reloaded on change");
    println!("  --mode <MODE>        scales or chords (default: scales)");
    println!("  --root <NOTE>        Starting root, e.g. A3 or Eb4");
    println!("  --seed <N>           Seed for reproducible roots and chords");
    println!("  --source <N>         MIDI source index (default 0)");
    println!("  --device <NAME>      MIDI source whose name contains NAME");
    println!("  --script <FILE>      Play notes from a script instead of a device");
    println!("  --tui                Full-screen terminal display");
    println!("  --list-sources       List available MIDI sources (inputs)");
    println!("  --verbose            Log every note event");
    println!("  --quiet              Only log warnings");
    println!("  --help               Show this help message");
}

/// Command-line options
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    mode: Option<Mode>,
    root: Option<String>,
    seed: Option<u64>,
    source: Option<usize>,
    device: Option<String>,
    script: Option<PathBuf>,
    tui: bool,
    list_sources: bool,
    help: bool,
    log_level: Option<Level>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut options = Options::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut value = |name: &str| {
                iter.next()
                    .cloned()
                    .ok_or_else(|| anyhow!("{} requires a value", name))
            };
            match arg.as_str() {
                "--config" => options.config = Some(PathBuf::from(value("--config")?)),
                "--mode" => {
                    options.mode = Some(value("--mode")?.parse().map_err(|e| anyhow!("{}", e))?)
                }
                "--root" => options.root = Some(value("--root")?),
                "--seed" => {
                    let seed = value("--seed")?;
                    options.seed = Some(
                        seed.parse()
                            .map_err(|_| anyhow!("Invalid seed: {}", seed))?,
                    );
                }
                "--source" => {
                    let source = value("--source")?;
                    options.source = Some(
                        source
                            .parse()
                            .map_err(|_| anyhow!("Invalid source number: {}", source))?,
                    );
                }
                "--device" => options.device = Some(value("--device")?),
                "--script" => options.script = Some(PathBuf::from(value("--script")?)),
                "--tui" => options.tui = true,
                "--list-sources" => options.list_sources = true,
                "--verbose" => options.log_level = Some(Level::DEBUG),
                "--quiet" => options.log_level = Some(Level::WARN),
                "--help" | "-h" => options.help = true,
                other => bail!("Unknown option: {} (try --help)", other),
            }
        }

        Ok(options)
    }

    /// Fold command-line overrides into the file settings
    fn apply_to(&self, file: &mut TrainerFile) {
        if let Some(mode) = self.mode {
            file.session.mode = mode;
        }
        if let Some(root) = &self.root {
            file.session.root = root.clone();
            file.session.root_setting = None;
        }
        if self.seed.is_some() {
            file.session.seed = self.seed;
        }
        if self.source.is_some() {
            file.midi.source = self.source;
            file.midi.device = None;
        }
        if self.device.is_some() {
            file.midi.device = self.device.clone();
        }
    }
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn open_input(options: &Options, file: &TrainerFile) -> Result<Box<dyn NoteSource>> {
    if let Some(path) = &options.script {
        return Ok(Box::new(NoteScript::load(path)?));
    }
    let index = match (&file.midi.device, file.midi.source) {
        (Some(name), _) => midi::find_source(name)?,
        (None, Some(index)) => index,
        (None, None) => 0,
    };
    info!(index, "opening MIDI source");
    midi::open_source(index)
}

fn open_watcher(options: &Options) -> Option<ConfigWatcher> {
    let path = options.config.as_ref()?;
    match ConfigWatcher::new(path, None) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!("config changes will not be picked up: {:#}", e);
            None
        }
    }
}

fn start_session<D: DisplaySurface>(
    settings: SessionSettings,
    display: D,
    seed: Option<u64>,
) -> Session<D> {
    match seed {
        Some(seed) => Session::seeded(settings, display, seed),
        None => Session::new(settings, display),
    }
}

/// Apply reloaded config files; only the chords-mode root is live
fn apply_config_events<D: DisplaySurface>(
    session: &mut Session<D>,
    watcher: Option<&ConfigWatcher>,
) -> Option<RootSetting> {
    let watcher = watcher?;
    let mut controls = None;

    for event in watcher.recv_all() {
        match event {
            ConfigEvent::Reloaded(file) => {
                if file.session.mode != session.mode() {
                    warn!(
                        configured = %file.session.mode,
                        running = %session.mode(),
                        "mode changes take effect on restart"
                    );
                }
                if session.mode() != Mode::Chords {
                    continue;
                }
                match file.session.root_pitch() {
                    Ok(root) if root != session.state().root => {
                        session.change_root(root);
                        controls = file.session.root_picker().ok();
                    }
                    Ok(_) => {}
                    Err(e) => warn!("ignoring reloaded config: {:#}", e),
                }
            }
            ConfigEvent::Error(message) => warn!("{}", message),
        }
    }

    controls
}

fn run_console(
    settings: SessionSettings,
    seed: Option<u64>,
    mut input: Box<dyn NoteSource>,
    watcher: Option<ConfigWatcher>,
) -> Result<()> {
    let mut session = start_session(settings, ConsoleDisplay, seed);

    loop {
        for event in input.poll() {
            session.handle(&event);
        }
        apply_config_events(&mut session, watcher.as_ref());

        if input.is_exhausted() {
            break;
        }
        thread::sleep(Duration::from_millis(1));
    }

    let state = session.state();
    info!(
        root = %pitch_label(state.root),
        correct = state.correct,
        "input finished"
    );
    Ok(())
}

fn run_tui(
    settings: SessionSettings,
    root_controls: RootSetting,
    seed: Option<u64>,
    mut input: Box<dyn NoteSource>,
    watcher: Option<ConfigWatcher>,
) -> Result<()> {
    let handle = UiHandle::new(UiState::new(settings.mode, root_controls));
    let mut session = start_session(settings, handle.clone(), seed);
    let mut app = App::new(handle.clone())?;

    while app.is_running() {
        for event in input.poll() {
            session.handle(&event);
            handle.lock().record_event(&event, session.held_notes());
        }

        if let Some(controls) = apply_config_events(&mut session, watcher.as_ref()) {
            handle.lock().root_controls = controls;
        }

        if let Some(Event::Key(key)) = app.poll_event()? {
            if key.kind == KeyEventKind::Press {
                let action = app.handle_key(key.code, key.modifiers);
                let new_root = handle.lock().apply_root_key(&action);
                if let Some(root) = new_root {
                    session.change_root(root);
                }
            }
        }

        app.draw()?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = Options::parse(&args)?;

    if options.help {
        print_usage();
        return Ok(());
    }
    if options.list_sources {
        midi::print_sources();
        return Ok(());
    }

    // The terminal UI owns the screen; logs would tear it
    if !options.tui {
        init_logging(options.log_level.unwrap_or(Level::INFO));
    }

    let mut file = match &options.config {
        Some(path) => TrainerFile::load(path)?,
        None => TrainerFile::default(),
    };
    options.apply_to(&mut file);

    let settings = file.session.settings()?;
    let root_controls = file.session.root_picker()?;
    let seed = file.session.seed;

    let input = open_input(&options, &file)?;
    let watcher = open_watcher(&options);

    if options.tui {
        run_tui(settings, root_controls, seed, input, watcher)
    } else {
        run_console(settings, seed, input, watcher)
    }
}
