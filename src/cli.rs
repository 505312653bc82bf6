use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use canary::{FipsMode, Overrides};

#[derive(Parser, Debug)]
#[command(name = "canary", version, about = "Deployment pipeline fixture services")]
pub struct Cli {
    #[arg(long, short, global = true, env = "CANARY_CONFIG", help = "TOML config file")]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        short,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (-v debug, -vv trace)"
    )]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Echo request headers, query and body plus host facts
    Echo(ServeArgs),
    /// Answer every request with "Hello World!"
    Hello(ServeArgs),
    /// Verify hash and cipher availability against the FIPS mode flag
    Fips(FipsArgs),
    /// Watch files and run a remote copy command on change
    Sync(SyncArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, help = "Listen address")]
    pub host: Option<String>,
    #[arg(long, help = "Listen port")]
    pub port: Option<u16>,
}

impl ServeArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            ..Default::default()
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FipsArgs {
    #[command(flatten)]
    pub serve: ServeArgs,
    #[arg(long, value_enum, help = "Where the FIPS mode flag comes from")]
    pub mode: Option<ModeArg>,
    #[arg(long, default_value_t = false, help = "Run the probe once and exit")]
    pub probe: bool,
}

impl FipsArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            fips_mode: self.mode.map(Into::into),
            ..self.serve.overrides()
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    System,
    Enabled,
    Disabled,
}

impl From<ModeArg> for FipsMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::System => FipsMode::System,
            ModeArg::Enabled => FipsMode::Enabled,
            ModeArg::Disabled => FipsMode::Disabled,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    #[arg(long, help = "Target pod substituted for {pod} in the command")]
    pub pod: Option<String>,
    #[arg(long, help = "Command template run on change")]
    pub command: Option<String>,
    #[arg(long, help = "Directory to watch")]
    pub dir: Option<PathBuf>,
    #[arg(long = "file", help = "File to watch, relative to --dir (repeatable)")]
    pub files: Vec<PathBuf>,
    #[arg(long = "glob", help = "Glob pattern to watch, relative to --dir (repeatable)")]
    pub globs: Vec<String>,
    #[arg(long, help = "Quiet period before running the command")]
    pub debounce_ms: Option<u64>,
}

impl SyncArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            pod: self.pod.clone(),
            ..Default::default()
        }
    }

    /// Apply the watch-specific flags on top of the loaded config.
    pub fn apply(&self, sync: &mut canary::config::Sync) {
        if let Some(command) = &self.command {
            sync.command = command.clone();
        }
        if let Some(dir) = &self.dir {
            sync.root = dir.clone();
        }
        if !self.files.is_empty() {
            sync.files = self.files.clone();
        } else if !self.globs.is_empty() {
            sync.files.clear();
        }
        if !self.globs.is_empty() {
            sync.patterns = self.globs.clone();
        }
        if let Some(ms) = self.debounce_ms {
            sync.debounce_ms = ms;
        }
    }
}
