use clap::{Args, Parser, Subcommand, ValueEnum};
use config_overlay::config::{ConfigError, LogFormat, LoggingConfig, Settings, SettingsLoader};
use config_overlay::{
    AppSettings, ConfigurationResolver, OverrideType, SectionStore, TomlSectionStore,
};
use std::error::Error;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "config-overlay",
    version,
    about = "Resolve a configuration document from a global section plus one override section.",
    long_about = "Reads a TOML document whose tables are configuration sections, starts from the global section and applies at most one override section chosen by environment variable, app setting or machine name."
)]
struct Cli {
    /// Settings file for this tool. Defaults to the standard search locations.
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve and print the configuration.
    Resolve(ResolveArgs),
    /// List the sections in the section file.
    Sections(SectionsArgs),
    /// Print the effective tool settings.
    Settings,
}

#[derive(Args, Debug)]
struct ResolveArgs {
    /// Override key: an environment variable name or app setting key.
    key: Option<String>,

    /// TOML file whose tables are the configuration sections.
    #[arg(long, value_name = "FILE")]
    sections: Option<PathBuf>,

    /// Flat TOML file of app settings.
    #[arg(long, value_name = "FILE")]
    app_settings: Option<PathBuf>,

    /// Extra app setting, may be repeated.
    #[arg(long = "app-setting", value_name = "KEY=VALUE", value_parser = AppSettings::parse_pair)]
    app_setting: Vec<(String, String)>,

    /// Name of the global section.
    #[arg(long, value_name = "NAME")]
    global: Option<String>,

    /// Override selection: chain, env, machine-name or app-setting.
    #[arg(long, value_parser = parse_override_type)]
    mode: Option<OverrideType>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Toml)]
    format: OutputFormat,

    /// Report on stderr which override was applied.
    #[arg(long)]
    explain: bool,
}

#[derive(Args, Debug)]
struct SectionsArgs {
    /// TOML file whose tables are the configuration sections.
    #[arg(long, value_name = "FILE")]
    sections: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Toml,
    Json,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let loader = match cli.settings {
        Some(ref path) => SettingsLoader::load_from(path)?,
        None => SettingsLoader::load()?,
    };
    init_logging(&loader.settings().logging);
    debug!("Settings file: {:?}", loader.settings_path);

    let settings = loader.into_settings();
    match cli.command {
        Command::Resolve(args) => run_resolve(&settings, args),
        Command::Sections(args) => run_sections(&settings, args),
        Command::Settings => {
            print!("{}", toml::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

fn run_resolve(settings: &Settings, args: ResolveArgs) -> Result<(), Box<dyn Error>> {
    let store = load_store(settings, args.sections)?;

    let mut app_settings = match args
        .app_settings
        .or_else(|| settings.sources.app_settings_file.clone())
    {
        Some(path) => AppSettings::load_from(path)?,
        None => AppSettings::new(),
    };
    for (key, value) in args.app_setting {
        app_settings.insert(key, value);
    }

    let resolver = ConfigurationResolver::<toml::Table>::builder(store)
        .app_settings(app_settings)
        .global_section(
            args.global
                .unwrap_or_else(|| settings.resolver.global_section.clone()),
        )
        .override_type(args.mode.unwrap_or(settings.resolver.override_type))
        .build()?;

    let key = args
        .key
        .or_else(|| settings.resolver.override_key.clone())
        .unwrap_or_default();
    let resolved = resolver.resolve_detailed(&key)?;

    if args.explain {
        match &resolved.applied {
            Some(applied) => eprintln!(
                "applied section '{}' from {}",
                applied.section, applied.source
            ),
            None => eprintln!(
                "no override applied; using '{}' only",
                resolver.global_section_name()
            ),
        }
    }

    let rendered = match args.format {
        OutputFormat::Toml => toml::to_string_pretty(&resolved.model)?,
        OutputFormat::Json => serde_json::to_string_pretty(&resolved.model)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn run_sections(settings: &Settings, args: SectionsArgs) -> Result<(), Box<dyn Error>> {
    let store = load_store(settings, args.sections)?;
    for name in store.section_names() {
        println!("{name}");
    }
    Ok(())
}

fn load_store(
    settings: &Settings,
    path: Option<PathBuf>,
) -> Result<TomlSectionStore, Box<dyn Error>> {
    let path = path
        .or_else(|| settings.sources.sections_file.clone())
        .ok_or(ConfigError::MissingSectionsFile)?;
    Ok(TomlSectionStore::load_from(path)?)
}

fn parse_override_type(raw: &str) -> Result<OverrideType, String> {
    raw.parse::<OverrideType>().map_err(|e| format!("{e}"))
}

/// Logs go to stderr so resolved output on stdout stays clean.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}
