//! buildopt CLI
//!
//! Entry point for the `buildopt` command-line tool.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::process;

use buildopt::help::{render_option, render_usage, summarize};
use buildopt::properties::PROPERTIES_FILE;
use buildopt::{
    start_parameter_registry, BaseDirectoryResolver, CommandLineParser, EffectiveProperties,
    EffectiveSettings, OptionSpec, ParsedCommandLine, Registry, Resolver, StartParameter,
    TracingSink,
};
use clap::{Parser, Subcommand};

/// Long name of the `-D` switch.
const SYSTEM_PROP: &str = "system-prop";

#[derive(Parser)]
#[command(name = "buildopt")]
#[command(about = "Resolve build start parameters from switches and gradle.properties", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every build option
    Options {
        /// Output option descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details for one option
    Explain {
        /// Long option name, with or without leading dashes
        name: String,
    },

    /// Resolve build arguments into effective start parameters
    Resolve {
        /// Project directory (default: current directory)
        #[arg(long)]
        project_dir: Option<PathBuf>,

        /// Gradle user home (default: $GRADLE_USER_HOME or ~/.gradle)
        #[arg(long)]
        user_home: Option<PathBuf>,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,

        /// Build arguments (after --)
        #[arg(last = true)]
        args: Vec<String>,
    },
}

fn main() {
    buildopt::init_tracing();
    let cli = Cli::parse();

    let registry = match start_parameter_registry() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error building option registry: {}", e);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Options { json } => run_options(&registry, json),
        Commands::Explain { name } => run_explain(&registry, &name),
        Commands::Resolve {
            project_dir,
            user_home,
            human,
            args,
        } => run_resolve(&registry, project_dir, user_home, human, &args),
    }
}

fn run_options(registry: &Registry<StartParameter>, json: bool) {
    if !json {
        print!("{}", render_usage(registry));
        return;
    }

    match serde_json::to_string_pretty(&summarize(registry)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn run_explain(registry: &Registry<StartParameter>, name: &str) {
    let long = name.trim_start_matches('-');
    let option = registry
        .find(long)
        .or_else(|| registry.find_by_property(name));

    match option {
        Some(option) => print!("{}", render_option(option)),
        None => {
            eprintln!("Unknown build option '{}'.", name);
            process::exit(1);
        }
    }
}

fn run_resolve(
    registry: &Registry<StartParameter>,
    project_dir: Option<PathBuf>,
    user_home: Option<PathBuf>,
    human: bool,
    args: &[String],
) {
    let project_dir = match project_dir.map_or_else(env::current_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error reading current directory: {}", e);
            process::exit(1);
        }
    };
    let user_home = user_home.or_else(default_user_home);

    let mut parser = CommandLineParser::new();
    registry.configure_parser(&mut parser);
    parser.option(
        OptionSpec::new(SYSTEM_PROP)
            .short('D')
            .repeatable()
            .description("Set system property of the JVM (e.g. -Dmyprop=myvalue)."),
    );

    let parsed = match parser.parse(args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let system_props = match system_properties(&parsed) {
        Ok(props) => props,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let project_file = project_dir.join(PROPERTIES_FILE);
    let user_home_file = user_home.as_deref().map(|home| home.join(PROPERTIES_FILE));
    let properties = match EffectiveProperties::build(
        Some(project_file.as_path()),
        user_home_file.as_deref(),
        &system_props,
    ) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error loading properties: {}", e);
            process::exit(1);
        }
    };

    let paths = BaseDirectoryResolver::new(&project_dir);
    let mut sink = TracingSink;
    let mut params = StartParameter::new(&project_dir);
    let mut resolver = Resolver::new(&paths, &mut sink);
    let report = match resolver.resolve(registry, &parsed, &properties, &mut params) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let tasks = parsed.extra_arguments.clone();
    let settings = EffectiveSettings::new(params, tasks, report, &properties);
    if human {
        print!("{}", settings.to_human());
        return;
    }
    match settings.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

/// `-Dkey=value` switches. A bare `-Dkey` sets an empty value.
fn system_properties(parsed: &ParsedCommandLine) -> Result<BTreeMap<String, String>, String> {
    let mut props = BTreeMap::new();
    for raw in parsed.values(SYSTEM_PROP) {
        let (key, value) = raw.split_once('=').unwrap_or((raw, ""));
        if key.trim().is_empty() {
            return Err(format!("Invalid system property '{}': missing key.", raw));
        }
        props.insert(key.trim().to_string(), value.to_string());
    }
    Ok(props)
}

fn default_user_home() -> Option<PathBuf> {
    if let Some(home) = env::var_os("GRADLE_USER_HOME") {
        return Some(PathBuf::from(home));
    }
    env::var_os("HOME").map(|home| Path::new(&home).join(".gradle"))
}
