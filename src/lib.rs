//! Build-option resolution.
//!
//! Options are declared once in a [`Registry`] and resolved onto a settings
//! value from parsed command-line switches and `key=value` properties. The
//! command line wins over properties, every applied value records its
//! [`Origin`], and a pass either applies completely or not at all.

pub mod catalog;
pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod help;
pub mod option;
pub mod origin;
pub mod paths;
pub mod properties;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod settings;
pub mod source;

pub use buildopt_args::{CommandLineParser, OptionSpec, ParseError};
pub use catalog::{start_parameter_options, start_parameter_registry};
pub use descriptor::{CommandLineOptionConfiguration, Multiplicity};
pub use diagnostics::{DiagnosticsSink, Notice, NoticeKind, TracingSink};
pub use error::{Error, Result};
pub use option::{BuildOption, KindTag, OptionKind, ResolvedValue};
pub use origin::Origin;
pub use paths::{BaseDirectoryResolver, PathResolver};
pub use properties::{EffectiveProperties, PropertiesError, PropertyLayer};
pub use registry::Registry;
pub use report::EffectiveSettings;
pub use resolver::{Resolution, ResolutionReport, Resolver};
pub use settings::StartParameter;
pub use source::{ArgumentSource, ParsedCommandLine, PropertySource, Switch};

/// Install the stderr `fmt` subscriber. `RUST_LOG` overrides the default
/// `buildopt=info` filter.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("buildopt=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
