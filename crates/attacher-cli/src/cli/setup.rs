use attacher::model::MapMode;
use attacher::placement::Vector3;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "attach",
    bin_name = "attach",
    version = get_version(),
    disable_help_subcommand = true,
    after_help = "Support references are written as <label>:<sub-element>, e.g. Box:Face1.\nA bare <label> refers to the whole object."
)]
#[command(about = "Inspect and edit attached placements", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available attach engines
    #[command(display_order = 1)]
    Engines,

    /// List attachment modes
    #[command(display_order = 2)]
    Modes,

    /// Write a sample document to start from
    #[command(display_order = 3)]
    Init {
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Load a document and show its attachment
    #[command(display_order = 4)]
    Show {
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change attachment attributes
    #[command(display_order = 5)]
    Set {
        path: PathBuf,

        #[command(flatten)]
        edits: Edits,

        /// Save the result back to the document
        #[arg(short, long)]
        write: bool,
    },

    /// Show the effective configuration
    #[command(display_order = 6)]
    Config {
        /// Print a commented template instead of the current values
        #[arg(long)]
        template: bool,
    },
}

/// Attribute edits, applied in declaration order.
#[derive(clap::Args, Debug, Default)]
pub struct Edits {
    /// Engine type name; an empty string removes the engine
    #[arg(long)]
    pub engine: Option<String>,

    /// Support reference (repeatable)
    #[arg(long = "support", value_name = "LABEL[:SUB]")]
    pub support: Vec<String>,

    /// Remove all support references
    #[arg(long, conflicts_with = "support")]
    pub clear_support: bool,

    /// Attachment mode
    #[arg(long)]
    pub mode: Option<MapMode>,

    /// Flip the attached Z axis
    #[arg(long)]
    pub reversed: Option<bool>,

    /// Position along the referenced curve
    #[arg(long, value_name = "T")]
    pub path_parameter: Option<f64>,

    /// Offset translation in the attached frame
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_vector)]
    pub offset: Option<Vector3>,
}

fn parse_vector(s: &str) -> Result<Vector3, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid number in '{}': {}", s, e))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(format!("expected three comma-separated numbers, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_with_edits() {
        let cli = Cli::try_parse_from([
            "attach",
            "set",
            "part.json",
            "--support",
            "Box:Face1",
            "--mode",
            "flatface",
            "--reversed",
            "true",
            "--offset",
            "0, 0, 2.5",
            "-w",
        ])
        .unwrap();

        match cli.command {
            Commands::Set { path, edits, write } => {
                assert_eq!(path, PathBuf::from("part.json"));
                assert_eq!(edits.support, vec!["Box:Face1"]);
                assert_eq!(edits.mode, Some(MapMode::FlatFace));
                assert_eq!(edits.reversed, Some(true));
                assert_eq!(edits.offset, Some(Vector3::new(0.0, 0.0, 2.5)));
                assert!(write);
            }
            other => panic!("Expected Set, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = Cli::try_parse_from(["attach", "set", "part.json", "--mode", "Sideways"]);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_short_vector() {
        assert!(parse_vector("1,2").is_err());
        assert!(parse_vector("1,x,3").is_err());
    }

    #[test]
    fn clear_support_conflicts_with_support() {
        let err = Cli::try_parse_from([
            "attach",
            "set",
            "part.json",
            "--support",
            "Box",
            "--clear-support",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn verbose_counts() {
        let cli = Cli::try_parse_from(["attach", "-vv", "engines"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
