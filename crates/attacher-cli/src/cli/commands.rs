//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs a log subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Logging, configuration from `attacher.toml` and the environment
//! 3. **Dispatch**: Route commands to handlers
//! 4. **Output Formatting**: Delegate to `render`

use super::render::{render_engines, render_modes, render_session, render_session_json};
use super::setup::{Cli, Commands, Edits};
use anyhow::{anyhow, bail, Context, Result};
use attacher::attributes::{
    AttrValue, ATTACHER_TYPE, MAP_MODE, MAP_REVERSED, OFFSET, PATH_PARAMETER, SUPPORT,
};
use attacher::config::AttacherConfig;
use attacher::document::{Document, Session, StoredAttribute};
use attacher::engine::EngineRegistry;
use attacher::extension::VisibilityReport;
use attacher::geometry::{Element, ShapeCatalog, ShapeObject};
use attacher::model::SupportRef;
use attacher::placement::{Placement, Vector3};
use clap::Parser;
use std::path::Path;
use std::rc::Rc;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let config = AttacherConfig::load(&cwd).context("cannot load configuration")?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Engines => handle_engines(&config),
        Commands::Modes => {
            print!("{}", render_modes());
            Ok(())
        }
        Commands::Init { path, force } => handle_init(&path, force),
        Commands::Show { path, json } => handle_show(&path, json, &config),
        Commands::Set { path, edits, write } => handle_set(&path, &edits, write, &config),
        Commands::Config { template } => handle_config(&config, template),
    }
}

/// Log records go to stderr. `RUST_LOG` applies when no `-v` is given.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_engines(config: &AttacherConfig) -> Result<()> {
    let registry = EngineRegistry::with_builtins(Rc::new(ShapeCatalog::new()));
    print!("{}", render_engines(&registry.names(), &config.default_engine));
    Ok(())
}

fn handle_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    sample_document()
        .save(path)
        .with_context(|| format!("cannot write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn open(path: &Path, config: &AttacherConfig) -> Result<(Session, VisibilityReport)> {
    let document =
        Document::load(path).with_context(|| format!("cannot read {}", path.display()))?;
    let opened = Session::open(&document, config)
        .with_context(|| format!("cannot restore {}", path.display()))?;
    Ok(opened)
}

fn print_session(session: &Session, report: &VisibilityReport, json: bool) -> Result<()> {
    if json {
        println!("{}", render_session_json(session, report)?);
    } else {
        print!("{}", render_session(session, report));
    }
    Ok(())
}

fn handle_show(path: &Path, json: bool, config: &AttacherConfig) -> Result<()> {
    let (session, report) = open(path, config)?;
    print_session(&session, &report, json)
}

fn handle_set(path: &Path, edits: &Edits, write: bool, config: &AttacherConfig) -> Result<()> {
    let (mut session, mut report) = open(path, config)?;

    for (name, value) in collect_edits(&session, edits)? {
        debug!(attribute = name, ?value, "applying edit");
        report = session
            .set(name, value)
            .with_context(|| format!("cannot set {}", name))?;
    }

    print_session(&session, &report, false)?;
    if write {
        session
            .to_document()?
            .save(path)
            .with_context(|| format!("cannot write {}", path.display()))?;
        println!("Saved {}", path.display());
    }
    Ok(())
}

/// Translate command-line edits into attribute writes, in a fixed order:
/// engine first, so the remaining attributes reach the new engine.
fn collect_edits(session: &Session, edits: &Edits) -> Result<Vec<(&'static str, AttrValue)>> {
    let mut writes = Vec::new();
    if let Some(engine) = &edits.engine {
        writes.push((ATTACHER_TYPE, AttrValue::Text(engine.clone())));
    }
    if edits.clear_support {
        writes.push((SUPPORT, AttrValue::Links(Vec::new())));
    } else if !edits.support.is_empty() {
        let refs = edits
            .support
            .iter()
            .map(|s| parse_support(session.geometry(), s))
            .collect::<Result<Vec<_>>>()?;
        writes.push((SUPPORT, AttrValue::Links(refs)));
    }
    if let Some(mode) = edits.mode {
        writes.push((MAP_MODE, AttrValue::Mode(mode)));
    }
    if let Some(reversed) = edits.reversed {
        writes.push((MAP_REVERSED, AttrValue::Bool(reversed)));
    }
    if let Some(t) = edits.path_parameter {
        writes.push((PATH_PARAMETER, AttrValue::Float(t)));
    }
    if let Some(offset) = edits.offset {
        writes.push((OFFSET, AttrValue::Placement(Placement::from_position(offset))));
    }
    Ok(writes)
}

/// `Box:Face1` or `Box`, resolved by object label.
fn parse_support(catalog: &ShapeCatalog, text: &str) -> Result<SupportRef> {
    let (label, sub) = text.split_once(':').unwrap_or((text, ""));
    let object = catalog
        .find_by_label(label)
        .ok_or_else(|| anyhow!("no object labelled '{}'", label))?;
    Ok(SupportRef::new(object.id, sub))
}

fn handle_config(config: &AttacherConfig, template: bool) -> Result<()> {
    if template {
        let options = confique::toml::FormatOptions::default();
        print!("{}", confique::toml::template::<AttacherConfig>(options));
    } else {
        println!("default_engine = {:?}", config.default_engine);
        println!("mark_errors = {}", config.mark_errors);
    }
    Ok(())
}

/// A box with a face, edge and vertex, a cylinder with a circular edge, and
/// an object waiting to be attached.
fn sample_document() -> Document {
    let mut geometry = ShapeCatalog::new();
    geometry.insert(
        ShapeObject::new("Box", Placement::identity())
            .with_element(
                "Face1",
                Element::Plane {
                    origin: Vector3::new(0.0, 0.0, 10.0),
                    normal: Vector3::Z,
                },
            )
            .with_element(
                "Edge1",
                Element::Line {
                    start: Vector3::new(10.0, 0.0, 0.0),
                    end: Vector3::new(10.0, 0.0, 10.0),
                },
            )
            .with_element(
                "Vertex1",
                Element::Vertex {
                    point: Vector3::new(10.0, 10.0, 10.0),
                },
            ),
    );
    geometry.insert(
        ShapeObject::new("Cylinder", Placement::from_position(Vector3::new(20.0, 0.0, 0.0)))
            .with_element(
                "Edge1",
                Element::Circle {
                    center: Vector3::new(20.0, 0.0, 5.0),
                    normal: Vector3::Z,
                    radius: 2.0,
                },
            ),
    );

    let attributes = [(MAP_MODE, "PropertyEnumeration", "Deactivated")]
        .into_iter()
        .map(|(name, type_name, value)| StoredAttribute::new(name, type_name, value.into()))
        .collect();

    Document {
        geometry,
        placement: Placement::identity(),
        attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attacher::model::MapMode;

    #[test]
    fn support_parses_label_and_sub() {
        let document = sample_document();
        let support = parse_support(&document.geometry, "Box:Face1").unwrap();
        assert_eq!(support.sub, "Face1");

        let whole = parse_support(&document.geometry, "Cylinder").unwrap();
        assert!(whole.sub.is_empty());

        assert!(parse_support(&document.geometry, "Sphere:Face1").is_err());
    }

    #[test]
    fn edits_put_engine_first() {
        let document = sample_document();
        let (session, _) = Session::open(&document, &AttacherConfig::default()).unwrap();
        let edits = Edits {
            engine: Some("AttachEnginePoint".into()),
            mode: Some(MapMode::Translate),
            support: vec!["Box:Vertex1".into()],
            ..Edits::default()
        };

        let names: Vec<&str> = collect_edits(&session, &edits)
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec![ATTACHER_TYPE, SUPPORT, MAP_MODE]);
    }

    #[test]
    fn sample_document_opens_detached() {
        let document = sample_document();
        let (_, report) = Session::open(&document, &AttacherConfig::default()).unwrap();
        assert!(!report.attached);
    }
}
