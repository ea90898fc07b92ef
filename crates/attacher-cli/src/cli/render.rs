//! # Rendering Module
//!
//! Plain-text output for the terminal, styled with `console`. Every function
//! returns a `String`; printing is left to the command handlers.

use super::styles::STYLES;
use attacher::document::Session;
use attacher::extension::VisibilityReport;
use attacher::geometry::ShapeCatalog;
use attacher::host::HostObject;
use attacher::model::{MapMode, SupportRef};
use attacher::placement::{Placement, Vector3};
use serde::Serialize;
use std::fmt::Write;

const LABEL_WIDTH: usize = 12;

fn row(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(
        out,
        "{} {}",
        STYLES.label.apply_to(format!("{:<width$}", label, width = LABEL_WIDTH)),
        value
    );
}

fn vector(v: Vector3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}

fn placement(p: &Placement) -> String {
    format!("at {} z-axis {}", vector(p.position), vector(p.z_axis()))
}

/// `Box:Face1` when the object is known, the raw reference otherwise.
pub fn support_label(catalog: &ShapeCatalog, support: &SupportRef) -> String {
    match catalog.get(&support.object) {
        Some(object) if support.sub.is_empty() => object.label.clone(),
        Some(object) => format!("{}:{}", object.label, support.sub),
        None => support.to_string(),
    }
}

pub fn render_engines(names: &[&str], default_engine: &str) -> String {
    let mut out = String::new();
    for name in names {
        if *name == default_engine {
            let _ = writeln!(out, "{} {}", name, STYLES.default_marker.apply_to("(default)"));
        } else {
            let _ = writeln!(out, "{}", name);
        }
    }
    out
}

pub fn render_modes() -> String {
    let mut out = String::new();
    for mode in MapMode::ALL {
        if mode.is_curve_parametrized() {
            let _ = writeln!(out, "{} {}", mode, STYLES.hidden.apply_to("(curve)"));
        } else {
            let _ = writeln!(out, "{}", mode);
        }
    }
    out
}

/// Attribute listing plus attachment status.
pub fn render_session(session: &Session, report: &VisibilityReport) -> String {
    let attrs = session.extension.attributes();
    let hidden = |shown: bool, text: String| {
        if shown {
            STYLES.value.apply_to(text).to_string()
        } else {
            STYLES.hidden.apply_to(format!("{} (hidden)", text)).to_string()
        }
    };

    let mut out = String::new();
    let engine = match attrs.attacher_type() {
        "" => "(none)".to_string(),
        name => name.to_string(),
    };
    row(&mut out, "Engine", engine);

    let support = if attrs.support().is_empty() {
        "(none)".to_string()
    } else {
        attrs
            .support()
            .iter()
            .map(|s| support_label(session.geometry(), s))
            .collect::<Vec<_>>()
            .join(", ")
    };
    row(&mut out, "Support", support);
    row(&mut out, "Mode", attrs.mode());
    row(
        &mut out,
        "Reversed",
        hidden(report.reversed_visible, attrs.reversed().to_string()),
    );
    row(
        &mut out,
        "Path",
        hidden(
            report.path_parameter_visible,
            format!("{:.3}", attrs.path_parameter()),
        ),
    );
    row(
        &mut out,
        "Offset",
        hidden(report.offset_visible, placement(&attrs.offset())),
    );

    let resolved = match session.host.resolved() {
        Some(p) if report.placement_read_only => format!("{} (read-only)", placement(&p)),
        Some(p) => placement(&p),
        None => "(missing)".to_string(),
    };
    row(&mut out, "Placement", resolved);

    let status = match session.host.error() {
        Some(message) => STYLES.error.apply_to(format!("error: {}", message)).to_string(),
        None if report.attached => STYLES.attached.apply_to("attached").to_string(),
        None => STYLES.detached.apply_to("not attached").to_string(),
    };
    row(&mut out, "Status", status);
    out
}

#[derive(Serialize)]
struct SessionJson<'a> {
    engine: &'a str,
    support: Vec<String>,
    mode: MapMode,
    reversed: bool,
    path_parameter: f64,
    offset: Placement,
    placement: Option<Placement>,
    error: Option<&'a str>,
    visibility: &'a VisibilityReport,
}

pub fn render_session_json(session: &Session, report: &VisibilityReport) -> serde_json::Result<String> {
    let attrs = session.extension.attributes();
    let data = SessionJson {
        engine: attrs.attacher_type(),
        support: attrs
            .support()
            .iter()
            .map(|s| support_label(session.geometry(), s))
            .collect(),
        mode: attrs.mode(),
        reversed: attrs.reversed(),
        path_parameter: attrs.path_parameter(),
        offset: attrs.offset(),
        placement: session.host.resolved(),
        error: session.host.error(),
        visibility: report,
    };
    serde_json::to_string_pretty(&data)
}
