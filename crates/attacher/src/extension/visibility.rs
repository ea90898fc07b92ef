use super::AttachExtension;
use crate::attributes::{MAP_REVERSED, OFFSET, PATH_PARAMETER, PLACEMENT};
use crate::host::HostObject;
use crate::model::MapMode;
use serde::Serialize;
use tracing::error;

/// Editor status derived after an attachment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibilityReport {
    pub attached: bool,
    pub path_parameter_visible: bool,
    pub reversed_visible: bool,
    pub offset_visible: bool,
    pub placement_read_only: bool,
}

impl VisibilityReport {
    /// Pure status rules.
    ///
    /// The path parameter only makes sense for a single curve reference in a
    /// curve-parametrized mode. Translate-only attachment leaves the
    /// orientation editable, so the placement stays writable.
    pub fn derive(attached: bool, mode: MapMode, single_ref: bool) -> Self {
        Self {
            attached,
            path_parameter_visible: attached && mode.is_curve_parametrized() && single_ref,
            reversed_visible: attached,
            offset_visible: attached,
            placement_read_only: attached && mode != MapMode::Translate,
        }
    }
}

impl AttachExtension {
    /// Resolve, then bring the dependent attribute statuses in line with the
    /// outcome.
    ///
    /// Failures are not returned: they are logged, optionally flagged on the
    /// host, and count as "not attached".
    pub fn update_visibility<H: HostObject>(&mut self, host: &mut H) -> VisibilityReport {
        let attached = match self.resolve_placement(host) {
            Ok(attached) => {
                if self.mark_errors {
                    host.clear_error();
                }
                attached
            }
            Err(err) => {
                error!(kind = err.kind(), "PositionBySupport: {}", err);
                if self.mark_errors {
                    host.set_error(err.to_string());
                }
                false
            }
        };

        let single_ref = self
            .engine
            .as_ref()
            .is_some_and(|engine| engine.support().len() == 1);
        let report = VisibilityReport::derive(attached, self.attrs.mode(), single_ref);

        self.attrs
            .set_hidden(PATH_PARAMETER, !report.path_parameter_visible);
        self.attrs.set_hidden(MAP_REVERSED, !report.reversed_visible);
        self.attrs.set_hidden(OFFSET, !report.offset_visible);
        host.set_read_only(PLACEMENT, report.placement_read_only);
        report
    }

    /// Statuses as last applied, without writing the placement.
    ///
    /// `attached` comes from the active-state cache, probing the engine when
    /// the cache was invalidated. A failed probe counts as not attached.
    pub fn current_visibility<H: HostObject>(&self, host: &H) -> VisibilityReport {
        VisibilityReport {
            attached: self.is_active(host).unwrap_or(false),
            path_parameter_visible: !self.attrs.is_hidden(PATH_PARAMETER),
            reversed_visible: !self.attrs.is_hidden(MAP_REVERSED),
            offset_visible: !self.attrs.is_hidden(OFFSET),
            placement_read_only: host.is_read_only(PLACEMENT),
        }
    }

    /// Post-load hook: one full resolution and status update.
    pub fn on_document_restored<H: HostObject>(&mut self, host: &mut H) -> VisibilityReport {
        self.update_visibility(host)
    }
}
