use super::AttachExtension;
use crate::attributes::{update_triggers, AttrValue, PLACEMENT, SUPPORT};
use crate::engine::Attachment;
use crate::error::{AttachError, Result};
use crate::host::HostObject;
use crate::model::{ActiveState, MapMode};
use tracing::debug;

impl AttachExtension {
    /// Recompute the attachment and write the result into the host.
    ///
    /// Returns `Ok(true)` when a placement was applied and `Ok(false)` when
    /// the attachment is deactivated or not applicable. The host placement is
    /// written only on success.
    pub fn resolve_placement<H: HostObject>(&mut self, host: &mut H) -> Result<bool> {
        self.active.set(ActiveState::Inactive);
        if self.engine.is_none() {
            return Err(AttachError::NoEngine);
        }
        self.push_config();

        let mode = self.attrs.mode();
        if mode == MapMode::Deactivated {
            return Ok(false);
        }

        let engine = self.engine.as_deref().ok_or(AttachError::NoEngine)?;
        let current = host.placement(PLACEMENT).ok_or(AttachError::MissingPlacement)?;

        match engine.compute(&current)? {
            Attachment::NotApplicable => {
                debug!(mode = %mode, "attachment not applicable");
                Ok(false)
            }
            Attachment::Applied {
                placement,
                rewritten,
            } => {
                if let Some(support) = rewritten {
                    if self.attrs.set(SUPPORT, AttrValue::Links(support))? {
                        debug!("support references canonicalized");
                        host.touch(SUPPORT);
                    }
                }
                if !host.set_placement(PLACEMENT, placement) {
                    return Err(AttachError::MissingPlacement);
                }
                self.active.set(ActiveState::Active);
                debug!(mode = %mode, "attachment applied");
                Ok(true)
            }
        }
    }

    /// Whether the attachment currently succeeds.
    ///
    /// An unknown state is probed once against the current host placement,
    /// without writing anything. Known states are returned as cached.
    pub fn is_active<H: HostObject>(&self, host: &H) -> Result<bool> {
        if self.active.get() == ActiveState::Unknown {
            self.active.set(ActiveState::Inactive);
            let engine = self.engine.as_deref().ok_or(AttachError::NoEngine)?;
            let current = host.placement(PLACEMENT).ok_or(AttachError::MissingPlacement)?;
            if let Attachment::Applied { .. } = engine.compute(&current)? {
                self.active.set(ActiveState::Active);
            }
        }
        Ok(self.active.get() == ActiveState::Active)
    }

    pub fn active_state(&self) -> ActiveState {
        self.active.get()
    }

    /// Forget the cached active state; the next `is_active` probes again.
    pub fn invalidate_active(&self) {
        self.active.set(ActiveState::Unknown);
    }

    /// True when an attachment-relevant attribute changed since the last
    /// recompute.
    pub fn must_execute<H: HostObject>(&self, host: &H) -> bool {
        update_triggers().any(|name| host.is_touched(name))
    }

    /// Recompute hook. Domain errors propagate unchanged; geometry failures
    /// are re-raised as [`AttachError::Runtime`].
    pub fn execute<H: HostObject>(&mut self, host: &mut H) -> Result<()> {
        if self.must_execute(host) {
            self.resolve_placement(host)
                .map_err(AttachError::into_recompute)?;
        }
        Ok(())
    }
}
