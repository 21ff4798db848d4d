//! Subsystem initializer
//!
//! Brings up the display/event subsystem and then the image-decoding subsystem.
//! Each one is recorded in the ledger as soon as it is up, so a failure of the
//! second leaves only the first to be shut down. No retries.

use crate::config::SubsystemFlags;
use crate::context::ledger::{AcquiredResource, AcquisitionLedger};
use crate::error::{InitError, Subsystem};
use crate::platform::{Platform, PlatformResult};

/// Start both global subsystems, display first
pub fn init<P: Platform>(
    platform: &mut P,
    flags: &SubsystemFlags,
    ledger: &mut AcquisitionLedger<P>,
) -> Result<(), InitError> {
    platform.init_display(flags.display).map_err(|e| InitError {
        subsystem: Subsystem::Display,
        reason: e.to_string(),
    })?;
    ledger.push(AcquiredResource::Subsystem(Subsystem::Display));
    log::info!("Display subsystem up ({:?})", flags.display);

    platform.init_image(flags.image).map_err(|e| InitError {
        subsystem: Subsystem::Image,
        reason: e.to_string(),
    })?;
    ledger.push(AcquiredResource::Subsystem(Subsystem::Image));
    log::info!("Image subsystem up ({:?})", flags.image);

    Ok(())
}

/// Shut down one subsystem started by [`init`]
pub fn shutdown<P: Platform>(platform: &mut P, subsystem: Subsystem) -> PlatformResult<()> {
    match subsystem {
        Subsystem::Display => platform.shutdown_display(),
        Subsystem::Image => platform.shutdown_image(),
    }
}
