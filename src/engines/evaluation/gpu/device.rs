use crate::error::{PolycorrError, Result};
use cudarc::driver::CudaDevice;
use std::sync::Arc;

/// Open the CUDA device to run on.
///
/// With a preferred name, the first device reporting exactly that name wins
/// and a miss is an error. Without one, ordinal 0 is used. There is no CPU
/// fallback here.
pub fn select_device(preferred: Option<&str>) -> Result<Arc<CudaDevice>> {
    let count = CudaDevice::count()
        .map_err(|e| PolycorrError::Device(format!("CUDA device enumeration failed: {}", e)))?;
    if count <= 0 {
        return Err(PolycorrError::Device("No CUDA device found".to_string()));
    }

    let Some(preferred) = preferred else {
        let dev = open(0)?;
        log::info!("Selected default GPU device {}", device_name(&dev));
        return Ok(dev);
    };

    for ordinal in 0..count as usize {
        let dev = open(ordinal)?;
        let name = device_name(&dev);
        if name == preferred {
            log::info!("Selected GPU device {} (ordinal {})", name, ordinal);
            return Ok(dev);
        }
        log::debug!("Skipping GPU device {} (ordinal {})", name, ordinal);
    }

    Err(PolycorrError::Device(format!(
        "There is no GPU device named {}",
        preferred
    )))
}

fn open(ordinal: usize) -> Result<Arc<CudaDevice>> {
    CudaDevice::new(ordinal).map_err(|e| {
        PolycorrError::Device(format!("CUDA init failed for device {}: {}", ordinal, e))
    })
}

pub fn device_name(dev: &CudaDevice) -> String {
    dev.name().unwrap_or_else(|_| "unknown".to_string())
}
