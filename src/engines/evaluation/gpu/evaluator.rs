use super::device::{device_name, select_device};
use super::geometry::{block_size_for, reduce_partials, LaunchGeometry};
use super::kernel::{KERNEL_NAME, KERNEL_SOURCE, MODULE_NAME};
use crate::config::DeviceConfig;
use crate::data::SignalSet;
use crate::engines::evaluation::evaluator::{Evaluation, FitnessEvaluator};
use crate::engines::generation::{operators::locate_best, Genome};
use crate::error::{PolycorrError, Result};
use cudarc::driver::{sys, CudaDevice, CudaFunction, CudaSlice, DriverError, LaunchAsync, LaunchConfig};
use cudarc::nvrtc::compile_ptx;
use std::sync::Arc;

/// Input channels uploaded once per run and shared read-only by every launch.
struct StaticBuffers {
    x: CudaSlice<f64>,
    y: CudaSlice<f64>,
    z: CudaSlice<f64>,
    target: CudaSlice<f64>,
    geometry: LaunchGeometry,
}

/// Device buffers owned by one genome's launch until its partials are read back.
struct PendingLaunch {
    _constants: CudaSlice<f64>,
    _powers: CudaSlice<u8>,
    sum: CudaSlice<f64>,
    sum_sq: CudaSlice<f64>,
    sum_product: CudaSlice<f64>,
}

/// CUDA evaluator: one kernel launch per genome, host-side sum of block partials.
pub struct DeviceEvaluator {
    dev: Arc<CudaDevice>,
    kernel: CudaFunction,
    block_size: usize,
    statics: Option<StaticBuffers>,
}

impl DeviceEvaluator {
    /// Select a device, build the kernel and fix the block size.
    ///
    /// Any failure here is fatal for the run.
    pub fn new(config: &DeviceConfig) -> Result<Self> {
        let dev = select_device(config.device_name.as_deref())?;

        let ptx = compile_ptx(KERNEL_SOURCE)
            .map_err(|e| PolycorrError::Device(format!("Kernel build failed: {:?}", e)))?;
        dev.load_ptx(ptx, MODULE_NAME, &[KERNEL_NAME])
            .map_err(|e| PolycorrError::Device(format!("Failed to load kernel module: {}", e)))?;
        let kernel = dev.get_func(MODULE_NAME, KERNEL_NAME).ok_or_else(|| {
            PolycorrError::Device(format!("Kernel {} missing from module", KERNEL_NAME))
        })?;

        let max_threads = dev
            .attribute(sys::CUdevice_attribute::CU_DEVICE_ATTRIBUTE_MAX_THREADS_PER_BLOCK)
            .map_err(|e| PolycorrError::Device(format!("Failed to query block limit: {}", e)))?;
        let max_threads = max_threads.max(1) as usize;
        let block_size = match config.block_size {
            Some(requested) if requested as usize <= max_threads => requested as usize,
            Some(requested) => {
                return Err(PolycorrError::Device(format!(
                    "Block size {} exceeds device limit {}",
                    requested, max_threads
                )))
            }
            None => block_size_for(max_threads),
        };

        log::info!(
            "GPU backend ready on {}: block size {} (max {})",
            device_name(&dev),
            block_size,
            max_threads
        );

        Ok(Self {
            dev,
            kernel,
            block_size,
            statics: None,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Partition of the current signal set, once uploaded.
    pub fn geometry(&self) -> Option<LaunchGeometry> {
        self.statics.as_ref().map(|s| s.geometry)
    }

    fn launch(&self, statics: &StaticBuffers, genome: &Genome) -> std::result::Result<PendingLaunch, DriverError> {
        let geometry = statics.geometry;
        let constants = self.dev.htod_copy(genome.constants.to_vec())?;
        let powers = self.dev.htod_copy(genome.powers.to_vec())?;
        let mut sum = self.dev.alloc_zeros::<f64>(geometry.blocks)?;
        let mut sum_sq = self.dev.alloc_zeros::<f64>(geometry.blocks)?;
        let mut sum_product = self.dev.alloc_zeros::<f64>(geometry.blocks)?;

        let cfg = LaunchConfig {
            grid_dim: (geometry.blocks as u32, 1, 1),
            block_dim: (geometry.block_size as u32, 1, 1),
            shared_mem_bytes: geometry.shared_mem_bytes() as u32,
        };

        // SAFETY: argument order and types match `full_correlation`; every
        // output buffer holds `blocks` elements and inputs hold `samples`.
        unsafe {
            self.kernel.clone().launch(
                cfg,
                (
                    &statics.x,
                    &statics.y,
                    &statics.z,
                    &statics.target,
                    &constants,
                    &powers,
                    &mut sum,
                    &mut sum_sq,
                    &mut sum_product,
                    geometry.samples as u32,
                ),
            )?;
        }

        Ok(PendingLaunch {
            _constants: constants,
            _powers: powers,
            sum,
            sum_sq,
            sum_product,
        })
    }
}

impl FitnessEvaluator for DeviceEvaluator {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn prepare(&mut self, signals: &SignalSet) -> Result<()> {
        if let Some(statics) = &self.statics {
            // Buffers are uploaded once; a different signal set cannot reuse them.
            if statics.geometry.samples != signals.len() {
                return Err(PolycorrError::Validation(format!(
                    "Device buffers hold {} samples, signal set has {}",
                    statics.geometry.samples,
                    signals.len()
                )));
            }
            return Ok(());
        }
        if signals.len() > u32::MAX as usize {
            return Err(PolycorrError::Validation(format!(
                "{} samples exceed the kernel's 32-bit index range",
                signals.len()
            )));
        }

        let upload = |values: &[f64]| {
            self.dev.htod_sync_copy(values).map_err(|e| {
                PolycorrError::Device(format!("Failed to upload input channel: {}", e))
            })
        };
        let geometry = LaunchGeometry::new(signals.len(), self.block_size);
        let statics = StaticBuffers {
            x: upload(signals.x())?,
            y: upload(signals.y())?,
            z: upload(signals.z())?,
            target: upload(signals.target())?,
            geometry,
        };

        if geometry.padding() > 0 {
            log::info!(
                "{} samples padded with {} idle threads to {} blocks of {}",
                geometry.samples,
                geometry.padding(),
                geometry.blocks,
                geometry.block_size
            );
        }

        self.statics = Some(statics);
        Ok(())
    }

    fn evaluate(
        &mut self,
        population: &[Genome],
        signals: &SignalSet,
        fitness: &mut [f64],
    ) -> Result<Evaluation> {
        if fitness.len() != population.len() {
            return Err(PolycorrError::Validation(format!(
                "Fitness table holds {} entries for {} genomes",
                fitness.len(),
                population.len()
            )));
        }
        self.prepare(signals)?;
        let statics = self
            .statics
            .as_ref()
            .ok_or_else(|| PolycorrError::Execution("Input buffers not initialized".to_string()))?;

        // Enqueue every genome before waiting on any of them.
        let pending = population
            .iter()
            .map(|genome| self.launch(statics, genome))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| PolycorrError::Execution(format!("Kernel enqueue failed: {}", e)))?;

        self.dev
            .synchronize()
            .map_err(|e| PolycorrError::Execution(format!("Device synchronization failed: {}", e)))?;

        let readback = |buffer: &CudaSlice<f64>| {
            self.dev
                .dtoh_sync_copy(buffer)
                .map_err(|e| PolycorrError::Execution(format!("Partial readback failed: {}", e)))
        };
        for (launch, slot) in pending.iter().zip(fitness.iter_mut()) {
            let sums = reduce_partials(
                &readback(&launch.sum)?,
                &readback(&launch.sum_sq)?,
                &readback(&launch.sum_product)?,
            );
            *slot = sums.abs_correlation(statics.geometry.samples, signals);
        }

        let (best_index, best_correlation) = locate_best(fitness);
        Ok(Evaluation {
            best_index,
            best_correlation,
        })
    }
}
