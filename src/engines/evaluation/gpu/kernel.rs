//! CUDA source for the transform + block-reduction kernel, compiled at runtime with NVRTC.

pub const MODULE_NAME: &str = "polycorr";
pub const KERNEL_NAME: &str = "full_correlation";

/// One thread per sample. Each thread computes `acc`, `acc²` and
/// `acc·target`, then every block folds its three arrays in shared memory
/// with a stride-halving tree and writes one partial per quantity.
///
/// `ipow` uses the same square-and-multiply order as `f64::powi` on the host.
pub const KERNEL_SOURCE: &str = r#"
__device__ double ipow(double base, unsigned char exponent) {
    double result = 1.0;
    while (exponent) {
        if (exponent & 1) {
            result *= base;
        }
        exponent >>= 1;
        if (exponent) {
            base *= base;
        }
    }
    return result;
}

extern "C" __global__ void full_correlation(
    const double* __restrict__ x,
    const double* __restrict__ y,
    const double* __restrict__ z,
    const double* __restrict__ target,
    const double* __restrict__ c,
    const unsigned char* __restrict__ p,
    double* out_sum,
    double* out_sum_sq,
    double* out_sum_product,
    const unsigned int samples)
{
    extern __shared__ double scratch[];
    double* local_sum = scratch;
    double* local_sum_sq = scratch + blockDim.x;
    double* local_sum_product = scratch + 2 * blockDim.x;

    const unsigned int local_id = threadIdx.x;
    const unsigned int global_id = blockIdx.x * blockDim.x + threadIdx.x;

    double acc = 0.0;
    double hr = 0.0;
    if (global_id < samples) {
        acc = c[0] * ipow(x[global_id], p[0])
            + c[1] * ipow(y[global_id], p[1])
            + c[2] * ipow(z[global_id], p[2])
            + c[3];
        hr = target[global_id];
    }

    local_sum[local_id] = acc;
    local_sum_sq[local_id] = acc * acc;
    local_sum_product[local_id] = acc * hr;
    __syncthreads();

    for (unsigned int stride = blockDim.x / 2; stride > 0; stride >>= 1) {
        if (local_id < stride) {
            local_sum[local_id] += local_sum[local_id + stride];
            local_sum_sq[local_id] += local_sum_sq[local_id + stride];
            local_sum_product[local_id] += local_sum_product[local_id + stride];
        }
        __syncthreads();
    }

    if (local_id == 0) {
        out_sum[blockIdx.x] = local_sum[0];
        out_sum_sq[blockIdx.x] = local_sum_sq[0];
        out_sum_product[blockIdx.x] = local_sum_product[0];
    }
}
"#;
