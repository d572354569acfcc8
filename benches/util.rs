// Cycle counter and timing helpers shared by the benchmarks.

#[cfg(target_arch = "x86_64")]
pub fn core_cycles() -> u64 {
    use core::arch::x86_64::{_mm_lfence, _rdtsc};
    unsafe {
        _mm_lfence();
        _rdtsc()
    }
}

#[cfg(target_arch = "aarch64")]
pub fn core_cycles() -> u64 {
    use core::arch::asm;
    let mut x: u64;
    unsafe {
        asm!("dsb sy", "mrs {}, pmccntr_el0", out(reg) x);
    }
    x
}

// Other architectures: nanoseconds since the first call.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub fn core_cycles() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

// 32 bytes derived from the current counter value, so that benchmark
// inputs differ between runs.
pub fn seed32() -> [u8; 32] {
    let z = core_cycles().to_le_bytes();
    let mut seed = [0u8; 32];
    for (i, b) in seed.iter_mut().enumerate() {
        *b = z[i & 7] ^ (i as u8);
    }
    seed
}

// Runs `rounds` timed batches of `inner` calls to `f`, and returns the
// median cost of one call.
pub fn median_cost<F: FnMut()>(rounds: usize, inner: usize, mut f: F) -> f64 {
    let mut tt = vec![0u64; rounds];
    for t in tt.iter_mut() {
        let begin = core_cycles();
        for _ in 0..inner {
            f();
        }
        *t = core_cycles().wrapping_sub(begin);
    }
    tt.sort();
    (tt[tt.len() >> 1] as f64) / (inner as f64)
}
