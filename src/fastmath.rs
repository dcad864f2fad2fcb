//! Flush-to-zero floating-point mode.
//!
//! Denormal (subnormal) operands can be up to 100x slower than normal ones on
//! common CPUs. Shader-style code rarely needs them, so a scope can opt into
//! treating them as zero.

/// RAII guard for flush-to-zero mode.
///
/// Enables flush-to-zero (FTZ) and denormals-are-zero (DAZ) on construction and
/// restores the previous floating-point control state on drop. The state is
/// per thread.
///
/// - **x86_64**: sets FTZ (bit 15) and DAZ (bit 6) in MXCSR
/// - **aarch64**: sets FZ (bit 24) in FPCR
/// - **other targets**: no-op
///
/// ```
/// let out = {
///     let _guard = unsafe { lockstep::FastMathGuard::new() };
///     // denormals read and produced as zero here
///     1.0f32
/// }; // previous mode restored
/// # assert_eq!(out, 1.0);
/// ```
pub struct FastMathGuard {
    #[cfg(target_arch = "x86_64")]
    old_mxcsr: u32,
    #[cfg(target_arch = "aarch64")]
    old_fpcr: u64,
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    _phantom: (),
}

impl FastMathGuard {
    /// Enable flush-to-zero on the current thread.
    ///
    /// # Safety
    ///
    /// Modifies the thread's floating-point control register. Code running
    /// under the guard must tolerate denormals being replaced by zero, and
    /// guards must be dropped in reverse order of creation.
    #[inline]
    #[must_use]
    pub unsafe fn new() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            // SAFETY: forwarded to the caller.
            let old_mxcsr = unsafe { read_mxcsr() };
            unsafe { write_mxcsr(old_mxcsr | MXCSR_FTZ_DAZ) };
            log::trace!("flush-to-zero on (mxcsr {old_mxcsr:#x})");
            Self { old_mxcsr }
        }

        #[cfg(target_arch = "aarch64")]
        {
            // SAFETY: forwarded to the caller.
            let old_fpcr = unsafe { read_fpcr() };
            unsafe { write_fpcr(old_fpcr | FPCR_FZ) };
            log::trace!("flush-to-zero on (fpcr {old_fpcr:#x})");
            Self { old_fpcr }
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Self { _phantom: () }
        }
    }
}

impl Drop for FastMathGuard {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: restores the state captured in `new`.
        #[cfg(target_arch = "x86_64")]
        unsafe {
            write_mxcsr(self.old_mxcsr);
        }

        #[cfg(target_arch = "aarch64")]
        unsafe {
            write_fpcr(self.old_fpcr);
        }
    }
}

// ============================================================================
// x86_64 Implementation
// ============================================================================

// (1 << 15) | (1 << 6)
#[cfg(target_arch = "x86_64")]
const MXCSR_FTZ_DAZ: u32 = 0x8040;

#[cfg(target_arch = "x86_64")]
#[inline]
unsafe fn read_mxcsr() -> u32 {
    let mut mxcsr: u32 = 0;
    unsafe {
        core::arch::asm!(
            "stmxcsr [{ptr}]",
            ptr = in(reg) &mut mxcsr,
            options(nostack),
        );
    }
    mxcsr
}

#[cfg(target_arch = "x86_64")]
#[inline]
unsafe fn write_mxcsr(mxcsr: u32) {
    unsafe {
        core::arch::asm!(
            "ldmxcsr [{ptr}]",
            ptr = in(reg) &mxcsr,
            options(nostack, readonly),
        );
    }
}

// ============================================================================
// ARM AArch64 Implementation
// ============================================================================

#[cfg(target_arch = "aarch64")]
const FPCR_FZ: u64 = 1 << 24;

#[cfg(target_arch = "aarch64")]
#[inline]
unsafe fn read_fpcr() -> u64 {
    let fpcr: u64;
    unsafe {
        core::arch::asm!("mrs {v}, fpcr", v = out(reg) fpcr, options(nomem, nostack));
    }
    fpcr
}

#[cfg(target_arch = "aarch64")]
#[inline]
unsafe fn write_fpcr(fpcr: u64) {
    unsafe {
        core::arch::asm!("msr fpcr, {v}", v = in(reg) fpcr, options(nomem, nostack));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hint::black_box;

    #[test]
    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
    fn denormals_flush_inside_scope_only() {
        let tiny = f32::MIN_POSITIVE / 4.0;
        assert!(tiny.is_subnormal());
        {
            let _guard = unsafe { FastMathGuard::new() };
            assert_eq!(black_box(tiny) * black_box(1.0f32), 0.0);
        }
        assert_eq!(black_box(tiny) * black_box(1.0f32), tiny);
    }
}
