//! `critical-section` 1.x implementation for ESP-IDF builds.
//!
//! The event channel is guarded by `CriticalSectionRawMutex`; on target the
//! acquire/release pair is provided here on top of a std mutex, so the
//! `esp_timer` task and the main task can both touch the channel.  Host
//! builds get the `std` implementation from the `critical-section` crate.

use core::cell::{Cell, RefCell};
use std::sync::{Mutex, MutexGuard, PoisonError};

static CRITICAL_SECTION_MUTEX: Mutex<()> = Mutex::new(());

thread_local! {
    static CRITICAL_SECTION_DEPTH: Cell<u8> = const { Cell::new(0) };
    static CRITICAL_SECTION_GUARD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
}

struct EspCriticalSection;

critical_section::set_impl!(EspCriticalSection);

// SAFETY: the mutex gives mutual exclusion across tasks; the per-task depth
// counter makes nested acquires on one task re-entrant.
unsafe impl critical_section::Impl for EspCriticalSection {
    unsafe fn acquire() -> critical_section::RawRestoreState {
        CRITICAL_SECTION_DEPTH.with(|depth| {
            let d = depth.get();
            if d == 0 {
                // Channel sections never panic; recover the guard regardless.
                let lock = CRITICAL_SECTION_MUTEX
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                CRITICAL_SECTION_GUARD.with(|guard| *guard.borrow_mut() = Some(lock));
            }
            depth.set(d.saturating_add(1));
        });
    }

    unsafe fn release(_restore_state: critical_section::RawRestoreState) {
        CRITICAL_SECTION_DEPTH.with(|depth| {
            let d = depth.get();
            if d == 0 {
                return;
            }
            depth.set(d - 1);
            if d == 1 {
                CRITICAL_SECTION_GUARD.with(|guard| *guard.borrow_mut() = None);
            }
        });
    }
}
