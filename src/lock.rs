use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Lock `lock`, taking the data back if a holder panicked.
pub(crate) fn lock_or_recover<'a, T>(lock: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(context, "mutex poisoned, recovering");
            crate::log_debug(&format!("Mutex poisoned in {context}; recovering"));
            poisoned.into_inner()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn recovers_data_after_a_panicking_holder() {
        let shared = Arc::new(Mutex::new(7u8));
        let poisoner = Arc::clone(&shared);
        let _ = thread::spawn(move || {
            let mut guard = poisoner.lock().unwrap();
            *guard = 9;
            panic!("holder panicked");
        })
        .join();
        assert!(shared.is_poisoned());
        assert_eq!(*lock_or_recover(&shared, "test"), 9);
    }
}
