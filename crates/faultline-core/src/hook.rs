//! Keeps the panic hook quiet for faults that a boundary will recover.

use std::panic;
use std::sync::Once;

use crate::fault::FaultSignal;

static INSTALL: Once = Once::new();

/// Install, once per process, a panic hook that ignores [`FaultSignal`]
/// payloads and forwards everything else to the hook that was installed
/// before it.
///
/// Does nothing while the current thread is already panicking.
pub fn install_quiet_hook() {
    if std::thread::panicking() {
        return;
    }
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if info.payload().is::<FaultSignal>() {
                return;
            }
            previous(info);
        }));
        tracing::debug!("installed quiet panic hook for fault signals");
    });
}
