use tokio::sync::watch;

/// Version counter a recorder bumps on every mutation.
///
/// Observers either poll [`ChangeNotifier::version`] or hold a
/// [`watch::Receiver`] and await `changed()`. Bumping never blocks and works
/// with zero subscribers.
#[derive(Debug)]
pub struct ChangeNotifier {
    tx: watch::Sender<u64>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    pub fn version(&self) -> u64 {
        *self.tx.borrow()
    }

    pub fn bump(&self) {
        self.tx.send_modify(|version| *version = version.wrapping_add(1));
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn test_bump_increments_version() {
        let notifier = ChangeNotifier::new();
        assert_eq!(notifier.version(), 0);

        notifier.bump();
        notifier.bump();

        assert_eq!(notifier.version(), 2);
    }

    #[test]
    fn test_subscriber_wakes_on_bump() {
        let notifier = ChangeNotifier::new();
        let mut rx = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 1);

        {
            let mut changed = task::spawn(rx.changed());
            assert_pending!(changed.poll());

            notifier.bump();

            assert!(changed.is_woken());
            assert!(assert_ready!(changed.poll()).is_ok());
        }

        assert_eq!(*rx.borrow_and_update(), 1);
    }
}
