use embassy_time::{Duration, Instant};

/// Vial drops the unlock attempt if it stops polling for this long
const UNLOCK_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Lock state of the Vial editor.
///
/// Vial starts an unlock attempt and then polls while the user holds the unlock keys.
pub struct VialLock<'a> {
    unlocked: bool,
    unlocking: bool,
    last_poll: Instant,
    unlock_keys: &'a [(u8, u8)],
}

impl<'a> VialLock<'a> {
    pub fn new(unlock_keys: &'a [(u8, u8)]) -> Self {
        Self {
            unlocked: false,
            unlocking: false,
            last_poll: Instant::MIN,
            unlock_keys,
        }
    }

    pub fn unlock_keys(&self) -> &'a [(u8, u8)] {
        self.unlock_keys
    }

    pub fn is_unlocking(&mut self, now: Instant) -> bool {
        self.update_unlocking_state(now);
        self.unlocking
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Start an unlock attempt
    pub fn unlocking(&mut self, now: Instant) {
        self.unlocking = true;
        self.last_poll = now;
    }

    fn unlock(&mut self) {
        if self.unlocking {
            info!("Vial unlocked");
            self.unlocked = true;
            self.unlocking = false;
        }
    }

    /// Poll the unlock keys, `is_pressed(row, col)` reads the matrix.
    ///
    /// Returns the number of unlock keys not held yet, unlocking when it reaches 0.
    pub fn check_unlock(&mut self, now: Instant, is_pressed: impl Fn(u8, u8) -> bool) -> u8 {
        if self.unlock_keys.is_empty() {
            warn!("No unlock keys provided");
            return 1;
        }
        if !self.is_unlocking(now) {
            return self.unlock_keys.len() as u8;
        }
        self.last_poll = now;
        let counter = self
            .unlock_keys
            .iter()
            .filter(|(row, col)| !is_pressed(*row, *col))
            .count() as u8;
        if counter == 0 {
            self.unlock();
        }
        counter
    }

    pub fn lock(&mut self) {
        self.unlocked = false;
    }

    fn update_unlocking_state(&mut self, now: Instant) {
        if now.saturating_duration_since(self.last_poll) > UNLOCK_POLL_TIMEOUT {
            self.unlocking = false;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const UNLOCK_KEYS: &[(u8, u8)] = &[(0, 0), (4, 5)];

    #[test]
    fn test_unlock_needs_all_keys() {
        let mut lock = VialLock::new(UNLOCK_KEYS);
        let t0 = Instant::from_millis(1000);
        lock.unlocking(t0);
        assert_eq!(lock.check_unlock(t0, |r, c| (r, c) == (0, 0)), 1);
        assert!(!lock.is_unlocked());
        assert_eq!(lock.check_unlock(t0 + Duration::from_millis(50), |_, _| true), 0);
        assert!(lock.is_unlocked());

        lock.lock();
        assert!(!lock.is_unlocked());
    }

    #[test]
    fn test_unlock_attempt_lapses() {
        let mut lock = VialLock::new(UNLOCK_KEYS);
        let t0 = Instant::from_millis(1000);
        lock.unlocking(t0);
        assert!(lock.is_unlocking(t0 + Duration::from_millis(80)));
        assert!(!lock.is_unlocking(t0 + Duration::from_millis(150)));
        assert_eq!(lock.check_unlock(t0 + Duration::from_millis(150), |_, _| true), 2);
        assert!(!lock.is_unlocked());
    }

    #[test]
    fn test_no_unlock_keys() {
        let mut lock = VialLock::new(&[]);
        lock.unlocking(Instant::from_millis(0));
        assert_eq!(lock.check_unlock(Instant::from_millis(0), |_, _| true), 1);
        assert!(!lock.is_unlocked());
    }
}
