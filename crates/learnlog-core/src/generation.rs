/// Identifies one issued async request.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct Generation(u64);

impl Generation {
  pub fn value(&self) -> u64 {
    self.0
  }
}

/// Monotonic counter used to drop
/// responses that arrive after a newer
/// request of the same kind was issued.
#[derive(Debug, Default, Clone)]
pub struct RequestGeneration {
  current: u64
}

impl RequestGeneration {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn begin(&mut self) -> Generation {
    self.current += 1;
    Generation(self.current)
  }

  pub fn is_current(
    &self,
    generation: Generation
  ) -> bool {
    generation.0 == self.current
  }

  /// Invalidates everything issued so
  /// far without starting a new request.
  pub fn invalidate(&mut self) {
    self.current += 1;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_latest_generation_is_current() {
    let mut counter =
      RequestGeneration::new();
    let first = counter.begin();
    let second = counter.begin();

    assert!(!counter.is_current(first));
    assert!(counter.is_current(second));
    assert!(second.value() > first.value());
  }

  #[test]
  fn invalidate_retires_outstanding_requests()
  {
    let mut counter =
      RequestGeneration::new();
    let issued = counter.begin();
    counter.invalidate();

    assert!(!counter.is_current(issued));
  }
}
