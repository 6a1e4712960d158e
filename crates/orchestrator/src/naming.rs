use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Builds round-1 repository names of the form `iitm-{task}-{nonce}-{stamp}`.
///
/// `stamp` is a millisecond timestamp that strictly increases across calls on
/// the same namer, so identical task/nonce pairs never collide.
#[derive(Debug, Default)]
pub struct RepoNamer {
    last_stamp: AtomicI64,
}

impl RepoNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self, task: &str, nonce: &str) -> String {
        let raw = format!("iitm-{}-{}-{}", task, nonce, self.next_stamp());
        normalize(&raw)
    }

    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last_stamp.load(Ordering::Relaxed);
        loop {
            let next = if now > last { now } else { last + 1 };
            match self.last_stamp.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(current) => last = current,
            }
        }
    }
}

/// Whitespace becomes `-`, everything is lower-cased.
fn normalize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_name_is_lowercase_without_spaces() {
        let name = RepoNamer::new().name("My Cool Task", "Nonce 42");
        assert!(name.starts_with("iitm-my-cool-task-nonce-42-"));
        assert!(!name.chars().any(char::is_whitespace));
        assert_eq!(name, name.to_lowercase());
    }

    #[test]
    fn test_identical_inputs_yield_distinct_names() {
        let namer = RepoNamer::new();
        let first = namer.name("demo", "n1");
        let second = namer.name("demo", "n1");
        assert_ne!(first, second);
    }

    #[test]
    fn test_names_unique_across_threads() {
        let namer = Arc::new(RepoNamer::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let namer = Arc::clone(&namer);
                std::thread::spawn(move || {
                    (0..50).map(|_| namer.name("demo", "n1")).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for name in handle.join().unwrap() {
                assert!(seen.insert(name));
            }
        }
        assert_eq!(seen.len(), 400);
    }
}
