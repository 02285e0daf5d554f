use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

const MAX_NAME_BYTES: usize = 200;

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Issues `<millis>-<filename>` object keys.
///
/// The millisecond part never repeats for one generator: when the clock has
/// not advanced since the last key, the previous value plus one is used.
#[derive(Clone)]
pub struct StorageKeyGenerator {
    last_millis: Arc<AtomicI64>,
    clock: Clock,
}

impl Default for StorageKeyGenerator {
    fn default() -> Self {
        Self::with_clock(|| chrono::Utc::now().timestamp_millis())
    }
}

impl StorageKeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock<F>(clock: F) -> Self
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        Self {
            last_millis: Arc::new(AtomicI64::new(i64::MIN)),
            clock: Arc::new(clock),
        }
    }

    pub fn next_key(&self, file_name: &str) -> String {
        let millis = self.next_millis();
        format!("{}-{}", millis, sanitize_key_name(file_name))
    }

    fn next_millis(&self) -> i64 {
        let now = (self.clock)();
        let mut issued = now;
        // fetch_update only fails if the closure returns None
        let _ = self
            .last_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                issued = if now > last { now } else { last + 1 };
                Some(issued)
            });
        issued
    }
}

/// Make a filename safe to embed in an object key.
pub fn sanitize_key_name(file_name: &str) -> String {
    let sanitized: String = file_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_control()
                || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ';' | '#')
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    if sanitized.is_empty() {
        return "unnamed".to_string();
    }

    if sanitized.len() > MAX_NAME_BYTES {
        let mut end = MAX_NAME_BYTES;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized[..end].to_string()
    } else {
        sanitized
    }
}
