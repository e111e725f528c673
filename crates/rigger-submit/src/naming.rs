//! Unique name generation for form entities.

/// Smallest `prefix_N` (N >= `start`) absent from `used_names`, plus the
/// suffix to try next time. Chaining the returned suffix keeps repeated
/// calls from re-scanning the same range:
///
/// ```
/// use rigger_submit::create_unique_name;
///
/// let used = vec!["task_0".to_string()];
/// let (name, next) = create_unique_name(&used, "task", 0);
/// assert_eq!(name, "task_1");
/// assert_eq!(next, 2);
/// ```
pub fn create_unique_name(used_names: &[String], prefix: &str, start: usize) -> (String, usize) {
    let mut suffix = start;
    loop {
        let candidate = format!("{prefix}_{suffix}");
        suffix += 1;
        if !used_names.iter().any(|name| *name == candidate) {
            return (candidate, suffix);
        }
    }
}
