use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Returns `prefix` followed by a number not handed out before in this process.
pub fn unique_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed) + 1;
    format!("{}{}", prefix, id)
}

/// Joins class names with single spaces, skipping empty ones.
pub fn join_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> String {
    classes
        .into_iter()
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_id_prefix_and_uniqueness() {
        let first = unique_id("coins-logon-widget-");
        let second = unique_id("coins-logon-widget-");

        assert!(first.starts_with("coins-logon-widget-"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_join_classes() {
        assert_eq!(join_classes(["a", "", "b"]), "a b");
        assert_eq!(join_classes([]), "");
    }
}
