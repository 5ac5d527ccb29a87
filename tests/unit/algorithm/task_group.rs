//! Tests for deadline-bounded worker groups

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;
    use tessera::algorithm::task_group::{CancelToken, TaskGroup};

    // Tests every task result is collected in index order
    // Verified by collecting results in arrival order
    #[test]
    fn test_results_in_index_order() {
        let mut group = TaskGroup::new("unit");
        for index in 0..4u64 {
            group
                .spawn(move |_| {
                    thread::sleep(Duration::from_millis(40 - index * 10));
                    index * 2
                })
                .unwrap();
        }
        assert_eq!(group.len(), 4);

        let outcome = group.join_timeout(Duration::from_secs(10));
        assert!(outcome.is_complete());
        assert_eq!(outcome.finished, vec![(0, 0), (1, 2), (2, 4), (3, 6)]);
    }

    // Tests a panicking task is reported without losing the others
    // Verified by propagating the panic to the caller
    #[test]
    fn test_panic_reported() {
        let mut group = TaskGroup::new("unit");
        group.spawn(|_| 1).unwrap();
        group
            .spawn(|_| -> i32 { panic!("task failure") })
            .unwrap();

        let outcome = group.join_timeout(Duration::from_secs(10));
        assert_eq!(outcome.finished, vec![(0, 1)]);
        assert_eq!(outcome.panicked, vec![1]);
        assert!(!outcome.is_complete());
    }

    // Tests a timeout cancels the token and returns what finished
    // Verified by waiting for every task regardless of the deadline
    #[test]
    fn test_timeout_cancels() {
        let mut group = TaskGroup::new("unit");
        let token = group.token();
        group.spawn(|_| 0).unwrap();
        group
            .spawn(|token: CancelToken| {
                while !token.is_cancelled() {
                    thread::sleep(Duration::from_millis(5));
                }
                1
            })
            .unwrap();

        let outcome = group.join_timeout(Duration::from_millis(200));
        assert!(outcome.timed_out);
        assert_eq!(outcome.finished, vec![(0, 0)]);
        assert!(token.is_cancelled());
    }

    // Tests a task that stops on cancellation is still collected during the settle time
    // Verified by returning as soon as the deadline passes
    #[test]
    fn test_settle_collects_cancelled_tasks() {
        let mut group = TaskGroup::new("unit").with_settle_time(Duration::from_secs(10));
        group.spawn(|_| 0).unwrap();
        group
            .spawn(|token: CancelToken| {
                while !token.is_cancelled() {
                    thread::sleep(Duration::from_millis(5));
                }
                1
            })
            .unwrap();

        let outcome = group.join_timeout(Duration::from_millis(100));
        assert!(outcome.timed_out);
        assert_eq!(outcome.finished, vec![(0, 0), (1, 1)]);
        assert!(!outcome.is_complete());
    }

    // Tests an empty group joins immediately
    // Verified by waiting for the full timeout on empty groups
    #[test]
    fn test_empty_group() {
        let group: TaskGroup<()> = TaskGroup::new("unit");
        assert!(group.is_empty());
        let outcome = group.join_timeout(Duration::from_secs(60));
        assert!(outcome.is_complete());
        assert!(outcome.finished.is_empty());
    }

    // Tests cancelling a clone is visible through the original token
    // Verified by giving each clone its own flag
    #[test]
    fn test_token_shared() {
        let token = CancelToken::default();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
