use recursor_pool::{new_recursor_pool, PoolError, RetrySettings};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn no_retry() -> RetrySettings {
    RetrySettings {
        retry_count: 0,
        retry_delay: Duration::from_millis(0),
    }
}

#[test]
fn serial_pool_tries_every_upstream_in_order_with_no_retries() {
    let pool = new_recursor_pool(
        vec!["a".to_string(), "b".to_string()],
        "serial",
        no_retry(),
    );
    let attempted = std::sync::Mutex::new(Vec::new());
    let result = pool.perform_strategically(&|name| {
        attempted.lock().unwrap().push(name.to_string());
        if name == "a" {
            Err("refused".into())
        } else {
            Ok(())
        }
    });
    assert!(result.is_ok());
    assert_eq!(vec!["a", "b"], *attempted.lock().unwrap());
}

#[test]
fn smart_pool_exhausts_a_single_upstream_and_reports_no_recursor_response() {
    let pool = new_recursor_pool(vec!["only".to_string()], "smart", no_retry());
    let result = pool.perform_strategically(&|_name| Err("down".into()));
    assert_eq!(Err(PoolError::NoRecursorResponse), result);
}

#[test]
fn smart_pool_retries_the_configured_number_of_times() {
    let pool = new_recursor_pool(
        vec!["only".to_string()],
        "smart",
        RetrySettings {
            retry_count: 4,
            retry_delay: Duration::from_millis(0),
        },
    );
    let attempts = AtomicUsize::new(0);
    let result = pool.perform_strategically(&|_name| {
        attempts.fetch_add(1, Ordering::SeqCst);
        Err("down".into())
    });
    assert_eq!(Err(PoolError::NoRecursorResponse), result);
    assert_eq!(4, attempts.load(Ordering::SeqCst));
}

#[test]
fn empty_recursor_list_never_calls_work() {
    let pool = new_recursor_pool(vec![], "smart", no_retry());
    let result = pool.perform_strategically(&|_name| {
        panic!("work should not be called for an empty pool");
    });
    assert_eq!(Err(PoolError::NoRecursorResponse), result);
}
