use std::convert::Infallible;
use triomphe::Arc;

pub(crate) fn arc_ptr_compare<T>(first: &Arc<T>, second: &Arc<T>) -> bool {
    Arc::as_ptr(first) == Arc::as_ptr(second)
}

pub(crate) fn into_ok<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
