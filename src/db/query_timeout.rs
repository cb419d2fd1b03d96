// Store call timeout protection
use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::service::error::ServiceError;

pub struct QueryTimeout;

impl QueryTimeout {
    /// Run a store call under a deadline. A call that runs out of time fails
    /// closed with `TransientStore`; dropping the future rolls back any open
    /// transaction it holds.
    pub async fn run<F, T, E>(timeout_duration: Duration, query_fn: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<ServiceError>,
    {
        match timeout(timeout_duration, query_fn).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(ServiceError::TransientStore(format!(
                "store call timed out after {:?}",
                timeout_duration
            ))),
        }
    }
}
