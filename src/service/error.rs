//! Handler errors and their mapping onto gRPC statuses.

use crate::store::StoreError;
use tonic::Status;

/// Message returned to clients for every store-side failure.
pub const INTERNAL_MESSAGE: &str = "an internal error occurred";

/// Errors raised while handling an RPC.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Method {0} is not implemented")]
    Unimplemented(&'static str),
}

/// Clients see a fixed message; the detail stays in the server log.
impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Store(_) => Status::internal(INTERNAL_MESSAGE),
            ServiceError::Unimplemented(method) => {
                Status::unimplemented(format!("method {method} not implemented"))
            }
        }
    }
}

/// `ServiceError::Unimplemented` named after the wire method of a handler.
///
/// `unimplemented_method!(update_event)` reports `UpdateEvent`.
macro_rules! unimplemented_method {
    ($method:ident) => {
        paste::paste! {
            $crate::service::ServiceError::Unimplemented(stringify!([<$method:camel>]))
        }
    };
}

pub(crate) use unimplemented_method;
