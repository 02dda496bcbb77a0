//! # Event Manager Handler
//!
//! `NewEvent` projects the incoming event, inserts it and returns it with the
//! store-generated id. The remaining methods are declared by the schema and answer
//! `UNIMPLEMENTED` until they are built.
//!
//! Handlers share one [`DocumentStore`] and hold no other state, so any number of
//! requests run concurrently. A request whose deadline passes is dropped by the server,
//! which cancels the pending insert with it.

use super::error::{unimplemented_method, ServiceError};
use crate::proto::event_manager_server::{EventManager, EventManagerServer};
use crate::proto::{Event, FindEventsRequest, ListEventsRequest};
use crate::store::{insert_record, DocumentStore};
use eventhub_framework::Record;
use futures::stream::BoxStream;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::{debug, error, info, instrument};

/// Implementation of the `EventManager` service over a [`DocumentStore`].
pub struct EventService<S> {
    store: Arc<S>,
}

impl<S> Clone for EventService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: DocumentStore> EventService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Wraps the handler in the generated tonic service.
    pub fn into_server(self) -> EventManagerServer<Self> {
        EventManagerServer::new(self)
    }

    /// Persists a new event and returns it with its assigned id.
    ///
    /// Any id sent by the caller is discarded; the store is the only source of ids.
    pub async fn create(&self, mut event: Event) -> Result<Event, ServiceError> {
        if event.is_persisted() {
            debug!(caller_id = %event.id, "Ignoring caller-supplied id");
            event.id.clear();
        }

        match insert_record(self.store.as_ref(), &event).await {
            Ok(id) => {
                event.assign_identity(id);
                info!(id = %event.id, ?event, "Inserted new event");
                Ok(event)
            }
            Err(e) => {
                error!(error = %e, ?event, "Failed to insert event");
                Err(e.into())
            }
        }
    }
}

#[tonic::async_trait]
impl<S: DocumentStore> EventManager for EventService<S> {
    #[instrument(name = "NewEvent", skip_all)]
    async fn new_event(&self, request: Request<Event>) -> Result<Response<Event>, Status> {
        let event = self.create(request.into_inner()).await?;
        Ok(Response::new(event))
    }

    async fn update_event(&self, _request: Request<Event>) -> Result<Response<Event>, Status> {
        Err(unimplemented_method!(update_event).into())
    }

    async fn delete_event(&self, _request: Request<Event>) -> Result<Response<()>, Status> {
        Err(unimplemented_method!(delete_event).into())
    }

    type ListEventsStream = BoxStream<'static, Result<Event, Status>>;

    async fn list_events(
        &self,
        _request: Request<ListEventsRequest>,
    ) -> Result<Response<Self::ListEventsStream>, Status> {
        Err(unimplemented_method!(list_events).into())
    }

    type FindEventsStream = BoxStream<'static, Result<Event, Status>>;

    async fn find_events(
        &self,
        _request: Request<FindEventsRequest>,
    ) -> Result<Response<Self::FindEventsStream>, Status> {
        Err(unimplemented_method!(find_events).into())
    }
}
