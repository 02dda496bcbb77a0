use async_trait::async_trait;
use eventhub_framework::{
    project, HookError, Lifecycle, LifecycleHook, LifecycleState, Record,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};

// --- Test Record ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Reading {
    id: String,
    sensor: String,
    celsius: f64,
}

impl Record for Reading {
    const COLLECTION: &'static str = "readings";

    fn identity(&self) -> &str {
        &self.id
    }

    fn assign_identity(&mut self, id: String) {
        self.id = id;
    }
}

// --- Test Hooks ---

/// Pretends to be a store: start opens it, stop closes it.
struct Store {
    open: Arc<Mutex<bool>>,
}

#[async_trait]
impl LifecycleHook for Store {
    fn name(&self) -> &str {
        "store"
    }

    async fn start(&mut self) -> Result<(), HookError> {
        *self.open.lock().unwrap() = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), HookError> {
        *self.open.lock().unwrap() = false;
        Ok(())
    }
}

/// Writes one projected record on start; refuses to start against a closed store.
struct Writer {
    open: Arc<Mutex<bool>>,
    written: Arc<Mutex<Vec<bson::Document>>>,
    record: Reading,
}

#[async_trait]
impl LifecycleHook for Writer {
    fn name(&self) -> &str {
        "writer"
    }

    async fn start(&mut self) -> Result<(), HookError> {
        if !*self.open.lock().unwrap() {
            return Err("store is not open".into());
        }
        let doc = project(&self.record)?;
        self.written.lock().unwrap().push(doc);
        self.record.assign_identity("r-1".into());
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), HookError> {
        if !*self.open.lock().unwrap() {
            return Err("store closed before writer stopped".into());
        }
        Ok(())
    }
}

// --- Tests ---

#[tokio::test]
async fn test_dependent_hook_sees_dependency_on_start_and_stop() {
    let open = Arc::new(Mutex::new(false));
    let written = Arc::new(Mutex::new(Vec::new()));

    let mut lifecycle = Lifecycle::new();
    lifecycle
        .append(
            LifecycleState::Connecting,
            Store { open: open.clone() },
        )
        .append(
            LifecycleState::Serving,
            Writer {
                open: open.clone(),
                written: written.clone(),
                record: Reading {
                    id: String::new(),
                    sensor: "north".into(),
                    celsius: 21.5,
                },
            },
        );

    lifecycle.start().await.unwrap();
    assert_eq!(lifecycle.state(), LifecycleState::Serving);

    // Writer stops before Store, so its stop hook still sees an open store
    lifecycle.stop().await.unwrap();
    assert!(!*open.lock().unwrap());

    let written = written.lock().unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(
        written[0],
        bson::doc! { "sensor": "north", "celsius": 21.5 }
    );
}

#[tokio::test]
async fn test_registration_order_decides_boot_success() {
    let open = Arc::new(Mutex::new(false));
    let written = Arc::new(Mutex::new(Vec::new()));

    // Writer registered first: it starts against a closed store and boot aborts
    let mut lifecycle = Lifecycle::new();
    lifecycle
        .append(
            LifecycleState::Serving,
            Writer {
                open: open.clone(),
                written: written.clone(),
                record: Reading {
                    id: String::new(),
                    sensor: "south".into(),
                    celsius: 3.0,
                },
            },
        )
        .append(
            LifecycleState::Connecting,
            Store { open: open.clone() },
        );

    let err = lifecycle.start().await.unwrap_err();
    assert!(err.to_string().contains("writer"));
    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    assert!(!*open.lock().unwrap(), "store must never have started");
    assert!(written.lock().unwrap().is_empty());
}
