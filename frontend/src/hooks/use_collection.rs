//! Fetch-on-mount, refetch-after-mutation state for one bound collection.
//!
//! A `CollectionSync` owns an immutable snapshot of the collection as of the
//! last committed fetch. Mutations never patch the snapshot; the view calls
//! `after_mutation` and the whole collection is listed again. Fetches that
//! overlap are fenced by issue order, so a slow response for an older fetch
//! can never replace a snapshot committed by a newer one.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use shared::{AttendanceRecord, Employee};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::services::api::ApiError;
use crate::services::attendance::AttendanceApi;
use crate::services::employees::EmployeeApi;

/// A collection that can be listed in full
#[async_trait]
pub trait CollectionSource: Send + Sync {
    type Item: Clone + Send + Sync + 'static;

    async fn list_all(&self) -> Result<Vec<Self::Item>, ApiError>;
}

#[async_trait]
impl CollectionSource for EmployeeApi {
    type Item = Employee;

    async fn list_all(&self) -> Result<Vec<Employee>, ApiError> {
        EmployeeApi::list_all(self).await
    }
}

#[async_trait]
impl CollectionSource for AttendanceApi {
    type Item = AttendanceRecord;

    async fn list_all(&self) -> Result<Vec<AttendanceRecord>, ApiError> {
        AttendanceApi::list_all(self).await
    }
}

/// Attendance for a single employee, filtered by the service
#[derive(Clone)]
pub struct EmployeeAttendanceSource {
    api: AttendanceApi,
    employee_id: String,
}

impl EmployeeAttendanceSource {
    pub fn new(api: AttendanceApi, employee_id: impl Into<String>) -> Self {
        Self {
            api,
            employee_id: employee_id.into(),
        }
    }

    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }
}

#[async_trait]
impl CollectionSource for EmployeeAttendanceSource {
    type Item = AttendanceRecord;

    async fn list_all(&self) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.api.list_by_employee(&self.employee_id).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Loading,
    Ready,
}

/// Signal asking the view to bring the related section into view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollIntoView;

/// Pending one-shot scroll signal. Dropping the token cancels it.
#[derive(Debug)]
pub struct ScrollTimer {
    handle: JoinHandle<()>,
}

impl ScrollTimer {
    fn schedule(delay: Duration, sender: mpsc::UnboundedSender<ScrollIntoView>) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the view is gone
            let _ = sender.send(ScrollIntoView);
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScrollTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct SyncState<T> {
    phase: SyncPhase,
    snapshot: Arc<[T]>,
    in_flight: usize,
    issued: u64,
    committed: u64,
    last_error: Option<ApiError>,
    scroll_timer: Option<ScrollTimer>,
}

/// Decrements the in-flight count even if the fetch future is dropped
struct InFlight<'a, T> {
    state: &'a Mutex<SyncState<T>>,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0 {
            state.phase = SyncPhase::Ready;
        }
    }
}

fn lock<T>(state: &Mutex<SyncState<T>>) -> MutexGuard<'_, SyncState<T>> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// View-bound synchronization state for one collection
pub struct CollectionSync<S: CollectionSource> {
    source: S,
    state: Mutex<SyncState<S::Item>>,
    scroll_delay: Duration,
    scroll_sender: Option<mpsc::UnboundedSender<ScrollIntoView>>,
}

impl<S: CollectionSource> CollectionSync<S> {
    pub fn new(source: S, scroll_delay: Duration) -> Self {
        Self {
            source,
            state: Mutex::new(SyncState {
                phase: SyncPhase::Idle,
                snapshot: Arc::from(Vec::new()),
                in_flight: 0,
                issued: 0,
                committed: 0,
                last_error: None,
                scroll_timer: None,
            }),
            scroll_delay,
            scroll_sender: None,
        }
    }

    /// Receive scroll-into-view signals. A later subscription replaces an earlier one.
    pub fn subscribe_scroll(&mut self) -> mpsc::UnboundedReceiver<ScrollIntoView> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.scroll_sender = Some(sender);
        receiver
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn phase(&self) -> SyncPhase {
        lock(&self.state).phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == SyncPhase::Loading
    }

    /// Last committed snapshot (empty until a fetch succeeds)
    pub fn snapshot(&self) -> Arc<[S::Item]> {
        Arc::clone(&lock(&self.state).snapshot)
    }

    /// Failure of the most recent fetch, cleared by the next commit
    pub fn last_error(&self) -> Option<ApiError> {
        lock(&self.state).last_error.clone()
    }

    pub fn has_pending_scroll(&self) -> bool {
        lock(&self.state)
            .scroll_timer
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Initial load when the view appears
    pub async fn mount(&self) -> Result<(), ApiError> {
        self.refresh().await
    }

    /// List the whole collection again and commit it unless a newer fetch already has.
    ///
    /// On failure the previous snapshot stays in place; the transport has
    /// already notified the user.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let sequence = {
            let mut state = lock(&self.state);
            state.issued += 1;
            state.in_flight += 1;
            state.phase = SyncPhase::Loading;
            state.issued
        };
        let _in_flight = InFlight { state: &self.state };

        let result = self.source.list_all().await;

        let mut state = lock(&self.state);
        match result {
            Ok(items) => {
                if sequence > state.committed {
                    tracing::debug!(
                        component = "sync",
                        sequence,
                        items = items.len(),
                        "snapshot committed"
                    );
                    state.snapshot = Arc::from(items);
                    state.committed = sequence;
                    state.last_error = None;
                } else {
                    tracing::debug!(
                        component = "sync",
                        sequence,
                        committed = state.committed,
                        "discarding superseded snapshot"
                    );
                }
                Ok(())
            }
            Err(error) => {
                tracing::warn!(
                    component = "sync",
                    sequence,
                    "keeping previous snapshot: {}",
                    error
                );
                state.last_error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Refetch after a successful create or delete, optionally scheduling a
    /// scroll signal once the new snapshot is committed.
    pub async fn after_mutation(&self, bring_into_view: bool) -> Result<(), ApiError> {
        self.refresh().await?;

        if bring_into_view {
            if let Some(sender) = &self.scroll_sender {
                let timer = ScrollTimer::schedule(self.scroll_delay, sender.clone());
                // Replacing the token cancels a still-pending signal
                lock(&self.state).scroll_timer = Some(timer);
            }
        }

        Ok(())
    }

    /// Cancel any pending scroll signal; call when the view goes away
    pub fn teardown(&self) {
        if lock(&self.state).scroll_timer.take().is_some() {
            tracing::debug!(component = "sync", "cancelled pending scroll signal");
        }
    }
}
