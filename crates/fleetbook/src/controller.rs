//! The form controller.
//!
//! A [`FormController`] is one editing session over a document collection:
//! it owns the draft, the edit mode, and the cached record list, and
//! reconciles them with the store when the operator submits or removes.
//!
//! Operations take `&self`. State sits behind a mutex that is never held
//! across a store call, so the draft stays editable while a submit is
//! outstanding. Only one submit may be in flight at a time.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::cache::RecordCache;
use crate::config::{RefreshPolicy, SessionConfig};
use crate::error::{Error, Result};
use crate::record::{Draft, Field, Record, RecordFields, RecordId};
use crate::session::{EditMode, EditSession};
use crate::store::DocumentStore;
use crate::validate::validate;

/// What a successful submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new document was created with this id.
    Created(RecordId),
    /// The document with this id was overwritten.
    Updated(RecordId),
}

impl SubmitOutcome {
    /// The id of the affected record.
    #[must_use]
    pub fn id(&self) -> &RecordId {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(id) => write!(f, "created record {id}"),
            Self::Updated(id) => write!(f, "updated record {id}"),
        }
    }
}

/// A point-in-time copy of everything the form shows.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    /// Current edit mode.
    pub mode: EditMode,
    /// Current draft.
    pub draft: Draft,
    /// Message to show above the form, if any.
    pub error: Option<String>,
    /// Cached record list.
    pub records: Vec<Record>,
    /// Whether a submit is outstanding.
    pub submitting: bool,
}

#[derive(Debug, Default)]
struct FormState {
    draft: Draft,
    session: EditSession,
    cache: RecordCache,
    error: Option<String>,
}

impl FormState {
    fn reset(&mut self) {
        self.draft = Draft::empty();
        self.session.finish_submit();
        self.error = None;
    }
}

/// A cache change to apply after a successful mutation.
enum CacheChange {
    Created(Record),
    Updated(RecordId, RecordFields),
    Removed(RecordId),
}

/// Marks a submit as outstanding until dropped.
struct SubmitGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// One editing session over a document collection.
#[derive(Debug)]
pub struct FormController<S> {
    store: Arc<S>,
    settings: SessionConfig,
    state: Mutex<FormState>,
    submitting: AtomicBool,
}

impl<S: DocumentStore> FormController<S> {
    /// Create a session in create mode with an empty cache.
    ///
    /// Most callers want [`FormController::mount`], which also loads the
    /// record list.
    #[must_use]
    pub fn new(store: Arc<S>, settings: SessionConfig) -> Self {
        Self {
            store,
            settings,
            state: Mutex::new(FormState::default()),
            submitting: AtomicBool::new(false),
        }
    }

    /// Start a session and load the record list once.
    ///
    /// A failed initial listing is logged and leaves the cache empty.
    pub async fn mount(store: Arc<S>, settings: SessionConfig) -> Self {
        let controller = Self::new(store, settings);
        match controller.refresh().await {
            Ok(count) => debug!("Session mounted with {} records", count),
            Err(err) => warn!("Initial record listing failed: {}", err),
        }
        controller
    }

    /// End the session, handing back whatever draft was left unsaved.
    #[must_use]
    pub fn unmount(self) -> Draft {
        let state = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        debug!("Session unmounted in {} mode", state.session.mode());
        state.draft
    }

    /// The store this session writes to.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-read the collection into the cache.
    ///
    /// Returns the number of records listed.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails; the cache is left as it was.
    pub async fn refresh(&self) -> Result<usize> {
        let records = self.store.list().await?;
        let count = records.len();
        self.state().cache.replace(records);
        Ok(count)
    }

    /// Replace one field of the draft. No validation happens here.
    pub fn update_field(&self, field: Field, value: &str) {
        let mut state = self.state();
        let next = state.draft.with_field(field, value);
        state.draft = next;
    }

    /// Load a record into the draft and switch to edit mode for it.
    pub fn begin_edit(&self, record: &Record) {
        let mut state = self.state();
        state.draft = Draft::from_record(record);
        state.session.begin_edit(record.id.clone());
        debug!("Editing record {}", record.id);
    }

    /// Like [`FormController::begin_edit`], looking the record up in the cache.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotCached`] if the id is not in the current
    /// listing.
    pub fn begin_edit_by_id(&self, id: &RecordId) -> Result<()> {
        let record = self
            .state()
            .cache
            .get(id)
            .cloned()
            .ok_or_else(|| Error::record_not_cached(id))?;
        self.begin_edit(&record);
        Ok(())
    }

    /// Discard the draft, leave edit mode, and clear the error.
    pub fn cancel(&self) {
        let mut state = self.state();
        state.draft = Draft::empty();
        state.session.cancel();
        state.error = None;
    }

    /// Validate the draft and write it to the store.
    ///
    /// In create mode this creates a document; in edit mode it overwrites the
    /// record being edited. Afterwards the draft is cleared and the session
    /// returns to create mode. When the store call fails the session is
    /// still reset unless `reset_on_store_failure` is off, in which case the
    /// draft is kept and the failure becomes the form's error message.
    ///
    /// # Errors
    ///
    /// - [`Error::SubmitInFlight`] if another submit has not finished.
    /// - [`Error::Validation`] if the draft is incomplete; the draft and mode
    ///   are left untouched and the error message is set.
    /// - [`Error::Store`] if the store call failed.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let Some(_guard) = SubmitGuard::acquire(&self.submitting) else {
            warn!("Submit ignored: a previous submit is still in flight");
            return Err(Error::SubmitInFlight);
        };

        let (mode, fields) = {
            let mut state = self.state();
            if let Err(err) = validate(&state.draft) {
                debug!("Draft rejected: {}", err);
                state.error = Some(err.to_string());
                return Err(err.into());
            }
            (state.session.mode().clone(), state.draft.to_fields())
        };

        let result = match &mode {
            EditMode::Create => self
                .store
                .create(&fields)
                .await
                .map(SubmitOutcome::Created),
            EditMode::Edit(id) => self
                .store
                .update(id, &fields)
                .await
                .map(|()| SubmitOutcome::Updated(id.clone())),
        };

        match result {
            Ok(outcome) => {
                info!("Submit succeeded: {}", outcome);
                self.state().reset();
                let change = match &outcome {
                    SubmitOutcome::Created(id) => {
                        CacheChange::Created(Record::new(id.clone(), fields))
                    }
                    SubmitOutcome::Updated(id) => CacheChange::Updated(id.clone(), fields),
                };
                self.sync_cache(change).await;
                Ok(outcome)
            }
            Err(err) => {
                error!("Submit in {} mode failed: {}", mode, err);
                if self.settings.reset_on_store_failure {
                    self.state().reset();
                } else {
                    self.state().error = Some(err.to_string());
                }
                Err(err.into())
            }
        }
    }

    /// Delete a record from the store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the delete failed, including when the
    /// record does not exist. The cache is not touched in that case.
    pub async fn remove(&self, id: &RecordId) -> Result<()> {
        if let Err(err) = self.store.delete(id).await {
            warn!("Failed to delete record {}: {}", id, err);
            return Err(err.into());
        }

        info!("Deleted record {}", id);
        self.sync_cache(CacheChange::Removed(id.clone())).await;
        Ok(())
    }

    async fn sync_cache(&self, change: CacheChange) {
        match self.settings.refresh {
            RefreshPolicy::Refetch => {
                if let Err(err) = self.refresh().await {
                    warn!("Record list refresh failed, patching cached list: {}", err);
                    self.patch_cache(change);
                }
            }
            RefreshPolicy::LocalPatch => self.patch_cache(change),
        }
    }

    fn patch_cache(&self, change: CacheChange) {
        let mut state = self.state();
        match change {
            CacheChange::Created(record) => state.cache.insert(record),
            CacheChange::Updated(id, fields) => {
                if !state.cache.update(&id, fields) {
                    debug!("Updated record {} was not cached", id);
                }
            }
            CacheChange::Removed(id) => {
                state.cache.remove(&id);
            }
        }
    }

    /// A copy of the current draft.
    #[must_use]
    pub fn draft(&self) -> Draft {
        self.state().draft.clone()
    }

    /// The current edit mode.
    #[must_use]
    pub fn mode(&self) -> EditMode {
        self.state().session.mode().clone()
    }

    /// The message shown above the form, if any.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    /// A copy of the cached record list.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.state().cache.records().to_vec()
    }

    /// Check if a submit is outstanding.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Everything the form shows, captured at once.
    #[must_use]
    pub fn view(&self) -> FormView {
        let state = self.state();
        FormView {
            mode: state.session.mode().clone(),
            draft: state.draft.clone(),
            error: state.error.clone(),
            records: state.cache.records().to_vec(),
            submitting: self.is_submitting(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use tokio::sync::Notify;

    use super::*;
    use crate::logging::init_test_logging;
    use crate::store::{InMemoryStore, StoreError, StoreResult};

    /// Holds a `create` call open until released.
    #[derive(Debug, Default)]
    struct Gate {
        entered: Notify,
        release: Notify,
    }

    /// Wraps an in-memory store, counting calls and optionally failing or
    /// blocking writes.
    #[derive(Debug, Default)]
    struct RecordingStore {
        inner: InMemoryStore,
        lists: AtomicUsize,
        creates: Mutex<Vec<RecordFields>>,
        updates: Mutex<Vec<(RecordId, RecordFields)>>,
        deletes: AtomicUsize,
        fail_writes: AtomicBool,
        fail_lists: AtomicBool,
        gate: Option<Gate>,
    }

    impl RecordingStore {
        fn seeded(records: Vec<Record>) -> Self {
            Self {
                inner: InMemoryStore::with_records("vehicles", records),
                ..Self::default()
            }
        }

        fn gated() -> Self {
            Self {
                gate: Some(Gate::default()),
                ..Self::default()
            }
        }

        fn failing() -> Self {
            let store = Self::default();
            store.fail_writes();
            store
        }

        fn fail_writes(&self) {
            self.fail_writes.store(true, Ordering::SeqCst);
        }

        fn fail_lists(&self) {
            self.fail_lists.store(true, Ordering::SeqCst);
        }

        fn gate(&self) -> &Gate {
            self.gate.as_ref().expect("store is not gated")
        }

        fn lists(&self) -> usize {
            self.lists.load(Ordering::SeqCst)
        }

        fn creates(&self) -> Vec<RecordFields> {
            self.creates.lock().unwrap().clone()
        }

        fn updates(&self) -> Vec<(RecordId, RecordFields)> {
            self.updates.lock().unwrap().clone()
        }

        fn deletes(&self) -> usize {
            self.deletes.load(Ordering::SeqCst)
        }

        fn check_writable(&self) -> StoreResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(StoreError::backend("permission denied"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl DocumentStore for RecordingStore {
        async fn list(&self) -> StoreResult<Vec<Record>> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            if self.fail_lists.load(Ordering::SeqCst) {
                return Err(StoreError::backend("listing unavailable"));
            }
            self.inner.list().await
        }

        async fn create(&self, fields: &RecordFields) -> StoreResult<RecordId> {
            self.creates.lock().unwrap().push(fields.clone());
            if let Some(gate) = &self.gate {
                gate.entered.notify_one();
                gate.release.notified().await;
            }
            self.check_writable()?;
            self.inner.create(fields).await
        }

        async fn update(&self, id: &RecordId, fields: &RecordFields) -> StoreResult<()> {
            self.updates.lock().unwrap().push((id.clone(), fields.clone()));
            self.check_writable()?;
            self.inner.update(id, fields).await
        }

        async fn delete(&self, id: &RecordId) -> StoreResult<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.check_writable()?;
            self.inner.delete(id).await
        }
    }

    fn corolla_fields() -> RecordFields {
        RecordFields {
            plate: "ABC123".to_string(),
            brand: "Toyota".to_string(),
            color: "Red".to_string(),
            model: "Corolla".to_string(),
            engine: "1.8L".to_string(),
            year: "2020".to_string(),
            price: 15000.0,
        }
    }

    fn fill_corolla<S: DocumentStore>(controller: &FormController<S>) {
        controller.update_field(Field::Plate, "ABC123");
        controller.update_field(Field::Brand, "Toyota");
        controller.update_field(Field::Color, "Red");
        controller.update_field(Field::Model, "Corolla");
        controller.update_field(Field::Engine, "1.8L");
        controller.update_field(Field::Year, "2020");
        controller.update_field(Field::Price, "15000");
    }

    fn existing() -> Record {
        Record::new(RecordId::new("existing"), corolla_fields())
    }

    async fn mounted(store: RecordingStore) -> (Arc<RecordingStore>, FormController<RecordingStore>) {
        init_test_logging();
        let store = Arc::new(store);
        let controller = FormController::mount(Arc::clone(&store), SessionConfig::default()).await;
        (store, controller)
    }

    #[tokio::test]
    async fn test_mount_loads_records_once() {
        let (store, controller) = mounted(RecordingStore::seeded(vec![existing()])).await;

        assert_eq!(store.lists(), 1);
        assert_eq!(controller.records(), vec![existing()]);
        assert_eq!(controller.mode(), EditMode::Create);
        assert_eq!(controller.draft(), Draft::empty());
    }

    #[tokio::test]
    async fn test_submit_create_scenario() {
        let (store, controller) = mounted(RecordingStore::default()).await;
        fill_corolla(&controller);

        let outcome = controller.submit().await.unwrap();
        let SubmitOutcome::Created(id) = outcome else {
            panic!("expected a create, got {outcome:?}");
        };

        assert_eq!(store.creates(), vec![corolla_fields()]);
        assert!(store.updates().is_empty());
        assert_eq!(controller.draft(), Draft::empty());
        assert_eq!(controller.mode(), EditMode::Create);
        assert!(controller.error().is_none());

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![Record::new(id.clone(), corolla_fields())]);
        assert_eq!(controller.records(), listed);
    }

    #[tokio::test]
    async fn test_submit_edit_updates_and_never_creates() {
        let (store, controller) = mounted(RecordingStore::seeded(vec![existing()])).await;

        controller.begin_edit_by_id(&RecordId::new("existing")).unwrap();
        assert_eq!(controller.draft().plate, "ABC123");
        controller.update_field(Field::Color, "Silver");

        let outcome = controller.submit().await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Updated(RecordId::new("existing")));

        let updates = store.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, RecordId::new("existing"));
        assert_eq!(updates[0].1.color, "Silver");
        assert!(store.creates().is_empty());

        assert_eq!(controller.mode(), EditMode::Create);
        assert!(controller.mode().target().is_none());
        assert_eq!(controller.records()[0].fields.color, "Silver");
    }

    #[tokio::test]
    async fn test_zero_price_is_rejected_without_store_call() {
        let (store, controller) = mounted(RecordingStore::default()).await;
        fill_corolla(&controller);
        controller.update_field(Field::Price, "0");
        let before = controller.draft();

        let err = controller.submit().await.unwrap_err();

        assert!(err.is_validation());
        assert!(store.creates().is_empty());
        assert!(store.updates().is_empty());
        assert_eq!(controller.draft(), before);
        assert_eq!(controller.error().as_deref(), Some("empty fields"));
        assert!(!controller.is_submitting());
    }

    #[tokio::test]
    async fn test_whitespace_field_rejected_in_edit_mode() {
        let (store, controller) = mounted(RecordingStore::seeded(vec![existing()])).await;
        controller.begin_edit(&existing());
        controller.update_field(Field::Engine, "   ");

        assert!(controller.submit().await.unwrap_err().is_validation());
        assert!(store.updates().is_empty());
        assert_eq!(controller.mode(), EditMode::Edit(RecordId::new("existing")));
        assert_eq!(controller.draft().engine, "   ");
    }

    #[tokio::test]
    async fn test_begin_edit_then_cancel() {
        let (store, controller) = mounted(RecordingStore::seeded(vec![existing()])).await;

        controller.begin_edit(&existing());
        assert!(controller.mode().is_editing());
        controller.cancel();

        assert_eq!(controller.draft(), Draft::empty());
        assert_eq!(controller.mode(), EditMode::Create);
        assert!(store.creates().is_empty());
        assert!(store.updates().is_empty());
        assert_eq!(store.deletes(), 0);
    }

    #[tokio::test]
    async fn test_cancel_clears_error() {
        let (_store, controller) = mounted(RecordingStore::default()).await;
        let _ = controller.submit().await;
        assert!(controller.error().is_some());

        controller.cancel();
        assert!(controller.error().is_none());
    }

    #[tokio::test]
    async fn test_begin_edit_keeps_error_message() {
        let (_store, controller) = mounted(RecordingStore::seeded(vec![existing()])).await;
        let _ = controller.submit().await;

        controller.begin_edit(&existing());
        assert_eq!(controller.error().as_deref(), Some("empty fields"));
    }

    #[tokio::test]
    async fn test_begin_edit_by_unknown_id() {
        let (_store, controller) = mounted(RecordingStore::default()).await;
        let err = controller
            .begin_edit_by_id(&RecordId::new("nope"))
            .unwrap_err();

        assert!(matches!(err, Error::RecordNotCached { .. }));
        assert_eq!(controller.mode(), EditMode::Create);
    }

    #[tokio::test]
    async fn test_remove_existing() {
        let (store, controller) = mounted(RecordingStore::seeded(vec![existing()])).await;

        controller.remove(&RecordId::new("existing")).await.unwrap();

        assert_eq!(store.deletes(), 1);
        assert!(controller.records().is_empty());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_leaves_cache() {
        let (_store, controller) = mounted(RecordingStore::seeded(vec![existing()])).await;
        let before = controller.records();

        let err = controller.remove(&RecordId::new("ghost")).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(controller.records(), before);
    }

    #[tokio::test]
    async fn test_store_failure_resets_by_default() {
        let (store, controller) = mounted(RecordingStore::failing()).await;
        fill_corolla(&controller);

        let err = controller.submit().await.unwrap_err();

        assert!(err.is_store());
        assert_eq!(store.creates().len(), 1);
        assert_eq!(controller.draft(), Draft::empty());
        assert_eq!(controller.mode(), EditMode::Create);
        assert!(controller.error().is_none());
        assert!(!controller.is_submitting());
    }

    #[tokio::test]
    async fn test_update_failure_in_edit_mode_resets_by_default() {
        let (store, controller) = mounted(RecordingStore::seeded(vec![existing()])).await;
        store.fail_writes();
        controller.begin_edit_by_id(&RecordId::new("existing")).unwrap();
        controller.update_field(Field::Color, "Green");

        let err = controller.submit().await.unwrap_err();

        assert!(err.is_store());
        assert!(!err.is_not_found());
        assert_eq!(store.updates().len(), 1);
        assert!(store.creates().is_empty());
        assert_eq!(controller.mode(), EditMode::Create);
        assert!(controller.mode().target().is_none());
        assert_eq!(controller.draft(), Draft::empty());
        assert_eq!(controller.records(), vec![existing()]);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_cache_and_session() {
        let (store, controller) = mounted(RecordingStore::seeded(vec![existing()])).await;
        store.fail_writes();
        controller.begin_edit(&existing());

        let err = controller.remove(&RecordId::new("existing")).await.unwrap_err();

        assert!(err.is_store());
        assert!(!err.is_not_found());
        assert_eq!(store.deletes(), 1);
        assert_eq!(store.lists(), 1);
        assert_eq!(controller.records(), vec![existing()]);
        assert_eq!(controller.mode(), EditMode::Edit(RecordId::new("existing")));
    }

    #[tokio::test]
    async fn test_failed_relist_patches_cache() {
        let (store, controller) = mounted(RecordingStore::seeded(vec![existing()])).await;
        store.fail_lists();
        fill_corolla(&controller);
        controller.update_field(Field::Plate, "NEW001");

        let created = controller.submit().await.unwrap();
        let cached: Vec<RecordId> = controller.records().into_iter().map(|r| r.id).collect();
        assert_eq!(cached.len(), 2);
        assert!(cached.contains(created.id()));

        controller.begin_edit(&existing());
        controller.update_field(Field::Color, "Black");
        controller.submit().await.unwrap();
        controller.remove(created.id()).await.unwrap();

        // mount + three failed re-lists
        assert_eq!(store.lists(), 4);
        let records = controller.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, RecordId::new("existing"));
        assert_eq!(records[0].fields.color, "Black");
    }

    #[tokio::test]
    async fn test_store_failure_keeps_draft_when_configured() {
        init_test_logging();
        let store = Arc::new(RecordingStore::failing());
        let settings = SessionConfig {
            reset_on_store_failure: false,
            ..SessionConfig::default()
        };
        let controller = FormController::mount(Arc::clone(&store), settings).await;
        controller.begin_edit(&existing());

        let err = controller.submit().await.unwrap_err();

        assert!(err.is_store());
        assert_eq!(controller.draft().to_fields(), corolla_fields());
        assert_eq!(controller.mode(), EditMode::Edit(RecordId::new("existing")));
        assert!(controller
            .error()
            .is_some_and(|msg| msg.contains("permission denied")));
    }

    #[tokio::test]
    async fn test_second_submit_rejected_while_in_flight() {
        let (store, controller) = mounted(RecordingStore::gated()).await;
        fill_corolla(&controller);
        let controller = Arc::new(controller);

        let first = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.submit().await })
        };
        store.gate().entered.notified().await;

        assert!(controller.is_submitting());
        assert!(matches!(
            controller.submit().await,
            Err(Error::SubmitInFlight)
        ));

        // The draft stays editable while the call is outstanding
        controller.update_field(Field::Color, "Blue");
        assert_eq!(controller.draft().color, "Blue");

        store.gate().release.notify_one();
        let outcome = first.await.unwrap().unwrap();

        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        assert_eq!(store.creates().len(), 1);
        assert_eq!(store.creates()[0].color, "Red");
        assert!(!controller.is_submitting());
    }

    #[tokio::test]
    async fn test_local_patch_skips_relisting() {
        init_test_logging();
        let store = Arc::new(RecordingStore::seeded(vec![existing()]));
        let settings = SessionConfig {
            refresh: RefreshPolicy::LocalPatch,
            ..SessionConfig::default()
        };
        let controller = FormController::mount(Arc::clone(&store), settings).await;

        fill_corolla(&controller);
        controller.update_field(Field::Plate, "NEW001");
        let created = controller.submit().await.unwrap();

        controller.begin_edit(&existing());
        controller.update_field(Field::Price, "9999");
        controller.submit().await.unwrap();

        controller.remove(&RecordId::new("existing")).await.unwrap();

        assert_eq!(store.lists(), 1);
        let records = controller.records();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0].id, created.id());
        assert_eq!(records[0].fields.plate, "NEW001");
        assert_eq!(records, store.list().await.unwrap());
    }

    #[tokio::test]
    async fn test_refetch_after_each_mutation() {
        let (store, controller) = mounted(RecordingStore::seeded(vec![existing()])).await;
        fill_corolla(&controller);

        controller.submit().await.unwrap();
        controller.remove(&RecordId::new("existing")).await.unwrap();

        // mount + create + delete
        assert_eq!(store.lists(), 3);
        assert_eq!(controller.records().len(), 1);
    }

    #[tokio::test]
    async fn test_view_and_unmount() {
        let (_store, controller) = mounted(RecordingStore::seeded(vec![existing()])).await;
        controller.update_field(Field::Brand, "Nissan");

        let view = controller.view();
        assert_eq!(view.mode, EditMode::Create);
        assert_eq!(view.draft.brand, "Nissan");
        assert_eq!(view.records.len(), 1);
        assert!(!view.submitting);

        let leftover = controller.unmount();
        assert_eq!(leftover.brand, "Nissan");
    }

    #[test]
    fn test_submit_outcome_display() {
        let created = SubmitOutcome::Created(RecordId::new("a"));
        assert_eq!(created.to_string(), "created record a");
        assert_eq!(created.id(), &RecordId::new("a"));
        assert_eq!(
            SubmitOutcome::Updated(RecordId::new("b")).to_string(),
            "updated record b"
        );
    }
}
