//! # Dashboard: one resolved page
//!
//! [`open`] resolves the identity mode and, if a store becomes active, loads a
//! [`Dashboard`] over it. The dashboard owns the timer, the work-type registry,
//! the task panel and the in-memory study history the charts are drawn from.
//!
//! Each collection loads on its own. One that fails to load is logged and left
//! empty; only an unauthorized answer stops the page.
//!
//! A finished countdown is appended to the history first and then written to
//! the store once. A failed write is logged; the history entry stays.

use api::RemoteStore;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use store::local::generate_id;
use store::{SessionStore, Storage, Store, StoreError, StudySession};
use tracing::{info, warn};

use crate::active::ActiveStore;
use crate::mode::{resolve, Mode, SessionStatus};
use crate::stats::{self, Category, DayRow, MonthNav};
use crate::tasks::TaskPanel;
use crate::timer::{Completion, Timer};
use crate::work_types::WorkTypeRegistry;

pub enum Page<S> {
    /// Session status still loading.
    Pending,
    Redirect(&'static str),
    Ready(Box<Dashboard<ActiveStore<S>>>),
}

/// Resolve the mode for this page load and, if active, load the dashboard.
///
/// An unauthorized answer while loading means the session went away between
/// the status check and the first read, and is treated as a redirect.
pub async fn open<S>(
    status: &SessionStatus,
    remote: RemoteStore,
    storage: S,
    today: NaiveDate,
) -> Result<Page<S>, StoreError>
where
    S: Storage + Clone + Send + Sync,
{
    let mode = resolve(status, &storage)?;
    let Some(store) = ActiveStore::for_mode(&mode, remote, storage) else {
        return Ok(match mode {
            Mode::Redirect(path) => Page::Redirect(path),
            _ => Page::Pending,
        });
    };
    info!(guest = store.is_guest(), "store active");

    let mut dashboard = Dashboard::new(store, today);
    match dashboard.load().await {
        Ok(()) => Ok(Page::Ready(Box::new(dashboard))),
        Err(StoreError::Unauthorized) => Ok(Page::Redirect(crate::mode::SIGN_IN_PATH)),
        Err(e) => Err(e),
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard<S> {
    store: S,
    pub timer: Timer,
    pub work_types: WorkTypeRegistry<S>,
    pub tasks: TaskPanel<S>,
    pub months: MonthNav,
    history: Vec<StudySession>,
}

impl<S: Store + Clone> Dashboard<S> {
    pub fn new(store: S, today: NaiveDate) -> Self {
        Self {
            timer: Timer::default(),
            work_types: WorkTypeRegistry::new(store.clone()),
            tasks: TaskPanel::new(store.clone()),
            months: MonthNav::new(today),
            history: Vec::new(),
            store,
        }
    }

    pub fn history(&self) -> &[StudySession] {
        &self.history
    }

    /// Load work types, history and tasks. Fails only with
    /// [`StoreError::Unauthorized`].
    pub async fn load(&mut self) -> Result<(), StoreError> {
        if let Err(e) = self.work_types.refresh().await {
            skip_failed_load("work types", e)?;
        }
        match self.store.list_sessions().await {
            Ok(history) => self.history = history,
            Err(e) => skip_failed_load("study sessions", e)?,
        }
        if let Err(e) = self.tasks.refresh().await {
            skip_failed_load("tasks", e)?;
        }
        Ok(())
    }

    /// Advance the timer by one second, recording a session if it finishes.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> Option<StudySession> {
        let completion = self.timer.tick(now)?;
        self.record(completion).await
    }

    async fn record(&mut self, completion: Completion) -> Option<StudySession> {
        let Some(work_type) = self.work_types.selected() else {
            warn!(minutes = completion.minutes, "no work type selected, session not recorded");
            return None;
        };
        if completion.minutes <= 0 {
            warn!("countdown finished in under half a minute, session not recorded");
            return None;
        }

        let new_session = completion.into_session(work_type.id.clone());
        let pending = StudySession {
            id: generate_id(),
            date: new_session.date,
            duration: new_session.duration,
            work_type_id: new_session.work_type_id.clone(),
        };
        self.history.push(pending.clone());

        match self.store.create_session(new_session).await {
            Ok(saved) => {
                if let Some(entry) = self.history.iter_mut().find(|s| s.id == pending.id) {
                    *entry = saved.clone();
                }
                Some(saved)
            }
            Err(e) => {
                warn!("failed to save study session: {}", e);
                Some(pending)
            }
        }
    }

    pub fn month_rows<Tz: TimeZone>(&self, tz: &Tz) -> Vec<DayRow> {
        stats::month_rows(
            self.months.selected,
            &self.history,
            self.work_types.work_types(),
            tz,
        )
    }

    /// Pie chart data for the month containing `today`.
    pub fn breakdown<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> Vec<Category> {
        stats::category_breakdown(
            stats::YearMonth::of(today),
            &self.history,
            self.work_types.work_types(),
            tz,
        )
    }

    pub fn average_hours_per_day(&self) -> f64 {
        stats::average_hours_per_day(&self.history)
    }
}

fn skip_failed_load(collection: &str, err: StoreError) -> Result<(), StoreError> {
    match err {
        StoreError::Unauthorized => Err(err),
        err => {
            warn!(collection, "failed to load, showing it empty: {}", err);
            Ok(())
        }
    }
}
