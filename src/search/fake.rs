//! Scripted browser sessions and pacing for unit tests

use crate::crawler::{Interrupted, Pacer, Pause};
use crate::search::extractor::{ResultPageExtractor, SessionFactory};
use crate::search::{SearchError, SearchQuery};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// One canned results page
#[derive(Debug, Clone, Default)]
pub struct ScriptedPage {
    pub urls: Vec<String>,
    pub bot_blocked: bool,
}

impl ScriptedPage {
    pub fn with_urls<S: AsRef<str>>(urls: &[S]) -> Self {
        Self {
            urls: urls.iter().map(|u| u.as_ref().to_string()).collect(),
            bot_blocked: false,
        }
    }
}

#[derive(Debug, Default)]
struct LogInner {
    launches: usize,
    closes: usize,
    navigations: Vec<SearchQuery>,
    url_reads: usize,
    bot_checks: usize,
    goto_page_calls: usize,
}

/// Call counters shared by every session a test creates
#[derive(Debug, Clone, Default)]
pub struct SessionLog(Arc<Mutex<LogInner>>);

impl SessionLog {
    fn with<T>(&self, f: impl FnOnce(&mut LogInner) -> T) -> T {
        f(&mut self.0.lock().unwrap())
    }

    pub fn launches(&self) -> usize {
        self.with(|l| l.launches)
    }

    pub fn closes(&self) -> usize {
        self.with(|l| l.closes)
    }

    pub fn navigations(&self) -> Vec<SearchQuery> {
        self.with(|l| l.navigations.clone())
    }

    pub fn url_reads(&self) -> usize {
        self.with(|l| l.url_reads)
    }

    pub fn bot_checks(&self) -> usize {
        self.with(|l| l.bot_checks)
    }

    pub fn goto_page_calls(&self) -> usize {
        self.with(|l| l.goto_page_calls)
    }
}

/// Canned engine behaviour, keyed by session number and searched day
#[derive(Debug, Clone, Default)]
pub struct FakeEngine {
    default_pages: Vec<ScriptedPage>,
    pages_by_day: HashMap<NaiveDate, Vec<ScriptedPage>>,
    blocked_sessions: HashSet<usize>,
    blocked_days: HashSet<NaiveDate>,
    failing_launches: HashSet<usize>,
}

impl FakeEngine {
    pub fn new(default_pages: Vec<ScriptedPage>) -> Self {
        Self {
            default_pages,
            ..Self::default()
        }
    }

    pub fn with_day(mut self, day: NaiveDate, pages: Vec<ScriptedPage>) -> Self {
        self.pages_by_day.insert(day, pages);
        self
    }

    /// Session number `n` (1-based launch order) only ever sees the interstitial
    pub fn block_session(mut self, n: usize) -> Self {
        self.blocked_sessions.insert(n);
        self
    }

    /// Every search for `day` hits the interstitial, whatever the session
    pub fn block_day(mut self, day: NaiveDate) -> Self {
        self.blocked_days.insert(day);
        self
    }

    /// Launch number `n` fails outright
    pub fn fail_launch(mut self, n: usize) -> Self {
        self.failing_launches.insert(n);
        self
    }

    fn pages_for(&self, session: usize, day: NaiveDate) -> Vec<ScriptedPage> {
        let mut pages = self
            .pages_by_day
            .get(&day)
            .cloned()
            .unwrap_or_else(|| self.default_pages.clone());

        if self.blocked_sessions.contains(&session) || self.blocked_days.contains(&day) {
            if pages.is_empty() {
                pages.push(ScriptedPage::default());
            }
            for page in &mut pages {
                page.bot_blocked = true;
            }
        }
        pages
    }
}

/// A results page driven by a script instead of a browser
pub struct FakeSession {
    engine: Option<Arc<FakeEngine>>,
    session: usize,
    pages: Vec<ScriptedPage>,
    current: usize,
    log: SessionLog,
}

impl FakeSession {
    /// A session already sitting on the first of `pages`
    pub fn new(pages: Vec<ScriptedPage>, log: SessionLog) -> Self {
        Self {
            engine: None,
            session: 1,
            pages,
            current: 0,
            log,
        }
    }
}

#[async_trait]
impl ResultPageExtractor for FakeSession {
    async fn navigate(&mut self, query: &SearchQuery) -> Result<(), SearchError> {
        self.log.with(|l| l.navigations.push(query.clone()));
        if let Some(engine) = &self.engine {
            self.pages = engine.pages_for(self.session, query.window().from());
        }
        self.current = 0;
        Ok(())
    }

    async fn current_page_urls(&mut self) -> Result<Vec<String>, SearchError> {
        self.log.with(|l| l.url_reads += 1);
        Ok(self
            .pages
            .get(self.current)
            .map(|p| p.urls.clone())
            .unwrap_or_default())
    }

    async fn has_bot_block_signal(&mut self) -> Result<bool, SearchError> {
        self.log.with(|l| l.bot_checks += 1);
        Ok(self
            .pages
            .get(self.current)
            .is_some_and(|p| p.bot_blocked))
    }

    async fn goto_page(&mut self, n: u32) -> Result<bool, SearchError> {
        self.log.with(|l| l.goto_page_calls += 1);
        let index = n as usize - 1;
        if index < self.pages.len() {
            self.current = index;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn close(&mut self) -> Result<(), SearchError> {
        self.log.with(|l| l.closes += 1);
        Ok(())
    }
}

/// Launches [`FakeSession`]s against a shared [`FakeEngine`]
pub struct FakeFactory {
    engine: Arc<FakeEngine>,
    log: SessionLog,
}

impl FakeFactory {
    pub fn new(engine: FakeEngine, log: SessionLog) -> Self {
        Self {
            engine: Arc::new(engine),
            log,
        }
    }
}

#[async_trait]
impl SessionFactory for FakeFactory {
    type Session = FakeSession;

    async fn launch(&self) -> Result<FakeSession, SearchError> {
        let session = self.log.with(|l| {
            l.launches += 1;
            l.launches
        });

        if self.engine.failing_launches.contains(&session) {
            return Err(SearchError::Browser(format!("launch {} failed", session)));
        }

        Ok(FakeSession {
            engine: Some(self.engine.clone()),
            session,
            pages: Vec::new(),
            current: 0,
            log: self.log.clone(),
        })
    }
}

/// Pacer that returns at once and remembers every pause it was asked for
#[derive(Debug, Default)]
pub struct RecordingPacer(Mutex<Vec<Pause>>);

impl RecordingPacer {
    pub fn pauses(&self) -> Vec<Pause> {
        self.0.lock().unwrap().clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, pause: Pause) -> Result<(), Interrupted> {
        self.0.lock().unwrap().push(pause);
        Ok(())
    }
}
