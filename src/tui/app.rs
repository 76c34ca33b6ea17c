use crate::tui::menu::Selector;
use crate::tui::stats::MarketStats;
use crossterm::event::KeyCode;
use depth_ladder::config::AppConfig;
use depth_ladder::{build_view, DepthSource, LadderParams, LadderView, Result};
use log::{info, warn};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_EVENTS: usize = 15;

pub struct App {
    source: Box<dyn DepthSource>,
    pub steps: Selector<Decimal>,
    pub pairs: Selector<String>,
    pub quantity_precision: Selector<u32>,
    pub price_precision: Selector<u32>,
    rows: usize,
    pub view: LadderView,
    pub stats: Option<MarketStats>,
    pub events: VecDeque<(String, Instant)>,
    pub last_update: Option<Instant>,
    pub refresh_interval: Duration,
    pub paused: bool,
    pub total_ticks: u64,
    pub failed_ticks: u64,
    pub last_fetch: Option<Duration>,
}

impl App {
    pub fn new(config: &AppConfig, source: Box<dyn DepthSource>) -> Self {
        let ladder = &config.ladder;

        Self {
            source,
            steps: Selector::new("Aggregate Level", ladder.aggregation_steps.clone())
                .selecting(|s| *s == ladder.default_step),
            pairs: Selector::new("Pair", ladder.pairs.clone())
                .selecting(|p| p.eq_ignore_ascii_case(&ladder.default_pair)),
            quantity_precision: Selector::new("Quantity Precision", ladder.precisions.clone())
                .selecting(|p| *p == ladder.quantity_precision),
            price_precision: Selector::new("Price Precision", ladder.precisions.clone())
                .selecting(|p| *p == ladder.price_precision),
            rows: ladder.rows,
            view: LadderView::default(),
            stats: None,
            events: VecDeque::new(),
            last_update: None,
            refresh_interval: config.refresh_interval(),
            paused: false,
            total_ticks: 0,
            failed_ticks: 0,
            last_fetch: None,
        }
    }

    pub fn params(&self) -> LadderParams {
        LadderParams {
            step: *self.steps.current(),
            price_precision: *self.price_precision.current(),
            quantity_precision: *self.quantity_precision.current(),
            rows: self.rows,
        }
    }

    #[inline]
    pub fn pair(&self) -> &str {
        self.pairs.current()
    }

    #[inline]
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// A changed selection refreshes straight away, even while paused; otherwise the timer
    /// decides.
    pub fn is_due(&self) -> bool {
        match self.last_update {
            None => true,
            Some(at) => !self.paused && at.elapsed() >= self.refresh_interval,
        }
    }

    pub fn tick(&mut self) {
        if self.is_due() {
            self.refresh();
        }
    }

    /// One fetch and rebuild. On failure the previous frame is kept until the next tick.
    pub fn refresh(&mut self) {
        let start = Instant::now();
        self.total_ticks += 1;

        match self.fetch_view() {
            Ok((view, stats)) => {
                self.last_fetch = Some(start.elapsed());
                self.view = view;
                self.stats = Some(stats);
            }
            Err(e) => {
                self.failed_ticks += 1;
                warn!("{} refresh for {} failed: {}", self.source.name(), self.pair(), e);
                self.push_event(format!("Refresh failed: {e}"));
            }
        }

        self.last_update = Some(Instant::now());
    }

    fn fetch_view(&mut self) -> Result<(LadderView, MarketStats)> {
        let pair = self.pairs.current().clone();
        let snapshot = self.source.fetch(&pair)?;
        let view = build_view(&snapshot, &self.params())?;
        Ok((view, MarketStats::from_snapshot(&snapshot)))
    }

    fn invalidate(&mut self) {
        self.last_update = None;
    }

    fn push_event(&mut self, message: String) {
        self.events.push_front((message, Instant::now()));
        if self.events.len() > MAX_EVENTS {
            self.events.pop_back();
        }
    }

    fn selection_changed(&mut self, what: &str, value: String) {
        info!("{what} -> {value}");
        self.push_event(format!("{what}: {value}"));
        self.invalidate();
    }

    /// Applies a key press. Returns `true` when the app should exit.
    pub fn on_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char(' ') => {
                self.paused = !self.paused;
                let state = if self.paused { "paused" } else { "resumed" };
                self.push_event(format!("Refresh {state}"));
            }
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('s') => {
                let step = self.steps.next().to_string();
                self.selection_changed("Aggregate level", step);
            }
            KeyCode::Char('S') => {
                let step = self.steps.prev().to_string();
                self.selection_changed("Aggregate level", step);
            }
            KeyCode::Char('p') => {
                let pair = self.pairs.next().clone();
                self.selection_changed("Pair", pair);
            }
            KeyCode::Char('P') => {
                let pair = self.pairs.prev().clone();
                self.selection_changed("Pair", pair);
            }
            KeyCode::Char('d') => {
                let dp = self.price_precision.next().to_string();
                self.selection_changed("Price precision", dp);
            }
            KeyCode::Char('D') => {
                let dp = self.price_precision.prev().to_string();
                self.selection_changed("Price precision", dp);
            }
            KeyCode::Char('v') => {
                let dp = self.quantity_precision.next().to_string();
                self.selection_changed("Quantity precision", dp);
            }
            KeyCode::Char('V') => {
                let dp = self.quantity_precision.prev().to_string();
                self.selection_changed("Quantity precision", dp);
            }
            _ => {}
        }

        false
    }
}
