use std::time::Instant;

use ratatui::layout::Rect;

use crate::config::Config;
use crate::deck::LessonRef;
use crate::session::controller::{Dispatch, ReviewController, Timings};
use crate::session::report::CompletionReport;
use crate::session::selector::{DeckSelector, PracticeMode, PreviewDirection};
use crate::session::state::Verdict;
use crate::ui::layout::ReviewLayout;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Selector,
    Review,
    Report,
}

pub struct App {
    pub screen: AppScreen,
    pub selector: DeckSelector,
    pub review: Option<ReviewController>,
    pub report: Option<CompletionReport>,
    pub config: Config,
    pub theme: &'static Theme,
    pub timings: Timings,
    pub title_override: Option<String>,
    pub notice: Option<String>,
    pub viewport: Rect,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, lessons: Vec<LessonRef>, timings: Timings) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let mut selector = DeckSelector::new(lessons, config.shuffle);
        selector.load();

        Self {
            screen: AppScreen::Selector,
            selector,
            review: None,
            report: None,
            config,
            theme,
            timings,
            title_override: None,
            notice: None,
            viewport: Rect::default(),
            should_quit: false,
        }
    }

    pub fn review_layout(&self) -> ReviewLayout {
        ReviewLayout::new(self.viewport)
    }

    pub fn preview(&mut self, direction: PreviewDirection) {
        self.selector.preview(direction);
    }

    pub fn cycle_lesson(&mut self, forward: bool) {
        if self.selector.cycle_lesson(forward) {
            self.notice = None;
            self.selector.load();
        }
    }

    pub fn retry_load(&mut self) {
        self.notice = None;
        self.selector.retry();
    }

    pub fn launch(&mut self, mode: PracticeMode, now: Instant) {
        let handoff = match self.selector.select_mode(mode, self.title_override.as_deref()) {
            Ok(handoff) => handoff,
            Err(err) => {
                self.notice = Some(err.to_string());
                return;
            }
        };
        match ReviewController::new(handoff, self.timings, now) {
            Ok(controller) => {
                self.notice = None;
                self.review = Some(controller);
                self.report = None;
                self.screen = AppScreen::Review;
            }
            Err(err) => self.notice = Some(err.to_string()),
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(review) = self.review.as_mut() {
            review.tick(now);
        }
    }

    pub fn skip_loading(&mut self, now: Instant) {
        if let Some(review) = self.review.as_mut() {
            review.skip_loading(now);
        }
    }

    pub fn flip(&mut self, now: Instant) {
        if let Some(review) = self.review.as_mut() {
            review.flip(now);
        }
    }

    pub fn judge(&mut self, verdict: Verdict, now: Instant) {
        let dispatch = match self.review.as_mut() {
            Some(review) => review.judge(verdict, now),
            None => return,
        };
        if dispatch == Dispatch::Applied {
            self.check_completed();
        }
    }

    pub fn drag_start(&mut self, column: u16) {
        if let Some(review) = self.review.as_mut() {
            review.drag_start(column);
        }
    }

    pub fn drag_move(&mut self, column: u16) {
        if let Some(review) = self.review.as_mut() {
            review.drag_move(column);
        }
    }

    pub fn drag_release(&mut self, column: u16, now: Instant) {
        let width = self.review_layout().card.width;
        let dispatch = match self.review.as_mut() {
            Some(review) => review.drag_release(column, width, now),
            None => return,
        };
        if dispatch == Some(Dispatch::Applied) {
            self.check_completed();
        }
    }

    fn check_completed(&mut self) {
        let Some(review) = self.review.as_ref() else {
            return;
        };
        if let Some(result) = review.result() {
            self.report = Some(CompletionReport::new(result.clone(), review.deck().clone()));
            self.screen = AppScreen::Report;
        }
    }

    /// Back out of a running session. Nothing is kept.
    pub fn leave_review(&mut self) {
        if let Some(review) = self.review.take() {
            let judged = review.state().map(|s| s.judged()).unwrap_or(0);
            tracing::debug!(title = %review.title(), judged, "review abandoned");
        }
        self.screen = AppScreen::Selector;
    }

    pub fn restart(&mut self, now: Instant) {
        let Some(report) = self.report.take() else {
            return;
        };
        let handoff = report.restart();
        let outcome = if let Some(review) = self.review.as_mut() {
            review.accept(handoff, now)
        } else {
            ReviewController::new(handoff, self.timings, now).map(|c| self.review = Some(c))
        };
        match outcome {
            Ok(()) => self.screen = AppScreen::Review,
            Err(err) => {
                self.notice = Some(err.to_string());
                self.review = None;
                self.screen = AppScreen::Selector;
            }
        }
    }

    pub fn exit_report(&mut self) {
        if let Some(report) = self.report.take() {
            report.exit();
        }
        self.review = None;
        self.screen = AppScreen::Selector;
    }

    pub fn cycle_theme(&mut self) {
        let themes = Theme::available_themes();
        if let Some(idx) = themes.iter().position(|t| *t == self.config.theme) {
            let next = (idx + 1) % themes.len();
            self.config.theme = themes[next].clone();
        } else if let Some(first) = themes.first() {
            self.config.theme = first.clone();
        }
        if let Some(new_theme) = Theme::load(&self.config.theme) {
            let theme: &'static Theme = Box::leak(Box::new(new_theme));
            self.theme = theme;
        }
        if let Err(err) = self.config.save() {
            tracing::warn!(error = %err, "failed to save config");
        }
    }
}
