//! Job-title filtering of email datasets.

use alloc::vec::Vec;
use mailgraph_core::{Email, Title};

/// The set of job titles currently shown.
///
/// An email passes the filter when both its sender's and its receiver's
/// titles are enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TitleFilter {
    enabled: [bool; 10],
}

impl Default for TitleFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl TitleFilter {
    /// A filter that lets every email through.
    pub fn all() -> Self {
        Self { enabled: [true; 10] }
    }

    /// A filter that lets nothing through.
    pub fn none() -> Self {
        Self {
            enabled: [false; 10],
        }
    }

    /// A filter that only enables `titles`.
    pub fn only(titles: &[Title]) -> Self {
        let mut filter = Self::none();
        for title in titles {
            filter.enable(*title);
        }
        filter
    }

    pub fn enable(&mut self, title: Title) {
        self.enabled[title.rank() as usize] = true;
    }

    pub fn disable(&mut self, title: Title) {
        self.enabled[title.rank() as usize] = false;
    }

    /// Flips `title` and returns its new state.
    pub fn toggle(&mut self, title: Title) -> bool {
        let slot = &mut self.enabled[title.rank() as usize];
        *slot = !*slot;
        *slot
    }

    #[inline]
    pub fn is_enabled(&self, title: Title) -> bool {
        self.enabled[title.rank() as usize]
    }

    /// Returns the enabled titles in rank order.
    pub fn enabled_titles(&self) -> impl Iterator<Item = Title> + '_ {
        Title::ALL.iter().copied().filter(|title| self.is_enabled(*title))
    }

    #[inline]
    pub fn accepts(&self, email: &Email) -> bool {
        self.is_enabled(email.from_title) && self.is_enabled(email.to_title)
    }

    /// Returns the emails that pass the filter, keeping their order.
    pub fn apply(&self, emails: &[Email]) -> Vec<Email> {
        let kept: Vec<Email> = emails.iter().filter(|e| self.accepts(e)).cloned().collect();
        log::debug!(
            "title filter kept {} of {} email(s)",
            kept.len(),
            emails.len()
        );
        kept
    }
}
