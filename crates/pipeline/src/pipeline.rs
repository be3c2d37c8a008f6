//! The end-to-end correspondence pipeline.
//!
//! Loaded emails pass the title filter and are then windowed by time: every
//! filtered dataset becomes one window stream, a `dynamic_slice` over the
//! date-sorted emails driven by the current time range. `diff_switch_all`
//! merges the window streams, so loading a dataset or changing the filter
//! retracts the previous window and inserts the new one in a single diff.
//!
//! Two branches share that merged stream. The "all" branch shows every
//! correspondent of the filtered dataset, the "active" branch only those
//! with an email in the window. A second `diff_switch_all` follows whichever
//! branch the show-all switch selects.
//!
//! Alongside the diffs, `timeline()` reports how many filtered emails were
//! sent on each day.

use crate::config::PipelineConfig;
use crate::correspondents::dynamic_correspondents;
use crate::filter::TitleFilter;
use crate::types::{Changes, EmailDiff, Emails, People, PeopleDiff};
use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::hash::Hash;
use mailgraph_core::{
    email_counts_by_day, get_correspondents, parse_emails, sort_by_date, Email, EmailId,
    IdAllocator, Result, TimeIndex,
};
use mailgraph_incremental::{Dataset, DatasetDiff, DiffPolicy, Window};
use mailgraph_reactive::{
    combine_latest, diff_stream, diff_switch_all, dynamic_slice, Observable, Subject, Subscription,
};

/// Full people and email datasets.
type Snapshot = (Rc<People>, Rc<Emails>);

/// A branch emission: the datasets and the changes that produced them.
type BranchState = (Snapshot, Changes);

/// A window stream emission: the dataset's correspondents, the emails in
/// the window and the email changes of the last window move.
type WindowState = (Rc<People>, Rc<Emails>, EmailDiff);

/// Diffs two shared datasets, skipping the work when both are the same
/// allocation.
fn diff_shared<K, V>(policy: DiffPolicy, prev: &Rc<Dataset<K, V>>, cur: &Rc<Dataset<K, V>>) -> DatasetDiff<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
{
    if Rc::ptr_eq(prev, cur) {
        return DatasetDiff::new();
    }
    policy.diff(&**prev, &**cur)
}

/// Builds the window stream of one filtered dataset.
fn window_stream(emails: &Rc<Vec<Email>>, days: &Observable<(i64, i64)>) -> Observable<WindowState> {
    if emails.is_empty() {
        return Observable::of(vec![(Rc::default(), Rc::default(), EmailDiff::new())]);
    }

    let index = TimeIndex::new(emails);
    let people = Rc::new(get_correspondents(emails));
    log::debug!(
        "windowing {} email(s) between {} correspondent(s) over {} day(s)",
        emails.len(),
        people.len(),
        index.span()
    );

    let keyed: Rc<Vec<(EmailId, Email)>> =
        Rc::new(emails.iter().map(|email| (email.id, email.clone())).collect());
    let windows = days.map(move |(begin, end)| Window::from(index.window(begin, end)));

    dynamic_slice(keyed, &windows).scan(
        (people, Rc::new(Emails::new()), EmailDiff::new()),
        |(people, mut emails, _): WindowState, diff: EmailDiff| {
            diff.apply(Rc::make_mut(&mut emails));
            (people, emails, diff)
        },
    )
}

/// Every correspondent of the filtered dataset, emails in the window.
fn all_nodes(
    emails: &Observable<Rc<Vec<Email>>>,
    days: &Observable<(i64, i64)>,
    policy: DiffPolicy,
) -> Observable<BranchState> {
    let days = days.clone();
    let window_streams = emails.map(move |emails: Rc<Vec<Email>>| window_stream(&emails, &days));

    let merged = diff_switch_all(
        &window_streams,
        || Rc::new(Emails::new()),
        move |prev: &Rc<Emails>, cur: &Rc<Emails>| diff_shared(policy, prev, cur),
        |state: &WindowState| &state.1,
        |state: &WindowState| &state.2,
    )
    .map(|((people, emails, _), email_diff): (WindowState, EmailDiff)| (people, emails, email_diff));

    let seed: WindowState = (Rc::default(), Rc::default(), EmailDiff::new());
    diff_stream(&merged, seed, move |prev: &WindowState, cur: &WindowState| {
        let people_diff = diff_shared(policy, &prev.0, &cur.0);
        (
            (Rc::clone(&cur.0), Rc::clone(&cur.1)),
            (people_diff, cur.2.clone()),
        )
    })
}

/// Only correspondents with an email in the window.
fn fewer_nodes(all_nodes: &Observable<BranchState>) -> Observable<BranchState> {
    let emails = all_nodes.map(|((_, emails), (_, email_diff)): BranchState| (emails, email_diff));

    let seed: BranchState = ((Rc::default(), Rc::default()), (PeopleDiff::new(), EmailDiff::new()));
    dynamic_correspondents(
        &emails,
        |(_, email_diff): &(Rc<Emails>, EmailDiff)| email_diff,
        |(emails, email_diff), people_diff| (emails, people_diff, email_diff),
    )
    .scan(
        seed,
        |((mut people, _), _): BranchState, (emails, people_diff, email_diff): (Rc<Emails>, PeopleDiff, EmailDiff)| {
            people_diff.apply(Rc::make_mut(&mut people));
            ((people, emails), (people_diff, email_diff))
        },
    )
}

/// Turns loaded email datasets and user controls into one stream of people
/// and email diffs.
///
/// Inputs are pushed through the `load`, `set_*` methods; every subscriber
/// of `changes()` first receives the current state as insertions and then
/// every change after it.
pub struct CorrespondencePipeline {
    config: PipelineConfig,
    emails: Subject<Rc<Vec<Email>>>,
    title_filter: Subject<TitleFilter>,
    time_range: Subject<(i64, i64)>,
    show_all_nodes: Subject<bool>,
    changes: Observable<Changes>,
    timeline: Observable<Vec<(i64, usize)>>,
    /// Keeps both branches running so switching between them is immediate.
    _branches: [Subscription; 2],
}

impl CorrespondencePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let emails = Subject::replaying();
        let title_filter = Subject::with_value(TitleFilter::all());
        let time_range = Subject::with_value(config.initial_days());
        let show_all_nodes = Subject::with_value(config.show_all_nodes());
        let policy = config.diff_policy();

        let filtered = combine_latest(&emails.as_observable(), &title_filter.as_observable()).map(
            |(emails, filter): (Rc<Vec<Email>>, TitleFilter)| Rc::new(filter.apply(&emails)),
        );

        let timeline = filtered.map(|emails: Rc<Vec<Email>>| email_counts_by_day(&emails));

        let all = all_nodes(&filtered, &time_range.as_observable(), policy).share_replay();
        let fewer = fewer_nodes(&all).share_replay();
        let branches = [all.subscribe(|_| {}), fewer.subscribe(|_| {})];

        let selected = show_all_nodes.as_observable().map(move |show_all: bool| {
            log::debug!(
                "following {} correspondents",
                if show_all { "all" } else { "active" }
            );
            if show_all {
                all.clone()
            } else {
                fewer.clone()
            }
        });

        let changes = diff_switch_all(
            &selected,
            || -> Snapshot { (Rc::default(), Rc::default()) },
            move |prev: &Snapshot, cur: &Snapshot| {
                (
                    diff_shared(policy, &prev.0, &cur.0),
                    diff_shared(policy, &prev.1, &cur.1),
                )
            },
            |state: &BranchState| &state.0,
            |state: &BranchState| &state.1,
        )
        .map(|(_, changes): (BranchState, Changes)| changes);

        Self {
            config,
            emails,
            title_filter,
            time_range,
            show_all_nodes,
            changes,
            timeline,
            _branches: branches,
        }
    }

    /// Returns the people and email diffs.
    pub fn changes(&self) -> Observable<Changes> {
        self.changes.clone()
    }

    /// Returns the number of filtered emails per day, as `(day, count)`
    /// pairs with days counted from the first filtered email. Emits on every
    /// load and filter change.
    pub fn timeline(&self) -> Observable<Vec<(i64, usize)>> {
        self.timeline.clone()
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Replaces the dataset. Emails are sorted by date and truncated to the
    /// configured maximum.
    pub fn load(&self, mut emails: Vec<Email>) {
        sort_by_date(&mut emails);
        if let Some(max) = self.config.max_emails() {
            emails.truncate(max);
        }
        log::debug!("loaded {} email(s)", emails.len());
        self.emails.next(Rc::new(emails));
    }

    /// Parses `text` and loads the result. Returns the number of emails
    /// kept.
    pub fn load_text(&self, text: &str, ids: &mut IdAllocator) -> Result<usize> {
        let emails = parse_emails(text, ids)?;
        let kept = match self.config.max_emails() {
            Some(max) => emails.len().min(max),
            None => emails.len(),
        };
        self.load(emails);
        Ok(kept)
    }

    /// Moves the time window to days `[begin_day, end_day)` counted from the
    /// first email.
    pub fn set_time_range(&self, begin_day: i64, end_day: i64) {
        if begin_day > end_day {
            log::warn!(
                "time range {}..{} is reversed, nothing will be in view",
                begin_day,
                end_day
            );
        }
        self.time_range.next((begin_day, end_day));
    }

    pub fn set_title_filter(&self, filter: TitleFilter) {
        self.title_filter.next(filter);
    }

    /// Chooses between every correspondent and only those with an email in
    /// the time window.
    pub fn set_show_all_nodes(&self, show: bool) {
        self.show_all_nodes.next(show);
    }

    pub fn time_range(&self) -> (i64, i64) {
        self.time_range
            .latest()
            .unwrap_or_else(|| self.config.initial_days())
    }

    pub fn title_filter(&self) -> TitleFilter {
        self.title_filter.latest().unwrap_or_default()
    }

    pub fn show_all_nodes(&self) -> bool {
        self.show_all_nodes
            .latest()
            .unwrap_or_else(|| self.config.show_all_nodes())
    }

    /// Returns the time index of the loaded dataset, before filtering.
    pub fn time_index(&self) -> TimeIndex {
        self.emails
            .latest()
            .map(|emails| TimeIndex::new(&emails))
            .unwrap_or_default()
    }
}

impl Default for CorrespondencePipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;

    fn record(pipeline: &CorrespondencePipeline) -> (Rc<RefCell<Vec<Changes>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = pipeline.changes().subscribe(move |c| sink.borrow_mut().push(c));
        (seen, sub)
    }

    #[test]
    fn test_nothing_before_load() {
        let pipeline = CorrespondencePipeline::default();
        let (seen, _sub) = record(&pipeline);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_empty_dataset_emits_empty_changes() {
        let pipeline = CorrespondencePipeline::default();
        let (seen, _sub) = record(&pipeline);
        pipeline.load(Vec::new());

        let seen = seen.borrow();
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|(people, emails)| people.is_empty() && emails.is_empty()));
    }

    #[test]
    fn test_inputs_are_remembered() {
        let config = PipelineConfig::builder()
            .initial_days(3, 9)
            .show_all_nodes(false)
            .build()
            .unwrap();
        let pipeline = CorrespondencePipeline::new(config);
        assert_eq!(pipeline.time_range(), (3, 9));
        assert!(!pipeline.show_all_nodes());

        pipeline.set_time_range(1, 2);
        pipeline.set_show_all_nodes(true);
        pipeline.set_title_filter(TitleFilter::none());

        assert_eq!(pipeline.time_range(), (1, 2));
        assert!(pipeline.show_all_nodes());
        assert_eq!(pipeline.title_filter(), TitleFilter::none());
        assert!(pipeline.time_index().is_empty());
    }

    #[test]
    fn test_timeline_follows_load_and_filter() {
        use chrono::NaiveDate;
        use mailgraph_core::{MessageType, Title};

        let email = |id: u64, day: u32, from_title: Title| Email {
            id,
            date: NaiveDate::from_ymd_opt(2001, 3, day).unwrap(),
            from_id: 1,
            from_email: "a@enron.com".into(),
            from_title,
            to_id: 2,
            to_email: "b@enron.com".into(),
            to_title: Title::Employee,
            message_type: MessageType::To,
            sentiment: 0.0,
        };

        let pipeline = CorrespondencePipeline::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = pipeline.timeline().subscribe(move |counts| sink.borrow_mut().push(counts));
        assert!(seen.borrow().is_empty());

        pipeline.load(vec![
            email(1, 5, Title::Ceo),
            email(2, 1, Title::Trader),
            email(3, 5, Title::Trader),
        ]);
        assert_eq!(seen.borrow().last().unwrap(), &[(0, 1), (4, 2)]);

        let mut filter = TitleFilter::all();
        filter.disable(Title::Trader);
        pipeline.set_title_filter(filter);
        assert_eq!(seen.borrow().last().unwrap(), &[(0, 1)]);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_load_text_reports_parse_errors() {
        let pipeline = CorrespondencePipeline::default();
        let mut ids = IdAllocator::new();
        let text = "date,fromId,fromEmail,fromJobtitle,toId,toEmail,toJobtitle,messageType,sentiment\n\
                    2001-05-14,1,a@enron.com,CEO\n";
        assert!(pipeline.load_text(text, &mut ids).is_err());
    }
}
