//! Node-link view.
//!
//! People are nodes and emails are directed edges. Instead of drawing, the
//! view records the node and edge operations a renderer has to perform;
//! `take_pending` hands them over in the order they must be applied.
//! Operations left undrained are collapsed into a single redraw once they
//! outnumber the drawn nodes and edges.

use super::DiffConsumer;
use crate::config::NodeLinkOptions;
use crate::selection::Selection;
use crate::types::{EmailDiff, PeopleDiff, SelectionDiff};
use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::PI;
use mailgraph_core::{Email, EmailId, MessageType, Person, PersonId, Title};
use mailgraph_incremental::{Dataset, IdSetDiff};

/// Diameter of a rendered node.
const NODE_SIZE: f64 = 10.0;

/// Pending operations allowed beyond one per node and edge before they are
/// collapsed into a redraw.
const PENDING_SLACK: usize = 64;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: PersonId,
    pub label: String,
    pub title: Title,
    /// Layer in the hierarchical layout.
    pub level: u8,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub id: EmailId,
    pub from: PersonId,
    pub to: PersonId,
    pub message_type: MessageType,
    pub sentiment: f64,
}

/// One operation a renderer performs to catch up with the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOp {
    /// Drop everything drawn so far.
    Clear,
    /// Apply the current options.
    SetOptions,
    AddNode(PersonId),
    UpdateNode(PersonId),
    RemoveNode(PersonId),
    AddEdge(EmailId),
    UpdateEdge(EmailId),
    RemoveEdge(EmailId),
}

pub struct NodeLinkGraph {
    options: NodeLinkOptions,
    nodes: Dataset<PersonId, Node>,
    edges: Dataset<EmailId, Edge>,
    node_count: usize,
    pending: Vec<RenderOp>,
    selection: Selection,
}

impl Default for NodeLinkGraph {
    fn default() -> Self {
        Self::new(NodeLinkOptions::default())
    }
}

impl NodeLinkGraph {
    pub fn new(options: NodeLinkOptions) -> Self {
        Self {
            options,
            nodes: Dataset::new(),
            edges: Dataset::new(),
            node_count: 0,
            pending: Vec::new(),
            selection: Selection::new(),
        }
    }

    #[inline]
    pub fn options(&self) -> &NodeLinkOptions {
        &self.options
    }

    /// Changes the options. Switching the hierarchical layout redraws the
    /// whole graph.
    pub fn set_options(&mut self, options: NodeLinkOptions) {
        let full_reset = options.hierarchical != self.options.hierarchical;
        let rescaled = options.max_nodes != self.options.max_nodes;
        self.options = options;

        if full_reset {
            self.pending.push(RenderOp::Clear);
        }
        self.pending.push(RenderOp::SetOptions);
        if full_reset {
            self.push_redraw();
        }
        if rescaled {
            let max_nodes = self.options.max_nodes;
            let mut moved = Vec::with_capacity(self.nodes.len());
            for node in self.nodes.values_mut() {
                let (x, y) = circle_position(node.id, max_nodes);
                node.x = x;
                node.y = y;
                moved.push(node.id);
            }
            if !full_reset {
                moved.sort_unstable();
                self.pending.extend(moved.into_iter().map(RenderOp::UpdateNode));
            }
        }
        log::debug!(
            "node-link options changed (physics {}, hierarchical {}, redraw {})",
            self.options.physics,
            self.options.hierarchical,
            full_reset
        );
        self.compact();
    }

    /// Returns the number of nodes drawn.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: PersonId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: EmailId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Returns the operations recorded since the last call.
    ///
    /// Renderers should drain this after every change. Undrained operations
    /// are replaced by `Clear`, `SetOptions` and a re-add of everything once
    /// they outgrow the graph.
    pub fn take_pending(&mut self) -> Vec<RenderOp> {
        core::mem::take(&mut self.pending)
    }

    /// Pushes an add of every node and then every edge, in id order.
    fn push_redraw(&mut self) {
        let mut nodes: Vec<PersonId> = self.nodes.keys().copied().collect();
        nodes.sort_unstable();
        let mut edges: Vec<EmailId> = self.edges.keys().copied().collect();
        edges.sort_unstable();
        self.pending.extend(nodes.into_iter().map(RenderOp::AddNode));
        self.pending.extend(edges.into_iter().map(RenderOp::AddEdge));
    }

    fn compact(&mut self) {
        let limit = self.nodes.len() + self.edges.len() + PENDING_SLACK;
        if self.pending.len() <= limit {
            return;
        }
        log::debug!(
            "collapsing {} undrained render op(s) into a redraw",
            self.pending.len()
        );
        self.pending.clear();
        self.pending.push(RenderOp::Clear);
        self.pending.push(RenderOp::SetOptions);
        self.push_redraw();
    }

    /// Builds the selection change for a user picking `people` in this
    /// view: the picked people become the whole selection, together with
    /// every email between two of them.
    pub fn pick(&self, people: &[PersonId]) -> SelectionDiff {
        let mut people_diff = IdSetDiff::new();
        let mut emails_diff = IdSetDiff::new();

        for id in self.selection.selected_people() {
            if !people.contains(&id) {
                people_diff.remove(id);
            }
        }
        for id in people {
            if !self.selection.is_person_selected(*id) {
                people_diff.add(*id, *id);
            }
        }

        for edge in self.edges.values() {
            let inside = people.contains(&edge.from) && people.contains(&edge.to);
            match (inside, self.selection.is_email_selected(edge.id)) {
                (true, false) => emails_diff.add(edge.id, edge.id),
                (false, true) => emails_diff.remove(edge.id),
                _ => {}
            }
        }
        (people_diff, emails_diff)
    }

    fn to_node(&self, person: &Person) -> Node {
        let (x, y) = circle_position(person.id, self.options.max_nodes);
        Node {
            id: person.id,
            label: person.display_name(),
            title: person.title,
            level: person.title.rank(),
            x,
            y,
        }
    }
}

/// Position of a node on the circular layout.
///
/// The circle is sized to fit `max_nodes` nodes side by side; nodes are
/// spread around it by id.
fn circle_position(id: PersonId, max_nodes: usize) -> (f64, f64) {
    let slots = max_nodes.max(1) as f64;
    let radius = slots * (NODE_SIZE * 2.0 + 2.0) / PI / 2.0;
    let angle = 2.0 * PI * (id as f64) / slots;
    (radius * libm::cos(angle), radius * libm::sin(angle))
}

fn to_edge(email: &Email) -> Edge {
    Edge {
        id: email.id,
        from: email.from_id,
        to: email.to_id,
        message_type: email.message_type,
        sentiment: email.sentiment,
    }
}

impl DiffConsumer for NodeLinkGraph {
    fn apply(&mut self, people: &PeopleDiff, emails: &EmailDiff) {
        for change in people.insertions() {
            let node = self.to_node(&change.value);
            if self.nodes.insert(change.id, node).is_none() {
                self.node_count += 1;
                self.pending.push(RenderOp::AddNode(change.id));
            } else {
                self.pending.push(RenderOp::UpdateNode(change.id));
            }
        }
        for change in emails.insertions() {
            if self.edges.insert(change.id, to_edge(&change.value)).is_none() {
                self.pending.push(RenderOp::AddEdge(change.id));
            } else {
                self.pending.push(RenderOp::UpdateEdge(change.id));
            }
        }

        for change in people.updates() {
            let node = self.to_node(&change.value);
            if self.nodes.insert(change.id, node).is_none() {
                self.node_count += 1;
                self.pending.push(RenderOp::AddNode(change.id));
            } else {
                self.pending.push(RenderOp::UpdateNode(change.id));
            }
        }
        for change in emails.updates() {
            if self.edges.insert(change.id, to_edge(&change.value)).is_none() {
                self.pending.push(RenderOp::AddEdge(change.id));
            } else {
                self.pending.push(RenderOp::UpdateEdge(change.id));
            }
        }

        for id in emails.deletions() {
            if self.edges.remove(id).is_some() {
                self.pending.push(RenderOp::RemoveEdge(*id));
            }
        }
        for id in people.deletions() {
            if self.nodes.remove(id).is_some() {
                self.node_count -= 1;
                self.pending.push(RenderOp::RemoveNode(*id));
            }
        }

        log::trace!(
            "node-link graph: {} node(s), {} edge(s), {} pending op(s)",
            self.node_count,
            self.edges.len(),
            self.pending.len()
        );
        self.compact();
    }

    fn select(&mut self, selection: &SelectionDiff) {
        self.selection.apply(selection);
        let (people, emails) = selection;
        for id in people
            .insertions()
            .iter()
            .map(|c| c.id)
            .chain(people.deletions().iter().copied())
        {
            if self.nodes.contains_key(&id) {
                self.pending.push(RenderOp::UpdateNode(id));
            }
        }
        for id in emails
            .insertions()
            .iter()
            .map(|c| c.id)
            .chain(emails.deletions().iter().copied())
        {
            if self.edges.contains_key(&id) {
                self.pending.push(RenderOp::UpdateEdge(id));
            }
        }
        self.compact();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn person(id: PersonId, title: Title) -> Person {
        Person {
            id,
            title,
            email_address: alloc::format!("p.n{}@enron.com", id),
        }
    }

    fn email(id: EmailId, from: PersonId, to: PersonId) -> Email {
        Email {
            id,
            date: NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
            from_id: from,
            from_email: alloc::format!("p.{}@enron.com", from),
            from_title: Title::Employee,
            to_id: to,
            to_email: alloc::format!("p.{}@enron.com", to),
            to_title: Title::Employee,
            message_type: MessageType::Cc,
            sentiment: 0.3,
        }
    }

    fn populated() -> NodeLinkGraph {
        let mut graph = NodeLinkGraph::default();
        let mut people = PeopleDiff::new();
        people.add(1, person(1, Title::Ceo));
        people.add(2, person(2, Title::Trader));
        people.add(3, person(3, Title::Trader));
        let mut emails = EmailDiff::new();
        emails.add(10, email(10, 1, 2));
        emails.add(11, email(11, 2, 3));
        graph.apply(&people, &emails);
        graph
    }

    #[test]
    fn test_operations_are_ordered() {
        let mut graph = populated();
        assert_eq!(
            graph.take_pending(),
            [
                RenderOp::AddNode(1),
                RenderOp::AddNode(2),
                RenderOp::AddNode(3),
                RenderOp::AddEdge(10),
                RenderOp::AddEdge(11),
            ]
        );

        let mut people = PeopleDiff::new();
        people.remove(3);
        people.update(1, person(1, Title::President));
        let mut emails = EmailDiff::new();
        emails.remove(11);
        graph.apply(&people, &emails);

        assert_eq!(
            graph.take_pending(),
            [
                RenderOp::UpdateNode(1),
                RenderOp::RemoveEdge(11),
                RenderOp::RemoveNode(3),
            ]
        );
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node(1).unwrap().level, 1);
    }

    #[test]
    fn test_reinsertion_is_an_update() {
        let mut graph = populated();
        graph.take_pending();

        let mut people = PeopleDiff::new();
        people.add(2, person(2, Title::Manager));
        let mut emails = EmailDiff::new();
        emails.add(10, email(10, 1, 2));
        graph.apply(&people, &emails);

        assert_eq!(
            graph.take_pending(),
            [RenderOp::UpdateNode(2), RenderOp::UpdateEdge(10)]
        );
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.node(2).unwrap().title, Title::Manager);
    }

    #[test]
    fn test_undrained_operations_collapse_into_redraw() {
        let mut graph = populated();
        for round in 0..100 {
            let mut people = PeopleDiff::new();
            let title = if round % 2 == 0 { Title::Ceo } else { Title::Director };
            people.update(1, person(1, title));
            graph.apply(&people, &EmailDiff::new());
            assert!(graph.pending.len() <= 3 + 2 + 2 + PENDING_SLACK);
        }

        let ops = graph.take_pending();
        assert_eq!(ops[0], RenderOp::Clear);
        assert_eq!(ops[1], RenderOp::SetOptions);
        assert!(ops.contains(&RenderOp::AddNode(1)));
        assert!(ops.contains(&RenderOp::AddEdge(11)));
        assert_eq!(graph.node(1).unwrap().title, Title::Director);
    }

    #[test]
    fn test_node_count_ignores_unknown_deletions() {
        let mut graph = populated();
        let mut people = PeopleDiff::new();
        people.remove(42);
        graph.apply(&people, &EmailDiff::new());
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_nodes_are_placed_on_a_circle() {
        let graph = populated();
        let radius = 150.0 * (NODE_SIZE * 2.0 + 2.0) / PI / 2.0;
        for id in 1..=3 {
            let node = graph.node(id).unwrap();
            let distance = libm::sqrt(node.x * node.x + node.y * node.y);
            assert!((distance - radius).abs() < 1e-6);
        }
        assert_eq!(graph.node(1).unwrap().label, "P. N1");
    }

    #[test]
    fn test_hierarchical_switch_redraws() {
        let mut graph = populated();
        graph.take_pending();
        graph.set_options(NodeLinkOptions::new().with_hierarchical(true));

        let ops = graph.take_pending();
        assert_eq!(ops[0], RenderOp::Clear);
        assert_eq!(ops[1], RenderOp::SetOptions);
        assert_eq!(ops.len(), 2 + 3 + 2);

        graph.set_options(NodeLinkOptions::new().with_hierarchical(true).with_physics(false));
        assert_eq!(graph.take_pending(), [RenderOp::SetOptions]);
    }

    #[test]
    fn test_pick_builds_selection() {
        let mut graph = populated();
        let picked = graph.pick(&[1, 2]);
        assert_eq!(picked.0.insertions().len(), 2);
        assert_eq!(picked.1.insertions().len(), 1);
        assert_eq!(picked.1.insertions()[0].id, 10);

        graph.select(&picked);
        assert!(graph.selection().is_email_selected(10));

        let repicked = graph.pick(&[2, 3]);
        assert_eq!(repicked.0.deletions(), &[1]);
        assert_eq!(repicked.0.insertions().len(), 1);
        assert_eq!(repicked.1.deletions(), &[10]);
        assert_eq!(repicked.1.insertions()[0].id, 11);
    }
}
