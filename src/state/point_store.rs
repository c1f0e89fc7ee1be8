use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::state::point::{Point, PointId};

/// Everything observers can see: the ordered points and the hovered id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointCollectionState {
    /// Insertion order is display order (chart z-order and table rows).
    pub points: Vec<Point>,
    pub hovered_id: Option<PointId>,
}

impl PointCollectionState {
    pub fn contains(&self, id: &PointId) -> bool {
        self.points.iter().any(|p| &p.id == id)
    }

    pub fn point(&self, id: &PointId) -> Option<&Point> {
        self.points.iter().find(|p| &p.id == id)
    }

    /// The hovered point, if the hovered id still references one.
    pub fn hovered_point(&self) -> Option<&Point> {
        self.hovered_id.as_ref().and_then(|id| self.point(id))
    }

    pub fn is_hovered(&self, id: &PointId) -> bool {
        self.hovered_id.as_ref() == Some(id) && self.contains(id)
    }
}

/// Handle returned by [`PointStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&PointCollectionState)>;

/// The shared, observable point collection.
///
/// Every operation is total: unknown ids are no-ops. Observers run
/// synchronously after each operation and receive the full snapshot.
pub struct PointStore {
    state: PointCollectionState,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl Default for PointStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PointStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointStore")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl PointStore {
    pub fn new() -> Self {
        Self {
            state: PointCollectionState::default(),
            observers: Vec::new(),
            next_subscription: 1,
        }
    }

    pub fn with_points(points: Vec<Point>) -> Self {
        let mut store = Self::new();
        store.state.points = dedup_by_id(points);
        store
    }

    pub fn snapshot(&self) -> &PointCollectionState {
        &self.state
    }

    pub fn points(&self) -> &[Point] {
        &self.state.points
    }

    pub fn hovered_id(&self) -> Option<&PointId> {
        self.state.hovered_id.as_ref()
    }

    pub fn contains(&self, id: &PointId) -> bool {
        self.state.contains(id)
    }

    pub fn len(&self) -> usize {
        self.state.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.points.is_empty()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&PointCollectionState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `true` if the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn add_point(&mut self, point: Point) {
        if self.state.contains(&point.id) {
            tracing::warn!(id = %point.id, "ignoring add of duplicate point id");
        } else {
            tracing::debug!(id = %point.id, x = point.x, y = point.y, "add point");
            self.state.points.push(point);
        }
        self.notify();
    }

    pub fn update_point(&mut self, id: &PointId, x: i64, y: i64) {
        if let Some(p) = self.state.points.iter_mut().find(|p| &p.id == id) {
            tracing::trace!(%id, x, y, "update point");
            p.x = x;
            p.y = y;
        }
        self.notify();
    }

    pub fn remove_point(&mut self, id: &PointId) {
        let before = self.state.points.len();
        self.state.points.retain(|p| &p.id != id);
        if self.state.points.len() != before {
            tracing::debug!(%id, "remove point");
        }
        if self.state.hovered_id.as_ref() == Some(id) {
            self.state.hovered_id = None;
        }
        self.notify();
    }

    /// Ids that are not in the collection resolve to no hover, so the
    /// hovered id always references a present point.
    pub fn set_hovered(&mut self, id: Option<PointId>) {
        self.state.hovered_id = id.filter(|id| self.state.contains(id));
        self.notify();
    }

    /// Replace the whole collection. The hovered id survives only if the
    /// new collection still contains it.
    pub fn set_points(&mut self, points: Vec<Point>) {
        tracing::debug!(count = points.len(), "replace points");
        self.state.points = dedup_by_id(points);
        if let Some(hovered) = &self.state.hovered_id {
            if !self.state.contains(hovered) {
                self.state.hovered_id = None;
            }
        }
        self.notify();
    }

    fn notify(&mut self) {
        for (_, observer) in &mut self.observers {
            observer(&self.state);
        }
    }
}

fn dedup_by_id(points: Vec<Point>) -> Vec<Point> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(points.len());
    for p in points {
        if seen.insert(p.id.clone()) {
            out.push(p);
        } else {
            tracing::warn!(id = %p.id, "dropping duplicate point id");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn id(s: &str) -> PointId {
        PointId::new(s)
    }

    #[test]
    fn add_then_update_keeps_order_and_id() {
        let mut store = PointStore::new();
        store.add_point(Point::new("p0", 0, 0));
        store.add_point(Point::new("p1", 3, 4));
        store.add_point(Point::new("p2", 9, 9));
        assert_eq!(store.snapshot().point(&id("p1")), Some(&Point::new("p1", 3, 4)));

        store.update_point(&id("p1"), 5, 6);
        let ids: Vec<&str> = store.points().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p0", "p1", "p2"]);
        assert_eq!(store.points()[1], Point::new("p1", 5, 6));
    }

    #[test]
    fn duplicate_add_is_ignored() {
        let mut store = PointStore::new();
        store.add_point(Point::new("p1", 1, 1));
        store.add_point(Point::new("p1", 2, 2));
        assert_eq!(store.points(), &[Point::new("p1", 1, 1)]);
    }

    #[test]
    fn remove_missing_leaves_state_unchanged() {
        let mut store = PointStore::new();
        store.add_point(Point::new("a", 1, 2));
        store.set_hovered(Some(id("a")));
        let before = store.snapshot().clone();
        store.remove_point(&id("missing"));
        assert_eq!(store.snapshot(), &before);
    }

    #[test]
    fn remove_clears_hover() {
        let mut store = PointStore::new();
        store.add_point(Point::new("a", 1, 2));
        store.set_hovered(Some(id("a")));
        store.remove_point(&id("a"));
        assert!(store.hovered_id().is_none());
    }

    #[test]
    fn set_points_keeps_hover_only_if_present() {
        let mut store = PointStore::new();
        store.add_point(Point::new("a", 1, 2));
        store.set_hovered(Some(id("a")));

        store.set_points(vec![Point::new("a", 0, 0), Point::new("b", 1, 1)]);
        assert_eq!(store.hovered_id(), Some(&id("a")));

        store.set_points(vec![Point::new("b", 1, 1)]);
        assert!(store.hovered_id().is_none());
    }

    #[test]
    fn set_points_collapses_duplicates() {
        let mut store = PointStore::new();
        store.set_points(vec![Point::new("a", 1, 1), Point::new("a", 2, 2)]);
        assert_eq!(store.points(), &[Point::new("a", 1, 1)]);
    }

    #[test]
    fn hovering_an_unknown_id_clears_hover() {
        let mut store = PointStore::new();
        store.add_point(Point::new("a", 1, 1));
        store.set_hovered(Some(id("a")));
        store.set_hovered(Some(id("ghost")));
        assert!(store.hovered_id().is_none());
        assert!(store.snapshot().hovered_point().is_none());
    }

    #[test]
    fn observers_see_every_mutation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = PointStore::new();
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(move |state| sink.borrow_mut().push(state.points.len()));

        store.add_point(Point::new("a", 1, 1));
        store.add_point(Point::new("b", 1, 1));
        store.remove_point(&id("a"));
        assert_eq!(*seen.borrow(), vec![1, 2, 1]);

        assert!(store.unsubscribe(sub));
        store.add_point(Point::new("c", 0, 0));
        assert_eq!(seen.borrow().len(), 3);
        assert!(!store.unsubscribe(sub));
    }
}
