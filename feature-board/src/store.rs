//! In-memory storage for feature requests.
//!
//! The store is the single owner of every [`FeatureRequest`]. Callers get
//! clones back and route all mutation through the methods here. State lives
//! for the life of the process and is never persisted.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Utc};
use nanoid::nanoid;
use tracing::debug;

use crate::model::{DEFAULT_PRODUCT_ID, FeatureRequest, Status, VoteDirection};

/// Length of generated ids. 12 symbols of the URL-safe alphabet is ~72 bits.
const ID_LEN: usize = 12;

/// Thread-safe, insertion-ordered collection of feature requests.
///
/// One `Mutex` guards the whole sequence, so every operation (including the
/// read-modify-write in [`FeatureStore::vote`]) is a single critical section.
/// Lookups are linear scans; the board is expected to stay small.
#[derive(Default)]
pub struct FeatureStore {
    requests: Mutex<Vec<FeatureRequest>>,
}

impl FeatureStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates a store pre-populated with the sample board under the
    /// default product.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut requests = store.lock();
            for sample in SAMPLES {
                let request = FeatureRequest {
                    id: unused_id(&requests),
                    title: sample.title.to_string(),
                    description: sample.description.to_string(),
                    product_id: DEFAULT_PRODUCT_ID.to_string(),
                    votes: sample.votes,
                    created_at: Utc::now() - Duration::days(sample.age_days),
                    status: sample.status,
                };
                requests.push(request);
            }
        }
        store
    }

    /// Returns every request for `product_id` in insertion order.
    pub fn list_by_product(&self, product_id: &str) -> Vec<FeatureRequest> {
        self.lock()
            .iter()
            .filter(|request| request.product_id == product_id)
            .cloned()
            .collect()
    }

    /// Appends a new request with zero votes and `Submitted` status.
    ///
    /// Title validation belongs to the caller.
    pub fn create(&self, title: String, description: String, product_id: String) -> FeatureRequest {
        let mut requests = self.lock();
        let request = FeatureRequest {
            id: unused_id(&requests),
            title,
            description,
            product_id,
            votes: 0,
            created_at: Utc::now(),
            status: Status::Submitted,
        };
        requests.push(request.clone());
        debug!(id = %request.id, product = %request.product_id, "feature request created");
        request
    }

    pub fn get_by_id(&self, id: &str) -> Option<FeatureRequest> {
        self.lock().iter().find(|request| request.id == id).cloned()
    }

    /// Adjusts the vote count by one in `direction`. Counts are unbounded in
    /// both directions.
    pub fn vote(&self, id: &str, direction: VoteDirection) -> Option<FeatureRequest> {
        self.modify(id, |request| request.votes += direction.delta())
    }

    pub fn update_status(&self, id: &str, status: Status) -> Option<FeatureRequest> {
        self.modify(id, |request| request.status = status)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn modify<F>(&self, id: &str, apply: F) -> Option<FeatureRequest>
    where
        F: FnOnce(&mut FeatureRequest),
    {
        let mut requests = self.lock();
        let request = requests.iter_mut().find(|request| request.id == id)?;
        apply(request);
        Some(request.clone())
    }

    // Every mutation is a single field assignment, so a panic elsewhere can't
    // leave a half-written entry behind and a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Vec<FeatureRequest>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn unused_id(requests: &[FeatureRequest]) -> String {
    loop {
        let id = nanoid!(ID_LEN);
        if !requests.iter().any(|request| request.id == id) {
            return id;
        }
    }
}

struct Sample {
    title: &'static str,
    description: &'static str,
    votes: i64,
    age_days: i64,
    status: Status,
}

const SAMPLES: [Sample; 4] = [
    Sample {
        title: "Dark mode support",
        description: "Add dark mode to reduce eye strain when using the app at night.",
        votes: 24,
        age_days: 15,
        status: Status::Delivered,
    },
    Sample {
        title: "Export data to CSV",
        description: "Allow users to export their data to CSV format for analysis in other tools.",
        votes: 18,
        age_days: 10,
        status: Status::Accepted,
    },
    Sample {
        title: "Integration with Slack",
        description: "Add the ability to receive notifications in Slack when important events happen.",
        votes: 12,
        age_days: 5,
        status: Status::Submitted,
    },
    Sample {
        title: "Voice commands",
        description: "Add voice command support for hands-free operation.",
        votes: 3,
        age_days: 2,
        status: Status::Rejected,
    },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn create_assigns_defaults() {
        let store = FeatureStore::new();
        let before = Utc::now();

        let request = store.create("Dark mode".into(), String::new(), "app".into());

        assert!(!request.id.is_empty());
        assert_eq!(request.votes, 0);
        assert_eq!(request.status, Status::Submitted);
        assert_eq!(request.product_id, "app");
        assert!(request.created_at >= before);
        assert!(request.created_at <= Utc::now());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn ids_are_unique() {
        let store = FeatureStore::new();
        let ids: HashSet<_> = (0..500)
            .map(|i| store.create(format!("request {i}"), String::new(), "p".into()).id)
            .collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn list_filters_by_product_in_insertion_order() {
        let store = FeatureStore::new();
        let a1 = store.create("a1".into(), String::new(), "a".into());
        let b1 = store.create("b1".into(), String::new(), "b".into());
        let a2 = store.create("a2".into(), String::new(), "a".into());

        assert_eq!(store.list_by_product("a"), vec![a1, a2]);
        assert_eq!(store.list_by_product("b"), vec![b1]);
        assert!(store.list_by_product("missing").is_empty());
    }

    #[test]
    fn vote_up_then_down_is_identity() {
        let store = FeatureStore::new();
        let request = store.create("Export".into(), String::new(), "p".into());

        assert_eq!(store.vote(&request.id, VoteDirection::Up).unwrap().votes, 1);
        assert_eq!(store.vote(&request.id, VoteDirection::Down).unwrap().votes, 0);
        assert_eq!(store.vote(&request.id, VoteDirection::Down).unwrap().votes, -1);
    }

    #[test]
    fn unknown_ids_report_not_found() {
        let store = FeatureStore::seeded();

        assert!(store.get_by_id("nope").is_none());
        assert!(store.vote("nope", VoteDirection::Up).is_none());
        assert!(store.update_status("nope", Status::Accepted).is_none());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn update_status_changes_only_status() {
        let store = FeatureStore::new();
        let request = store.create("Slack".into(), "notify".into(), "p".into());

        let updated = store.update_status(&request.id, Status::Accepted).unwrap();

        assert_eq!(updated.status, Status::Accepted);
        assert_eq!(updated.votes, request.votes);
        assert_eq!(updated.created_at, request.created_at);
        assert_eq!(store.get_by_id(&request.id), Some(updated));
    }

    #[test]
    fn seeded_store_holds_the_sample_board() {
        let store = FeatureStore::seeded();
        let requests = store.list_by_product(DEFAULT_PRODUCT_ID);

        let summary: Vec<_> = requests
            .iter()
            .map(|r| (r.title.as_str(), r.votes, r.status))
            .collect();
        assert_eq!(
            summary,
            [
                ("Dark mode support", 24, Status::Delivered),
                ("Export data to CSV", 18, Status::Accepted),
                ("Integration with Slack", 12, Status::Submitted),
                ("Voice commands", 3, Status::Rejected),
            ]
        );
        assert!(requests.windows(2).all(|w| w[0].created_at < w[1].created_at));
    }

    #[test]
    fn concurrent_votes_are_not_lost() {
        let store = Arc::new(FeatureStore::new());
        let id = store.create("Race".into(), String::new(), "p".into()).id;

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let id = id.clone();
                thread::spawn(move || {
                    for _ in 0..250 {
                        store.vote(&id, VoteDirection::Up);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(store.get_by_id(&id).unwrap().votes, 2000);
    }
}
