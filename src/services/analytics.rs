//! Aggregations behind the analytics dashboard.
//!
//! Every function here reads a snapshot of page-view events and never mutates
//! it. There is no error path: an empty snapshot yields empty or zeroed output.
//! Malformed records are rejected where events are written, not here.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::PageViewEvent;

/// Label for page views that arrived without a referrer.
pub const DIRECT_REFERRER_LABEL: &str = "Direct / Unknown";

/// Daily visits, as three index-aligned sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Traffic {
    /// Ascending; only days that have at least one event.
    pub dates: Vec<NaiveDate>,
    pub total_visitor_counts: Vec<usize>,
    pub unique_visitor_counts: Vec<usize>,
}

impl Traffic {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Headline numbers. Serialized with the labels the dashboard shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    #[serde(rename = "DB Records")]
    pub record_count: usize,
    #[serde(rename = "Total Visits")]
    pub total_visits: usize,
    /// Sum of per-day uniques: a visitor returning on two days counts twice.
    #[serde(rename = "Unique Visitors")]
    pub unique_visitors: usize,
    #[serde(rename = "Days Tracked")]
    pub days_tracked: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageStats {
    pub page: String,
    pub unique: usize,
    pub total: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferrerStats {
    pub referrer: String,
    pub unique: usize,
    pub total: usize,
    pub percentage: f64,
}

/// Everything the dashboard page renders, computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub stats: Stats,
    pub traffic: Traffic,
    pub pages: Vec<PageStats>,
    pub referrers: Vec<ReferrerStats>,
}

impl Dashboard {
    pub fn build(events: &[PageViewEvent], site_host: &str) -> Self {
        let traffic = compute_traffic(events);
        let stats = compute_stats(events, &traffic);
        Self {
            stats,
            traffic,
            pages: compute_pages(events, site_host),
            referrers: compute_referrers(events),
        }
    }
}

struct Bucket<'a, K> {
    key: K,
    total: usize,
    visitors: HashSet<&'a str>,
}

/// Key -> accumulator map that remembers the order keys were first seen in.
struct OrderedBuckets<'a, K> {
    slots: HashMap<K, usize>,
    buckets: Vec<Bucket<'a, K>>,
}

impl<'a, K: Eq + Hash + Clone> OrderedBuckets<'a, K> {
    fn new() -> Self {
        Self {
            slots: HashMap::new(),
            buckets: Vec::new(),
        }
    }

    fn add(&mut self, key: K, event: &'a PageViewEvent) {
        let slot = match self.slots.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                self.buckets.push(Bucket {
                    key: entry.key().clone(),
                    total: 0,
                    visitors: HashSet::new(),
                });
                *entry.insert(self.buckets.len() - 1)
            }
        };
        let bucket = &mut self.buckets[slot];
        bucket.total += 1;
        bucket.visitors.insert(event.anonymous_id.as_str());
    }

    fn into_buckets(self) -> Vec<Bucket<'a, K>> {
        self.buckets
    }
}

/// Buckets events by calendar day of `created_at`, oldest day first.
pub fn compute_traffic(events: &[PageViewEvent]) -> Traffic {
    let mut sorted: Vec<&PageViewEvent> = events.iter().collect();
    sorted.sort_by_key(|event| event.created_at);

    let mut days = OrderedBuckets::new();
    for event in sorted {
        days.add(event.created_at.date(), event);
    }

    let mut traffic = Traffic::default();
    for day in days.into_buckets() {
        traffic.dates.push(day.key);
        traffic.total_visitor_counts.push(day.total);
        traffic.unique_visitor_counts.push(day.visitors.len());
    }
    traffic
}

pub fn compute_stats(events: &[PageViewEvent], traffic: &Traffic) -> Stats {
    Stats {
        record_count: events.len(),
        total_visits: traffic.total_visitor_counts.iter().sum(),
        unique_visitors: traffic.unique_visitor_counts.iter().sum(),
        days_tracked: traffic.dates.len(),
    }
}

/// Per-page breakdown, busiest first. `site_host` is stripped from the URLs.
pub fn compute_pages(events: &[PageViewEvent], site_host: &str) -> Vec<PageStats> {
    let mut pages = OrderedBuckets::new();
    for event in events {
        pages.add(event.page.as_str(), event);
    }

    let mut rows: Vec<PageStats> = pages
        .into_buckets()
        .into_iter()
        .map(|bucket| PageStats {
            page: display_path(bucket.key, site_host),
            unique: bucket.visitors.len(),
            total: bucket.total,
            percentage: share(bucket.total, events.len()),
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

/// Per-referrer breakdown, busiest first. Missing and empty referrers share
/// the [`DIRECT_REFERRER_LABEL`] row.
pub fn compute_referrers(events: &[PageViewEvent]) -> Vec<ReferrerStats> {
    let mut referrers = OrderedBuckets::new();
    for event in events {
        let key = event.referrer.as_deref().filter(|r| !r.is_empty());
        referrers.add(key, event);
    }

    let mut rows: Vec<ReferrerStats> = referrers
        .into_buckets()
        .into_iter()
        .map(|bucket| ReferrerStats {
            referrer: bucket.key.unwrap_or(DIRECT_REFERRER_LABEL).to_string(),
            unique: bucket.visitors.len(),
            total: bucket.total,
            percentage: share(bucket.total, events.len()),
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

/// Path shown for a page URL: everything after the first occurrence of the
/// site host, without trailing slashes. The root page becomes `/`.
pub fn display_path(page: &str, site_host: &str) -> String {
    let after_host = match page.find(site_host) {
        Some(at) if !site_host.is_empty() => &page[at + site_host.len()..],
        _ => page,
    };
    let path = after_host.trim_end_matches('/');
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

fn share(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}
