//! Fake page views for demos and local development.
//!
//! Routes are weighted so earlier ones are picked far more often, most visits
//! come from a handful of returning visitors, and 60% of visits carry no
//! referrer. None of this is used outside seeding.

use chrono::{Duration, Months, NaiveDateTime, Timelike, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::database::PageViewRepository;
use crate::error::StoreError;
use crate::models::NewPageView;

/// Paths the site serves, most visited first.
pub const DEFAULT_ROUTES: &[&str] = &[
    "/",
    "about",
    "examples",
    "posts",
    "windowlight",
    "analytics",
    "analytics/raw",
    "analytics/json",
];

const REFERRER_CHANCE_OF_UNKNOWN: f64 = 0.60;
const KNOWN_VISITORS: u32 = 10;
// Nominal 60%, corrected for the known-visitor pool.
const ANONYMOUS_CHANCE: f64 = ((60.0 - (KNOWN_VISITORS as f64 * 3.0)) - 7.5) / 100.0;
const GENERATED_REFERRERS: usize = 10;

const REAL_REFERRERS: &[&str] = &[
    "https://www.google.com/",
    "https://www.google.com/",
    "https://www.google.com/",
    "https://www.google.com/",
    "https://www.reddit.com/",
    "https://www.reddit.com/",
    "https://www.twitter.com/",
    "https://www.twitter.com/",
    "https://www.github.com/",
    "https://www.github.com/",
    "https://www.duckduckgo.com/",
    "https://www.bing.com/",
    "https://www.yahoo.com/",
    "https://www.facebook.com/",
    "https://www.linkedin.com/",
    "https://www.pinterest.com/",
    "https://www.instagram.com/",
    "https://www.tiktok.com/",
];

const REFERRER_WORDS: &[&str] = &[
    "acme", "lorem", "ipsum", "nova", "pixel", "harbor", "maple", "orbit", "quartz", "zephyr",
    "blog", "notes", "daily", "weekly", "forum",
];
const REFERRER_TLDS: &[&str] = &["com", "net", "org", "io", "dev"];

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
];

/// How far back generated visits may reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Interval {
    Today,
    PastThreeDays,
    ThisWeek,
    #[default]
    ThisMonth,
    PastThreeMonths,
    PastSixMonths,
    ThisYear,
}

impl Interval {
    /// Earliest timestamp for this interval, counting back from `now`.
    pub fn start(self, now: NaiveDateTime) -> NaiveDateTime {
        let start = match self {
            Interval::Today => Some(now - Duration::days(1)),
            Interval::PastThreeDays => Some(now - Duration::days(3)),
            Interval::ThisWeek => Some(now - Duration::weeks(1)),
            Interval::ThisMonth => now.checked_sub_months(Months::new(1)),
            Interval::PastThreeMonths => now.checked_sub_months(Months::new(3)),
            Interval::PastSixMonths => now.checked_sub_months(Months::new(6)),
            Interval::ThisYear => now.checked_sub_months(Months::new(12)),
        };
        start.unwrap_or(now)
    }
}

/// Sampling weight per route index, normalised to sum to 100. Weights fall
/// off logarithmically: `1 / (0.25 + ln(i / 0.75 + 1))`.
pub fn route_weights(count: usize) -> Vec<f64> {
    let raw: Vec<f64> = (0..count)
        .map(|i| 1.0 / (0.25 + (i as f64 / 0.75 + 1.0).ln()))
        .collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|weight| weight * 100.0 / total).collect()
}

/// Each route repeated `floor(weight)` times; uniform picks from the pool
/// follow the weights.
pub fn weighted_route_pool(routes: &[String]) -> Vec<String> {
    routes
        .iter()
        .zip(route_weights(routes.len()))
        .flat_map(|(route, weight)| std::iter::repeat(route.clone()).take(weight as usize))
        .collect()
}

/// Stable id of known visitor `n`: the first 40 hex chars of `sha256(n)`.
pub fn known_visitor_id(n: u32) -> String {
    sha256_prefix(n.to_string().as_bytes())
}

fn sha256_prefix(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    let mut id = format!("{:x}", hasher.finalize());
    id.truncate(40);
    id
}

/// Absolute URL for a route on the site, without a trailing slash for the root.
pub fn page_url(site_url: &str, route: &str) -> String {
    let base = site_url.trim_end_matches('/');
    let path = route.trim_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

pub struct PageViewFactory<R: Rng = StdRng> {
    rng: R,
    site_url: String,
    route_pool: Vec<String>,
    referrer_pool: Vec<String>,
    interval: Interval,
}

impl PageViewFactory<StdRng> {
    pub fn new(site_url: &str, routes: &[String], interval: Interval) -> Self {
        Self::with_rng(StdRng::from_entropy(), site_url, routes, interval)
    }
}

impl<R: Rng> PageViewFactory<R> {
    pub fn with_rng(mut rng: R, site_url: &str, routes: &[String], interval: Interval) -> Self {
        let referrer_pool = referrer_pool(&mut rng);
        Self {
            rng,
            site_url: site_url.to_string(),
            route_pool: weighted_route_pool(routes),
            referrer_pool,
            interval,
        }
    }

    pub fn page(&mut self) -> String {
        match self.route_pool.choose(&mut self.rng) {
            Some(route) => page_url(&self.site_url, route),
            None => page_url(&self.site_url, "/"),
        }
    }

    pub fn referrer(&mut self) -> Option<String> {
        if self.rng.gen_bool(REFERRER_CHANCE_OF_UNKNOWN) {
            return None;
        }
        self.referrer_pool.choose(&mut self.rng).cloned()
    }

    pub fn user_agent(&mut self) -> String {
        USER_AGENTS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(USER_AGENTS[0])
            .to_string()
    }

    pub fn anonymous_id(&mut self) -> String {
        if self.rng.gen_bool(ANONYMOUS_CHANCE) {
            let seed: [u8; 32] = self.rng.gen();
            sha256_prefix(&seed)
        } else {
            known_visitor_id(self.rng.gen_range(1..=KNOWN_VISITORS))
        }
    }

    /// Uniform within the interval ending at `now`, truncated to whole seconds.
    pub fn created_at(&mut self, now: NaiveDateTime) -> NaiveDateTime {
        let span = (now - self.interval.start(now)).num_seconds().max(0);
        let at = now - Duration::seconds(self.rng.gen_range(0..=span));
        at.with_nanosecond(0).unwrap_or(at)
    }

    pub fn make(&mut self, now: NaiveDateTime) -> NewPageView {
        NewPageView {
            page: self.page(),
            referrer: self.referrer(),
            user_agent: self.user_agent(),
            anonymous_id: self.anonymous_id(),
            created_at: self.created_at(now),
        }
    }

    pub fn make_many(&mut self, count: usize, now: NaiveDateTime) -> Vec<NewPageView> {
        (0..count).map(|_| self.make(now)).collect()
    }
}

fn referrer_pool<R: Rng>(rng: &mut R) -> Vec<String> {
    let mut pool: Vec<String> = (0..GENERATED_REFERRERS)
        .map(|_| {
            let host = REFERRER_WORDS.choose(&mut *rng).copied().unwrap_or("example");
            let tld = REFERRER_TLDS.choose(&mut *rng).copied().unwrap_or("com");
            let path = REFERRER_WORDS.choose(&mut *rng).copied().unwrap_or("home");
            format!("https://www.{}.{}/{}", host, tld, path)
        })
        .collect();
    for _ in 0..2 {
        pool.extend(REAL_REFERRERS.iter().map(|r| r.to_string()));
    }
    pool
}

/// Inserts `count` demo page views unless the table already has data.
/// Returns how many were inserted.
pub async fn seed_demo_data(
    store: &dyn PageViewRepository,
    site_url: &str,
    count: usize,
    interval: Interval,
) -> Result<usize, StoreError> {
    let existing = store.count().await?;
    if existing > 0 {
        tracing::info!("Database already has {} page views, skipping seed", existing);
        return Ok(0);
    }

    tracing::info!("Seeding {} demo page views over {:?}...", count, interval);
    let routes: Vec<String> = DEFAULT_ROUTES.iter().map(|r| r.to_string()).collect();
    let mut factory = PageViewFactory::new(site_url, &routes, interval);
    let now = Utc::now().naive_utc();
    for view in factory.make_many(count, now) {
        store.insert(view).await?;
    }

    tracing::info!("Demo page views created successfully");
    Ok(count)
}
