// Tests for the demo page view factory

use chrono::Timelike;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use site_analytics::services::seed_data::{
    known_visitor_id, page_url, route_weights, weighted_route_pool, Interval, PageViewFactory,
    DEFAULT_ROUTES,
};

use test_helpers::at;

fn routes() -> Vec<String> {
    DEFAULT_ROUTES.iter().map(|r| r.to_string()).collect()
}

fn factory(seed: u64, interval: Interval) -> PageViewFactory<StdRng> {
    PageViewFactory::with_rng(StdRng::seed_from_u64(seed), "https://example.com/", &routes(), interval)
}

#[test]
fn route_weights_sum_to_one_hundred_and_fall_off() {
    let weights = route_weights(8);

    assert_eq!(weights.len(), 8);
    assert!((weights.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    assert!(weights.windows(2).all(|w| w[0] > w[1]));
    assert!((weights[0] - 51.253).abs() < 0.01);
}

#[test]
fn route_weights_of_nothing_is_empty() {
    assert!(route_weights(0).is_empty());
}

#[test]
fn route_pool_repeats_each_route_by_its_floored_weight() {
    let pool = weighted_route_pool(&routes());
    let count = |route: &str| pool.iter().filter(|r| r.as_str() == route).count();

    assert_eq!(pool.len(), 96);
    assert_eq!(count("/"), 51);
    assert_eq!(count("about"), 11);
    assert_eq!(count("examples"), 8);
    assert_eq!(count("analytics/json"), 4);
}

#[test]
fn known_visitor_ids_are_truncated_sha256() {
    assert_eq!(known_visitor_id(1), "6b86b273ff34fce19d6b804eff5a3f5747ada4ea");
    assert_eq!(known_visitor_id(2), "d4735e3a265e16eee03f59718b9b5d03019c07d8");
    assert_eq!(known_visitor_id(7), known_visitor_id(7));
    assert_ne!(known_visitor_id(1), known_visitor_id(2));
}

#[test]
fn page_url_joins_site_and_route() {
    assert_eq!(page_url("https://example.com/", "/"), "https://example.com");
    assert_eq!(page_url("https://example.com", "about"), "https://example.com/about");
    assert_eq!(page_url("https://example.com/", "/analytics/raw/"), "https://example.com/analytics/raw");
}

#[test]
fn generated_views_are_well_formed() {
    let now = at("2024-06-30 12:00:00");
    let earliest = at("2024-06-23 12:00:00");
    let mut factory = factory(11, Interval::ThisWeek);

    for view in factory.make_many(500, now) {
        assert!(view.page.starts_with("https://example.com"));
        assert!(!view.page.ends_with('/'));
        assert_eq!(view.anonymous_id.len(), 40);
        assert!(view.anonymous_id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        assert!(view.created_at >= earliest && view.created_at <= now);
        assert_eq!(view.created_at.nanosecond(), 0);
        assert!(view.user_agent.starts_with("Mozilla/5.0"));
        if let Some(referrer) = &view.referrer {
            assert!(referrer.starts_with("https://"));
        }
    }
}

#[test]
fn most_views_have_no_referrer_and_come_from_known_visitors() {
    let mut factory = factory(5, Interval::ThisMonth);
    let views = factory.make_many(2000, at("2024-06-30 12:00:00"));

    let direct = views.iter().filter(|v| v.referrer.is_none()).count();
    assert!((1000..1400).contains(&direct), "direct visits: {direct}");

    let known: Vec<String> = (1..=10).map(known_visitor_id).collect();
    let from_known = views.iter().filter(|v| known.contains(&v.anonymous_id)).count();
    assert!((1350..1750).contains(&from_known), "known visitors: {from_known}");
}

#[test]
fn home_page_is_the_most_generated() {
    let mut factory = factory(9, Interval::Today);
    let views = factory.make_many(1000, at("2024-06-30 12:00:00"));

    let home = views.iter().filter(|v| v.page == "https://example.com").count();
    assert!(home > 400, "home visits: {home}");
}

#[test]
fn same_seed_gives_same_views() {
    let now = at("2024-06-30 12:00:00");
    let first = factory(21, Interval::PastSixMonths).make_many(50, now);
    let second = factory(21, Interval::PastSixMonths).make_many(50, now);

    assert_eq!(first, second);
}
