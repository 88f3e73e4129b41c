// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog search and difficulty filter tests.

use group_rides::models::{Difficulty, Ride, RideCollection};
use group_rides::services::{filter, DifficultyFilter, RideAffordance};

mod common;
use common::{ride, user};

fn catalog() -> RideCollection {
    let mut coffee = ride("Morning Coffee Ride", "alice", 10);
    coffee.start_location = "Ferry Building".to_string();
    coffee.description = "Easy spin to the pastry shop".to_string();

    let mut hills = ride("Hill Repeats", "bob", 6);
    hills.difficulty = Difficulty::Hard;
    hills.start_location = "Twin Peaks".to_string();
    hills.description = "Five climbs, no mercy".to_string();

    let mut coast = ride("Coastal Cruise", "carol", 12);
    coast.difficulty = Difficulty::Moderate;
    coast.start_location = "Half Moon Bay".to_string();
    coast.description = "Rolling coast road with a coffee stop".to_string();

    RideCollection::live(vec![coffee, hills, coast])
}

fn titles(rides: &[&Ride]) -> Vec<String> {
    rides.iter().map(|r| r.title.clone()).collect()
}

#[test]
fn test_empty_query_all_returns_everything_in_order() {
    let catalog = catalog();
    let visible = filter(&catalog, "", DifficultyFilter::All);

    let expected: Vec<&Ride> = catalog.rides().iter().collect();
    assert_eq!(visible, expected);
}

#[test]
fn test_case_insensitive_match() {
    let catalog = catalog();
    assert_eq!(
        titles(&filter(&catalog, "HILL", DifficultyFilter::All)),
        vec!["Hill Repeats"]
    );
    assert_eq!(
        titles(&filter(&catalog, "twin peaks", DifficultyFilter::All)),
        vec!["Hill Repeats"]
    );
}

#[test]
fn test_matches_title_or_location_or_description() {
    let catalog = catalog();

    // "coffee": title of one ride, description of another
    assert_eq!(
        titles(&filter(&catalog, "coffee", DifficultyFilter::All)),
        vec!["Morning Coffee Ride", "Coastal Cruise"]
    );
    // location only
    assert_eq!(
        titles(&filter(&catalog, "half moon", DifficultyFilter::All)),
        vec!["Coastal Cruise"]
    );
    // description only
    assert_eq!(
        titles(&filter(&catalog, "no mercy", DifficultyFilter::All)),
        vec!["Hill Repeats"]
    );
    assert!(filter(&catalog, "velodrome", DifficultyFilter::All).is_empty());
}

#[test]
fn test_difficulty_combines_with_query() {
    let catalog = catalog();

    assert_eq!(
        titles(&filter(&catalog, "", DifficultyFilter::Only(Difficulty::Hard))),
        vec!["Hill Repeats"]
    );
    assert_eq!(
        titles(&filter(
            &catalog,
            "coffee",
            DifficultyFilter::Only(Difficulty::Moderate)
        )),
        vec!["Coastal Cruise"]
    );
    assert!(filter(&catalog, "coffee", DifficultyFilter::Only(Difficulty::Hard)).is_empty());
}

#[test]
fn test_filter_is_deterministic_and_pure() {
    let catalog = catalog();
    let before = catalog.clone();

    let first = titles(&filter(&catalog, "c", DifficultyFilter::All));
    let second = titles(&filter(&catalog, "c", DifficultyFilter::All));

    assert_eq!(first, second);
    assert_eq!(catalog, before);
}

#[test]
fn test_difficulty_filter_parsing() {
    assert_eq!("all".parse::<DifficultyFilter>(), Ok(DifficultyFilter::All));
    assert_eq!(
        "Moderate".parse::<DifficultyFilter>(),
        Ok(DifficultyFilter::Only(Difficulty::Moderate))
    );
    assert!("Brutal".parse::<DifficultyFilter>().is_err());
}

#[test]
fn test_affordances() {
    let mut pair = ride("Pair", "alice", 2);

    assert_eq!(
        RideAffordance::for_ride(&pair, None, false),
        RideAffordance::SignInRequired
    );
    assert_eq!(
        RideAffordance::for_ride(&pair, Some(&user("alice")), false),
        RideAffordance::YourRide
    );
    assert_eq!(
        RideAffordance::for_ride(&pair, Some(&user("bob")), false),
        RideAffordance::Join
    );
    assert_eq!(
        RideAffordance::for_ride(&pair, Some(&user("bob")), true),
        RideAffordance::DemoMode
    );

    pair.participants.push("bob".to_string());
    pair.current_participants = 2;
    assert_eq!(
        RideAffordance::for_ride(&pair, Some(&user("bob")), false),
        RideAffordance::Leave
    );
    let carol = RideAffordance::for_ride(&pair, Some(&user("carol")), false);
    assert_eq!(carol, RideAffordance::Full);
    assert!(!carol.is_actionable());
    assert_eq!(carol.label(), "Full");
}
