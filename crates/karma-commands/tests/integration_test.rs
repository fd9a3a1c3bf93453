//! End-to-end scenarios through the karma service with a file-backed store.

use karma_commands::{Command, CommandParser, KarmaService, Outcome, ParseOutcome, ServiceOptions};
use karma_common::test_utils::db_fixtures::temp_db_path;
use karma_common::test_utils::property_testing::{handle_strategy, vote_sequence_strategy};
use karma_common::test_utils::{chat_fixtures, handle, init_test_logging};
use karma_i18n::Messages;
use karma_store::KarmaStore;
use proptest::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::thread;

fn service_at(path: &Path) -> KarmaService {
    init_test_logging();
    let store = Arc::new(KarmaStore::open(path).expect("store opens"));
    let messages = Messages::load("en-US", "/").expect("locale loads");
    KarmaService::new(store, messages, ServiceOptions::default())
}

#[test]
fn test_votes_then_rating() {
    let (_dir, path) = temp_db_path();
    let service = service_at(&path);
    let group = chat_fixtures::test_group();

    for _ in 0..3 {
        assert_eq!(service.handle_upvote("@alice", "/upvote @bob", group).unwrap(), None);
    }
    assert_eq!(service.handle_downvote("@alice", "/downvote @bob", group).unwrap(), None);

    assert_eq!(
        service.handle_rating("@carol", "/rating @bob", group).unwrap(),
        "@bob's karma is 2."
    );
    assert_eq!(
        service.handle_rating("@carol", "/rating @dave", group).unwrap(),
        "@dave doesn't have karma yet."
    );
}

#[test]
fn test_scores_survive_restart() {
    let (_dir, path) = temp_db_path();
    let group = chat_fixtures::test_group();
    {
        let service = service_at(&path);
        service.handle_upvote("@alice", "/upvote @bob", group).unwrap();
    }

    let service = service_at(&path);
    assert_eq!(
        service.handle_rating("@carol", "/rating @bob", group).unwrap(),
        "@bob's karma is 1."
    );
}

#[test]
fn test_scores_are_per_group() {
    let (_dir, path) = temp_db_path();
    let service = service_at(&path);
    service
        .handle_upvote("@alice", "/upvote @bob", chat_fixtures::test_group())
        .unwrap();

    assert_eq!(
        service
            .handle_rating("@carol", "/rating @bob", chat_fixtures::other_group())
            .unwrap(),
        "@bob doesn't have karma yet."
    );
    assert_eq!(
        service
            .handle_top("@carol", "/top5 global", chat_fixtures::other_group())
            .unwrap(),
        "Top 1 overall:\n1. @bob: 1"
    );
}

#[test]
fn test_rejected_commands_leave_no_rows() {
    let (_dir, path) = temp_db_path();
    let service = service_at(&path);
    let group = chat_fixtures::test_group();

    assert_eq!(
        service.upvote("@alice", "/upvote @alice", group).unwrap(),
        Outcome::SelfVote
    );
    assert_eq!(
        service.upvote("@alice", "/upvote @bob @carol", group).unwrap(),
        Outcome::UsageError(Command::Upvote)
    );
    assert_eq!(
        service.top("@alice", "/top5 everywhere", group).unwrap(),
        Outcome::UsageError(Command::Top)
    );

    let stats = service.store().stats().unwrap();
    assert_eq!(stats.users, 0);
    assert_eq!(stats.groups, 0);
    assert_eq!(stats.karma_records, 0);
}

#[test]
fn test_concurrent_votes_are_not_lost() {
    let (_dir, path) = temp_db_path();
    let service = Arc::new(service_at(&path));
    let group = chat_fixtures::test_group();

    let workers: Vec<_> = (0..6)
        .map(|i| {
            let service = Arc::clone(&service);
            let voter = if i % 2 == 0 { "@alice" } else { "@carol" };
            thread::spawn(move || {
                for _ in 0..25 {
                    service.upvote(voter, "/upvote @bob", group).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(service.store().get_karma(&handle("@bob"), group).unwrap(), Some(150));
}

proptest! {
    #[test]
    fn prop_any_valid_handle_parses(target in handle_strategy()) {
        let parser = CommandParser::default();
        let text = format!("/rating {target}");
        prop_assert_eq!(parser.parse_handle(Command::Rating, &text), ParseOutcome::Success(target));
    }

    #[test]
    fn prop_rating_reports_net_votes(votes in vote_sequence_strategy(30)) {
        let (_dir, path) = temp_db_path();
        let service = service_at(&path);
        let group = chat_fixtures::test_group();

        for delta in &votes {
            let text = if *delta > 0 { "/upvote @bob" } else { "/downvote @bob" };
            service.handle_message("@alice", text, group).unwrap();
        }

        let expected = if votes.is_empty() {
            "@bob doesn't have karma yet.".to_string()
        } else {
            format!("@bob's karma is {}.", votes.iter().sum::<i64>())
        };
        prop_assert_eq!(service.handle_rating("@carol", "/rating @bob", group).unwrap(), expected);
    }
}
