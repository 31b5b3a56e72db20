use super::common::*;
use crate::postings::domain::PostId;
use crate::postings::{JobPostServiceError, NotAllowedReason};

fn interest_rows(harness: &Harness, id: PostId) -> u64 {
    harness.aggregate(id).interests.len() as u64
}

#[test]
fn express_interest_inserts_and_counts() {
    let harness = Harness::new();
    let id = harness.write_post();

    harness
        .service
        .express_interest(ALICE, id)
        .expect("alice is interested");
    harness
        .service
        .express_interest(BOB, id)
        .expect("bob is interested");

    let aggregate = harness.aggregate(id);
    assert_eq!(aggregate.post.interests_count, 2);
    assert!(aggregate.has_interest(member_id(ALICE)));
    assert!(aggregate
        .interests
        .iter()
        .all(|interest| interest.detail_id == aggregate.detail.id));
}

#[test]
fn duplicate_interest_is_rejected_without_side_effects() {
    let harness = Harness::new();
    let id = harness.write_post();
    harness
        .service
        .express_interest(ALICE, id)
        .expect("first interest");
    let before = harness.aggregate(id);

    match harness.service.express_interest(ALICE, id) {
        Err(JobPostServiceError::NotAllowed(NotAllowedReason::InterestAlreadyExpressed)) => {}
        other => panic!("expected duplicate interest rejection, got {other:?}"),
    }
    assert_eq!(harness.aggregate(id), before);
}

#[test]
fn withdraw_without_interest_is_rejected_without_side_effects() {
    let harness = Harness::new();
    let id = harness.write_post();
    harness
        .service
        .express_interest(BOB, id)
        .expect("bob is interested");
    let before = harness.aggregate(id);

    match harness.service.withdraw_interest(ALICE, id) {
        Err(JobPostServiceError::NotAllowed(NotAllowedReason::InterestMissing)) => {}
        other => panic!("expected missing interest rejection, got {other:?}"),
    }
    assert_eq!(harness.aggregate(id), before);
}

#[test]
fn interest_count_tracks_rows_across_toggles() {
    let harness = Harness::new();
    let id = harness.write_post();
    let steps: [(&str, bool); 8] = [
        (ALICE, true),
        (BOB, true),
        (ALICE, true),
        (ALICE, false),
        (CAROL, true),
        (ALICE, false),
        (BOB, false),
        (ALICE, true),
    ];

    for (actor, express) in steps {
        let _ = if express {
            harness.service.express_interest(actor, id)
        } else {
            harness.service.withdraw_interest(actor, id)
        };
        let aggregate = harness.aggregate(id);
        assert_eq!(aggregate.post.interests_count, interest_rows(&harness, id));
    }

    let aggregate = harness.aggregate(id);
    assert_eq!(aggregate.post.interests_count, 2);
    assert!(aggregate.has_interest(member_id(ALICE)));
    assert!(aggregate.has_interest(member_id(CAROL)));
    assert!(!aggregate.has_interest(member_id(BOB)));
}

#[test]
fn interest_listing_follows_the_member() {
    let harness = Harness::new();
    let first = harness.write_post();
    let second = harness.write_post();
    harness
        .service
        .express_interest(ALICE, second)
        .expect("interest");

    let views = harness
        .service
        .find_by_interest_and_member(member_id(ALICE))
        .expect("listing");
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].id, second);
    assert_eq!(views[0].interests_count, 1);

    harness
        .service
        .withdraw_interest(ALICE, second)
        .expect("withdraw");
    assert!(harness
        .service
        .find_by_interest_and_member(member_id(ALICE))
        .expect("listing")
        .is_empty());
    assert_eq!(harness.aggregate(first).post.interests_count, 0);
}

#[test]
fn unknown_member_cannot_express_interest() {
    let harness = Harness::new();
    let id = harness.write_post();
    assert!(matches!(
        harness.service.express_interest("ghost", id),
        Err(JobPostServiceError::MemberNotFound(_))
    ));
    assert!(matches!(
        harness.service.express_interest(ALICE, PostId(u64::MAX)),
        Err(JobPostServiceError::PostNotFound(_))
    ));
}
