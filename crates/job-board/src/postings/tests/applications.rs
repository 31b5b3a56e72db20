use super::common::*;
use crate::postings::domain::{ApplicationId, ApprovalStatus, Gender};
use crate::postings::forms::ApplicationForm;
use crate::postings::{JobPostServiceError, NotAllowedReason};

#[test]
fn apply_creates_pending_application_and_counts_it() {
    let harness = Harness::new();
    let id = harness.write_post();

    let application_id = harness
        .service
        .apply(ALICE, id, application_form())
        .expect("alice applies");

    let aggregate = harness.aggregate(id);
    assert_eq!(aggregate.post.application_count, 1);
    let application = &aggregate.applications[0];
    assert_eq!(application.id, application_id);
    assert_eq!(application.member_id, member_id(ALICE));
    assert_eq!(application.detail_id, aggregate.detail.id);
    assert_eq!(application.status, ApprovalStatus::Pending);
}

#[test]
fn apply_rejects_authors_duplicates_and_closed_posts() {
    let harness = Harness::new();
    let id = harness.write_post();

    assert!(matches!(
        harness.service.apply(AUTHOR, id, application_form()),
        Err(JobPostServiceError::NotAllowed(NotAllowedReason::OwnPost))
    ));

    harness
        .service
        .apply(ALICE, id, application_form())
        .expect("first application");
    assert!(matches!(
        harness.service.apply(ALICE, id, application_form()),
        Err(JobPostServiceError::NotAllowed(NotAllowedReason::AlreadyApplied))
    ));

    harness.service.close_job_post(id).expect("close");
    assert!(matches!(
        harness.service.apply(BOB, id, application_form()),
        Err(JobPostServiceError::NotAllowed(NotAllowedReason::PostClosed))
    ));
    assert_eq!(harness.aggregate(id).post.application_count, 1);
}

#[test]
fn apply_checks_essential_criteria() {
    let harness = Harness::new();
    let mut form = register_form();
    form.min_age = 25;
    form.gender = Gender::Female;
    let id = harness
        .service
        .write_post(AUTHOR, form)
        .expect("author can post");

    // bob: too young and wrong gender; alice: 27 and female.
    assert!(matches!(
        harness.service.apply(BOB, id, application_form()),
        Err(JobPostServiceError::NotAllowed(NotAllowedReason::Ineligible))
    ));
    harness
        .service
        .apply(ALICE, id, application_form())
        .expect("alice qualifies");
}

#[test]
fn apply_rejects_blank_body() {
    let harness = Harness::new();
    let id = harness.write_post();
    let form = ApplicationForm {
        body: String::new(),
    };
    assert!(matches!(
        harness.service.apply(ALICE, id, form),
        Err(JobPostServiceError::InvalidForm(_))
    ));
}

#[test]
fn author_decides_and_approval_marks_post_employed() {
    let harness = Harness::new();
    let id = harness.write_post();
    let application_id = harness
        .service
        .apply(ALICE, id, application_form())
        .expect("alice applies");

    assert!(matches!(
        harness
            .service
            .decide_application(BOB, id, application_id, true),
        Err(JobPostServiceError::NotAllowed(NotAllowedReason::NotAuthor))
    ));
    assert!(matches!(
        harness
            .service
            .decide_application(AUTHOR, id, ApplicationId(u64::MAX), true),
        Err(JobPostServiceError::ApplicationNotFound(_))
    ));

    let status = harness
        .service
        .decide_application(AUTHOR, id, application_id, true)
        .expect("author approves");
    assert_eq!(status, ApprovalStatus::Approved);

    let aggregate = harness.aggregate(id);
    assert!(aggregate.post.employed);
    assert_eq!(aggregate.applications[0].status, ApprovalStatus::Approved);
}

#[test]
fn cancel_application_is_limited_to_the_applicant() {
    let harness = Harness::new();
    let id = harness.write_post();
    let application_id = harness
        .service
        .apply(ALICE, id, application_form())
        .expect("alice applies");

    assert!(matches!(
        harness.service.cancel_application(BOB, id, application_id),
        Err(JobPostServiceError::NotAllowed(NotAllowedReason::NotApplicant))
    ));

    harness
        .service
        .cancel_application(ALICE, id, application_id)
        .expect("alice cancels");
    let aggregate = harness.aggregate(id);
    assert!(aggregate.applications.is_empty());
    assert_eq!(aggregate.post.application_count, 0);
}

#[test]
fn application_listing_is_for_the_author() {
    let harness = Harness::new();
    let id = harness.write_post();
    harness
        .service
        .apply(ALICE, id, application_form())
        .expect("alice applies");

    assert!(matches!(
        harness.service.find_applications(ALICE, id),
        Err(JobPostServiceError::NotAllowed(NotAllowedReason::NotAuthor))
    ));
    let views = harness
        .service
        .find_applications(AUTHOR, id)
        .expect("author lists");
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].status, "pending");
    assert_eq!(views[0].member_id, member_id(ALICE));
}

#[test]
fn decisions_are_final() {
    let harness = Harness::new();
    let id = harness.write_post();
    let approved = harness
        .service
        .apply(ALICE, id, application_form())
        .expect("alice applies");
    let rejected = harness
        .service
        .apply(CAROL, id, application_form())
        .expect("carol applies");
    harness
        .service
        .decide_application(AUTHOR, id, approved, true)
        .expect("author approves");
    harness
        .service
        .decide_application(AUTHOR, id, rejected, false)
        .expect("author rejects");

    assert!(matches!(
        harness.service.decide_application(AUTHOR, id, approved, false),
        Err(JobPostServiceError::NotAllowed(NotAllowedReason::AlreadyDecided))
    ));
    assert!(matches!(
        harness.service.decide_application(AUTHOR, id, rejected, true),
        Err(JobPostServiceError::NotAllowed(NotAllowedReason::AlreadyDecided))
    ));

    assert_eq!(
        harness
            .service
            .close_deadline_applications(AUTHOR, id)
            .expect("author clears rejected"),
        1
    );
    let aggregate = harness.aggregate(id);
    assert!(aggregate.post.employed);
    assert_eq!(aggregate.applications.len(), 1);
    assert_eq!(aggregate.applications[0].status, ApprovalStatus::Approved);
}

#[test]
fn withdrawing_the_only_approval_clears_employed() {
    let harness = Harness::new();
    let id = harness.write_post();
    let application_id = harness
        .service
        .apply(ALICE, id, application_form())
        .expect("alice applies");
    harness
        .service
        .decide_application(AUTHOR, id, application_id, true)
        .expect("author approves");
    assert!(harness.aggregate(id).post.employed);

    harness
        .service
        .cancel_application(ALICE, id, application_id)
        .expect("alice withdraws");

    assert!(!harness.aggregate(id).post.employed);
}
