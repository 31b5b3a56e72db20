use std::sync::Arc;

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::postings::clock::{Clock, FixedClock};
use crate::postings::domain::{Gender, JobPostAggregate, Member, MemberId, PostId, Role};
use crate::postings::forms::{ApplicationForm, ModifyPostForm, RegisterPostForm};
use crate::postings::memory::{
    InMemoryJobPostRepository, InMemoryMemberDirectory, InMemoryNotificationPublisher,
};
use crate::postings::repository::{
    ApplicantNotification, JobPostRepository, NotificationError, NotificationPublisher,
};
use crate::postings::JobPostService;

pub(super) type TestService =
    JobPostService<InMemoryJobPostRepository, InMemoryMemberDirectory, InMemoryNotificationPublisher>;

pub(super) const AUTHOR: &str = "author";
pub(super) const ALICE: &str = "alice";
pub(super) const BOB: &str = "bob";
pub(super) const CAROL: &str = "carol";
pub(super) const ADMIN: &str = "admin";

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    date(year, month, day)
        .and_hms_opt(hour, 0, 0)
        .expect("valid time")
}

fn member(id: u64, username: &str, role: Role, birth: NaiveDate, gender: Gender) -> Member {
    Member {
        id: MemberId(id),
        username: username.to_string(),
        role,
        birth,
        gender,
    }
}

/// With the clock in 2026 the eligibility age is `2027 - birth year`:
/// author 37, alice 27, bob 23, carol 32, admin 47.
pub(super) fn members() -> Vec<Member> {
    vec![
        member(1, AUTHOR, Role::User, date(1990, 5, 1), Gender::Male),
        member(2, ALICE, Role::User, date(2000, 12, 31), Gender::Female),
        member(3, BOB, Role::User, date(2004, 1, 15), Gender::Male),
        member(4, CAROL, Role::User, date(1995, 7, 7), Gender::Female),
        member(5, ADMIN, Role::Admin, date(1980, 2, 2), Gender::Undefined),
    ]
}

pub(super) fn member_id(username: &str) -> MemberId {
    members()
        .into_iter()
        .find(|member| member.username == username)
        .map(|member| member.id)
        .expect("fixture member")
}

pub(super) fn register_form() -> RegisterPostForm {
    RegisterPostForm {
        title: "Weekend cafe shift".to_string(),
        location: "Seoul".to_string(),
        deadline: date(2026, 3, 10),
        body: "Help out behind the counter on Saturdays.".to_string(),
        min_age: 20,
        gender: Gender::Undefined,
    }
}

pub(super) fn modify_form(min_age: u32) -> ModifyPostForm {
    ModifyPostForm {
        title: "Weekend cafe shift (updated)".to_string(),
        deadline: date(2026, 3, 20),
        body: "Saturdays and Sundays.".to_string(),
        min_age,
        gender: Gender::Undefined,
    }
}

pub(super) fn application_form() -> ApplicationForm {
    ApplicationForm {
        body: "I have two years of barista experience.".to_string(),
    }
}

pub(super) struct Harness {
    pub(super) service: Arc<TestService>,
    pub(super) posts: Arc<InMemoryJobPostRepository>,
    pub(super) notifications: Arc<InMemoryNotificationPublisher>,
    pub(super) clock: Arc<FixedClock>,
}

impl Harness {
    pub(super) fn new() -> Self {
        let posts = Arc::new(InMemoryJobPostRepository::default());
        let members = Arc::new(InMemoryMemberDirectory::with_members(members()));
        let notifications = Arc::new(InMemoryNotificationPublisher::default());
        let clock = Arc::new(FixedClock::new(at(2026, 3, 1, 10)));
        let service = Arc::new(JobPostService::with_clock(
            posts.clone(),
            members,
            notifications.clone(),
            clock.clone() as Arc<dyn Clock>,
        ));
        Self {
            service,
            posts,
            notifications,
            clock,
        }
    }

    pub(super) fn write_post(&self) -> PostId {
        self.service
            .write_post(AUTHOR, register_form())
            .expect("author can post")
    }

    pub(super) fn aggregate(&self, id: PostId) -> JobPostAggregate {
        self.posts
            .fetch(id)
            .expect("fetch succeeds")
            .expect("aggregate present")
    }

    pub(super) fn notifications(&self) -> Vec<ApplicantNotification> {
        self.notifications.events()
    }
}

#[derive(Default, Clone)]
pub(super) struct FailingNotifications;

impl NotificationPublisher for FailingNotifications {
    fn publish(&self, _notification: ApplicantNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp down".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
