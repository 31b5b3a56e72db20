use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

identifier!(
    /// Identifier of a registered member.
    MemberId
);
identifier!(
    /// Identifier of a job posting; also keys the posting's aggregate.
    PostId
);
identifier!(
    /// Identifier of the detail record owned by a posting.
    DetailId
);
identifier!(ApplicationId);
identifier!(InterestId);
identifier!(CommentId);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    /// No preference when used as a requirement.
    #[default]
    Undefined,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Undefined => "undefined",
        }
    }

    /// Whether a member of `candidate` gender satisfies this requirement.
    pub fn admits(self, candidate: Gender) -> bool {
        self == Gender::Undefined || self == candidate
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Member record owned by the member directory; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    pub birth: NaiveDate,
    #[serde(default)]
    pub gender: Gender,
}

impl Member {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Age used for eligibility checks: the year one year from `now`, minus the birth year.
    ///
    /// This is deliberately not a calendar-accurate age.
    pub fn eligibility_age(&self, now: NaiveDateTime) -> i32 {
        (now.year() + 1) - self.birth.year()
    }
}

/// Summary and lifecycle record of a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPost {
    pub id: PostId,
    pub member_id: MemberId,
    pub author: String,
    pub title: String,
    pub location: String,
    pub deadline: NaiveDate,
    pub view_count: u64,
    pub comments_count: u64,
    pub application_count: u64,
    pub interests_count: u64,
    pub closed: bool,
    pub employed: bool,
    pub created_at: NaiveDateTime,
    pub modified_at: NaiveDateTime,
}

impl JobPost {
    pub fn new(
        id: PostId,
        author: &Member,
        title: String,
        location: String,
        deadline: NaiveDate,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            member_id: author.id,
            author: author.username.clone(),
            title,
            location,
            deadline,
            view_count: 0,
            comments_count: 0,
            application_count: 0,
            interests_count: 0,
            closed: false,
            employed: false,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn update(&mut self, title: String, deadline: NaiveDate, now: NaiveDateTime) {
        self.title = title;
        self.deadline = deadline;
        self.modified_at = now;
    }

    /// Marks the posting closed. Closing never reverts.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        !self.closed && self.deadline < today
    }

    pub fn increase_view_count(&mut self) {
        self.view_count += 1;
    }

    pub fn increase_interest_count(&mut self) {
        self.interests_count += 1;
    }

    pub fn decrease_interest_count(&mut self) {
        self.interests_count = self.interests_count.saturating_sub(1);
    }

    pub fn increase_application_count(&mut self) {
        self.application_count += 1;
    }

    pub fn decrease_application_count(&mut self, by: u64) {
        self.application_count = self.application_count.saturating_sub(by);
    }

    pub fn increase_comments_count(&mut self) {
        self.comments_count += 1;
    }

    pub fn decrease_comments_count(&mut self) {
        self.comments_count = self.comments_count.saturating_sub(1);
    }
}

/// Full posting content, one per [`JobPost`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPostDetail {
    pub id: DetailId,
    pub post_id: PostId,
    pub author: String,
    pub body: String,
}

impl JobPostDetail {
    pub fn new(id: DetailId, post: &JobPost, body: String) -> Self {
        Self {
            id,
            post_id: post.id,
            author: post.author.clone(),
            body,
        }
    }

    pub fn update(&mut self, body: String) {
        self.body = body;
    }
}

/// Eligibility criteria attached to a posting's detail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Essential {
    pub min_age: u32,
    pub gender: Gender,
}

impl Essential {
    pub fn new(min_age: u32, gender: Gender) -> Self {
        Self { min_age, gender }
    }

    pub fn update(&mut self, min_age: u32, gender: Gender) {
        self.min_age = min_age;
        self.gender = gender;
    }

    pub fn admits_age(&self, member: &Member, now: NaiveDateTime) -> bool {
        i64::from(member.eligibility_age(now)) >= i64::from(self.min_age)
    }

    pub fn admits(&self, member: &Member, now: NaiveDateTime) -> bool {
        self.admits_age(member, now) && self.gender.admits(member.gender)
    }
}

/// Review state of an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub member_id: MemberId,
    pub detail_id: DetailId,
    pub body: String,
    pub status: ApprovalStatus,
    pub created_at: NaiveDateTime,
}

impl Application {
    pub fn new(
        id: ApplicationId,
        member_id: MemberId,
        detail_id: DetailId,
        body: String,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            member_id,
            detail_id,
            body,
            status: ApprovalStatus::Pending,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    pub id: InterestId,
    pub member_id: MemberId,
    pub detail_id: DetailId,
}

impl Interest {
    pub fn new(id: InterestId, member_id: MemberId, detail_id: DetailId) -> Self {
        Self {
            id,
            member_id,
            detail_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub member_id: MemberId,
    pub author: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub modified_at: NaiveDateTime,
}

impl Comment {
    pub fn new(
        id: CommentId,
        post_id: PostId,
        author: &Member,
        content: String,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            post_id,
            member_id: author.id,
            author: author.username.clone(),
            content,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn update(&mut self, content: String, now: NaiveDateTime) {
        self.content = content;
        self.modified_at = now;
    }
}

/// Everything owned by a single posting, persisted and deleted as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPostAggregate {
    pub post: JobPost,
    pub detail: JobPostDetail,
    pub essential: Essential,
    pub applications: Vec<Application>,
    pub interests: Vec<Interest>,
    pub comments: Vec<Comment>,
}

impl JobPostAggregate {
    pub fn new(post: JobPost, detail: JobPostDetail, essential: Essential) -> Self {
        Self {
            post,
            detail,
            essential,
            applications: Vec::new(),
            interests: Vec::new(),
            comments: Vec::new(),
        }
    }

    pub fn id(&self) -> PostId {
        self.post.id
    }

    pub fn has_interest(&self, member_id: MemberId) -> bool {
        self.interests
            .iter()
            .any(|interest| interest.member_id == member_id)
    }

    pub fn has_applied(&self, member_id: MemberId) -> bool {
        self.applications
            .iter()
            .any(|application| application.member_id == member_id)
    }

    pub fn has_approved_application(&self) -> bool {
        self.applications
            .iter()
            .any(|application| application.status == ApprovalStatus::Approved)
    }

    /// Removes every application matching `predicate`, keeping `application_count` in step.
    pub fn remove_applications<F>(&mut self, mut predicate: F) -> Vec<Application>
    where
        F: FnMut(&Application) -> bool,
    {
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .applications
            .drain(..)
            .partition(|application| predicate(application));
        self.applications = kept;
        self.post.decrease_application_count(removed.len() as u64);
        removed
    }
}
