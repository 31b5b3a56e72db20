use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicationId, JobPost, JobPostAggregate, JobPostDetail, Member, MemberId, PostId,
};

/// Lookup into the member directory, which this crate never mutates.
pub trait MemberDirectory: Send + Sync {
    fn find_by_username(&self, username: &str) -> Result<Option<Member>, RepositoryError>;
    fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, RepositoryError>;
}

/// Storage abstraction for posting aggregates.
///
/// Each aggregate holds a posting together with its detail, eligibility criteria, and
/// membership records. `update` replaces the whole aggregate, which gives every service
/// operation a single write to commit or abandon.
pub trait JobPostRepository: Send + Sync {
    fn insert(&self, aggregate: JobPostAggregate) -> Result<JobPostAggregate, RepositoryError>;
    fn fetch(&self, id: PostId) -> Result<Option<JobPostAggregate>, RepositoryError>;
    /// Replaces the stored aggregate. A posting the store holds as closed stays closed,
    /// even when `aggregate` was read before the close committed.
    fn update(&self, aggregate: JobPostAggregate) -> Result<(), RepositoryError>;
    /// Removes the posting and everything it owns.
    fn delete(&self, id: PostId) -> Result<(), RepositoryError>;
    fn all(&self) -> Result<Vec<JobPost>, RepositoryError>;
    fn by_member(&self, member_id: MemberId) -> Result<Vec<JobPost>, RepositoryError>;
    fn interested_by(&self, member_id: MemberId) -> Result<Vec<JobPost>, RepositoryError>;
    /// Postings still open whose deadline falls strictly before `before`.
    fn expired(&self, before: NaiveDate) -> Result<Vec<JobPost>, RepositoryError>;
    fn find_detail_by_post_and_author(
        &self,
        id: PostId,
        author: &str,
    ) -> Result<Option<JobPostDetail>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for telling applicants about changes to their applications.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: ApplicantNotification) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// The posting's eligibility criteria changed and the applicant no longer qualifies.
    EligibilityChanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApplicantNotification {
    ApplicationRemoved {
        post_id: PostId,
        application_id: ApplicationId,
        member_id: MemberId,
        reason: RemovalReason,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
