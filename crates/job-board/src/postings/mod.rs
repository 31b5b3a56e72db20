//! Job posting lifecycle: creation, editing, interest, applications, comments, and expiry.
//!
//! Each posting is stored as one aggregate (post, detail, eligibility criteria, and the
//! membership records that reference it by identifier). Service operations read the
//! aggregate, apply their changes, and write it back once.

mod applications;
pub mod clock;
mod comments;
pub mod domain;
pub mod forms;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod sweep;
pub mod views;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    Application, ApplicationId, ApprovalStatus, Comment, CommentId, DetailId, Essential, Gender,
    Interest, InterestId, JobPost, JobPostAggregate, JobPostDetail, Member, MemberId, PostId, Role,
};
pub use forms::{
    ApplicationForm, CommentForm, DecisionForm, FormError, ModifyPostForm, RegisterPostForm,
};
pub use memory::{InMemoryJobPostRepository, InMemoryMemberDirectory, InMemoryNotificationPublisher};
pub use repository::{
    ApplicantNotification, JobPostRepository, MemberDirectory, NotificationError,
    NotificationPublisher, RemovalReason, RepositoryError,
};
pub use router::{job_post_router, ACTOR_HEADER};
pub use service::{JobPostService, JobPostServiceError, NotAllowedReason};
pub use sweep::{ExpirationSweep, SweepFailure, SweepReport};
pub use views::{ApplicationView, CommentView, JobPostDetailView, JobPostView};
