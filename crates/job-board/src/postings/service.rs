use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::clock::{Clock, SystemClock};
use super::domain::{
    ApplicationId, ApprovalStatus, CommentId, DetailId, Essential, Interest, InterestId, JobPost,
    JobPostAggregate, JobPostDetail, Member, MemberId, PostId,
};
use super::forms::{FormError, ModifyPostForm, RegisterPostForm};
use super::repository::{
    ApplicantNotification, JobPostRepository, MemberDirectory, NotificationPublisher,
    RemovalReason, RepositoryError,
};
use super::views::{JobPostDetailView, JobPostView};

static POST_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static DETAIL_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static INTEREST_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static COMMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next(sequence: &AtomicU64) -> u64 {
    sequence.fetch_add(1, Ordering::Relaxed)
}

pub(super) fn next_application_id() -> ApplicationId {
    ApplicationId(next(&APPLICATION_SEQUENCE))
}

pub(super) fn next_comment_id() -> CommentId {
    CommentId(next(&COMMENT_SEQUENCE))
}

/// Service enforcing the posting lifecycle across posts, details, and membership records.
pub struct JobPostService<R, M, N> {
    pub(super) posts: Arc<R>,
    pub(super) members: Arc<M>,
    notifications: Arc<N>,
    pub(super) clock: Arc<dyn Clock>,
}

impl<R, M, N> JobPostService<R, M, N>
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(posts: Arc<R>, members: Arc<M>, notifications: Arc<N>) -> Self {
        Self::with_clock(posts, members, notifications, Arc::new(SystemClock))
    }

    pub fn with_clock(
        posts: Arc<R>,
        members: Arc<M>,
        notifications: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            members,
            notifications,
            clock,
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Create a posting together with its detail and eligibility criteria.
    pub fn write_post(
        &self,
        actor: &str,
        form: RegisterPostForm,
    ) -> Result<PostId, JobPostServiceError> {
        form.validate()?;
        let member = self.member(actor)?;
        let now = self.clock.now();

        let post = JobPost::new(
            PostId(next(&POST_SEQUENCE)),
            &member,
            form.title,
            form.location,
            form.deadline,
            now,
        );
        let detail = JobPostDetail::new(DetailId(next(&DETAIL_SEQUENCE)), &post, form.body);
        let essential = Essential::new(form.min_age, form.gender);

        let stored = self
            .posts
            .insert(JobPostAggregate::new(post, detail, essential))?;
        info!(post_id = %stored.id(), author = actor, "job post created");
        Ok(stored.id())
    }

    pub fn find_by_id(&self, id: PostId) -> Result<JobPostDetailView, JobPostServiceError> {
        let aggregate = self.aggregate_with_detail(id)?;
        Ok(JobPostDetailView::from_entity(
            &aggregate.post,
            &aggregate.detail,
            &aggregate.essential,
        ))
    }

    pub fn find_all(&self) -> Result<Vec<JobPostView>, JobPostServiceError> {
        Ok(JobPostView::from_entities(&self.posts.all()?))
    }

    pub fn find_by_username(&self, username: &str) -> Result<Vec<JobPostView>, JobPostServiceError> {
        let member = self.member(username)?;
        Ok(JobPostView::from_entities(&self.posts.by_member(member.id)?))
    }

    pub fn find_by_interest_and_member(
        &self,
        member_id: MemberId,
    ) -> Result<Vec<JobPostView>, JobPostServiceError> {
        Ok(JobPostView::from_entities(
            &self.posts.interested_by(member_id)?,
        ))
    }

    /// Edit a posting and drop applications that no longer meet the minimum age.
    pub fn modify_post(
        &self,
        actor: &str,
        id: PostId,
        form: ModifyPostForm,
    ) -> Result<(), JobPostServiceError> {
        form.validate()?;
        let mut aggregate = self.aggregate_with_detail(id)?;
        if !Self::can_edit_post(actor, &aggregate.post.author) {
            return Err(NotAllowedReason::NotAuthor.into());
        }

        let now = self.clock.now();
        aggregate.post.update(form.title, form.deadline, now);
        aggregate.detail.update(form.body);
        aggregate.essential.update(form.min_age, form.gender);

        let mut ineligible = Vec::new();
        for application in &aggregate.applications {
            let Some(applicant) = self.members.find_by_id(application.member_id)? else {
                continue;
            };
            if !aggregate.essential.admits_age(&applicant, now) {
                ineligible.push(application.id);
            }
        }
        let removed = aggregate.remove_applications(|application| ineligible.contains(&application.id));

        self.posts.update(aggregate)?;
        info!(
            post_id = %id,
            removed_applications = removed.len(),
            "job post modified"
        );

        for application in removed {
            let notification = ApplicantNotification::ApplicationRemoved {
                post_id: id,
                application_id: application.id,
                member_id: application.member_id,
                reason: RemovalReason::EligibilityChanged,
            };
            if let Err(err) = self.notifications.publish(notification) {
                warn!(
                    post_id = %id,
                    application_id = %application.id,
                    error = %err,
                    "failed to notify applicant about removed application"
                );
            }
        }

        Ok(())
    }

    /// Delete a posting; only its author may do so.
    pub fn delete_post(&self, actor: &str, id: PostId) -> Result<(), JobPostServiceError> {
        let aggregate = self.aggregate(id)?;
        if !Self::can_edit_post(actor, &aggregate.post.author) {
            return Err(NotAllowedReason::NotAuthor.into());
        }

        self.posts.delete(id)?;
        info!(post_id = %id, actor, "job post deleted");
        Ok(())
    }

    /// Delete a posting as its author or as an administrator.
    pub fn delete_job_post(&self, actor: &str, id: PostId) -> Result<(), JobPostServiceError> {
        let aggregate = self.aggregate(id)?;
        let member = self.member(actor)?;
        if !(member.is_admin() || aggregate.post.member_id == member.id) {
            return Err(NotAllowedReason::NotAuthorOrAdmin.into());
        }

        self.posts.delete(id)?;
        info!(post_id = %id, actor, admin = member.is_admin(), "job post deleted");
        Ok(())
    }

    pub fn can_edit_post(username: &str, author: &str) -> bool {
        username == author
    }

    pub fn express_interest(&self, actor: &str, post_id: PostId) -> Result<(), JobPostServiceError> {
        let mut aggregate = self.aggregate_with_detail(post_id)?;
        let member = self.member(actor)?;
        if aggregate.has_interest(member.id) {
            return Err(NotAllowedReason::InterestAlreadyExpressed.into());
        }

        aggregate.interests.push(Interest::new(
            InterestId(next(&INTEREST_SEQUENCE)),
            member.id,
            aggregate.detail.id,
        ));
        aggregate.post.increase_interest_count();
        self.posts.update(aggregate)?;
        Ok(())
    }

    pub fn withdraw_interest(&self, actor: &str, post_id: PostId) -> Result<(), JobPostServiceError> {
        let mut aggregate = self.aggregate_with_detail(post_id)?;
        let member = self.member(actor)?;
        if !aggregate.has_interest(member.id) {
            return Err(NotAllowedReason::InterestMissing.into());
        }

        aggregate
            .interests
            .retain(|interest| interest.member_id != member.id);
        aggregate.post.decrease_interest_count();
        self.posts.update(aggregate)?;
        Ok(())
    }

    pub fn increase_view_count(&self, id: PostId) -> Result<(), JobPostServiceError> {
        let mut aggregate = self.aggregate(id)?;
        aggregate.post.increase_view_count();
        self.posts.update(aggregate)?;
        Ok(())
    }

    /// Drop rejected applications, keeping pending and approved ones. Returns how many were removed.
    pub fn close_deadline_applications(
        &self,
        actor: &str,
        post_id: PostId,
    ) -> Result<usize, JobPostServiceError> {
        let mut aggregate = self.aggregate_with_detail(post_id)?;
        if !Self::can_edit_post(actor, &aggregate.detail.author) {
            return Err(NotAllowedReason::NotAuthor.into());
        }

        let removed = aggregate
            .remove_applications(|application| application.status == ApprovalStatus::Rejected);
        self.posts.update(aggregate)?;
        info!(post_id = %post_id, removed = removed.len(), "rejected applications cleared");
        Ok(removed.len())
    }

    pub fn find_expired_job_posts(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<JobPost>, JobPostServiceError> {
        Ok(self.posts.expired(today)?)
    }

    /// Mark a posting closed. Closing an already closed posting changes nothing.
    pub fn close_job_post(&self, id: PostId) -> Result<(), JobPostServiceError> {
        let mut aggregate = self.aggregate(id)?;
        aggregate.post.close();
        self.posts.update(aggregate)?;
        info!(post_id = %id, "job post closed");
        Ok(())
    }

    pub(super) fn member(&self, username: &str) -> Result<Member, JobPostServiceError> {
        self.members
            .find_by_username(username)?
            .ok_or_else(|| JobPostServiceError::MemberNotFound(username.to_string()))
    }

    pub(super) fn aggregate(&self, id: PostId) -> Result<JobPostAggregate, JobPostServiceError> {
        self.posts
            .fetch(id)?
            .ok_or(JobPostServiceError::PostNotFound(id))
    }

    /// Fetch a posting whose detail is present under the posting's author.
    pub(super) fn aggregate_with_detail(
        &self,
        id: PostId,
    ) -> Result<JobPostAggregate, JobPostServiceError> {
        let aggregate = self.aggregate(id)?;
        self.posts
            .find_detail_by_post_and_author(id, &aggregate.post.author)?
            .ok_or(JobPostServiceError::PostNotFound(id))?;
        Ok(aggregate)
    }
}

/// Why an actor may not perform an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NotAllowedReason {
    #[error("only the author may change this job post")]
    NotAuthor,
    #[error("only the author or an administrator may delete this job post")]
    NotAuthorOrAdmin,
    #[error("interest already expressed")]
    InterestAlreadyExpressed,
    #[error("no interest to withdraw")]
    InterestMissing,
    #[error("authors cannot apply to their own job post")]
    OwnPost,
    #[error("already applied to this job post")]
    AlreadyApplied,
    #[error("job post is closed")]
    PostClosed,
    #[error("applicant does not meet the job post requirements")]
    Ineligible,
    #[error("application has already been decided")]
    AlreadyDecided,
    #[error("only the applicant may withdraw this application")]
    NotApplicant,
    #[error("only the comment author may change this comment")]
    NotCommentAuthor,
}

/// Error raised by the job post service.
#[derive(Debug, thiserror::Error)]
pub enum JobPostServiceError {
    #[error("member '{0}' not found")]
    MemberNotFound(String),
    #[error("job post {0} does not exist")]
    PostNotFound(PostId),
    #[error("application {0} does not exist")]
    ApplicationNotFound(ApplicationId),
    #[error("comment {0} does not exist")]
    CommentNotFound(CommentId),
    #[error("not allowed: {0}")]
    NotAllowed(#[from] NotAllowedReason),
    #[error(transparent)]
    InvalidForm(#[from] FormError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
