//! Member applications to a posting and the author's decisions on them.

use tracing::info;

use super::domain::{Application, ApplicationId, ApprovalStatus, PostId};
use super::forms::ApplicationForm;
use super::repository::{JobPostRepository, MemberDirectory, NotificationPublisher};
use super::service::{next_application_id, JobPostService, JobPostServiceError, NotAllowedReason};
use super::views::ApplicationView;

impl<R, M, N> JobPostService<R, M, N>
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn apply(
        &self,
        actor: &str,
        post_id: PostId,
        form: ApplicationForm,
    ) -> Result<ApplicationId, JobPostServiceError> {
        form.validate()?;
        let mut aggregate = self.aggregate_with_detail(post_id)?;
        let member = self.member(actor)?;
        let now = self.clock.now();

        if aggregate.post.closed {
            return Err(NotAllowedReason::PostClosed.into());
        }
        if aggregate.post.member_id == member.id {
            return Err(NotAllowedReason::OwnPost.into());
        }
        if aggregate.has_applied(member.id) {
            return Err(NotAllowedReason::AlreadyApplied.into());
        }
        if !aggregate.essential.admits(&member, now) {
            return Err(NotAllowedReason::Ineligible.into());
        }

        let application = Application::new(
            next_application_id(),
            member.id,
            aggregate.detail.id,
            form.body,
            now,
        );
        let application_id = application.id;
        aggregate.applications.push(application);
        aggregate.post.increase_application_count();
        self.posts.update(aggregate)?;

        info!(post_id = %post_id, application_id = %application_id, "application submitted");
        Ok(application_id)
    }

    /// Approve or reject a pending application. Approving marks the posting as employed.
    /// A decision is final.
    pub fn decide_application(
        &self,
        actor: &str,
        post_id: PostId,
        application_id: ApplicationId,
        approve: bool,
    ) -> Result<ApprovalStatus, JobPostServiceError> {
        let mut aggregate = self.aggregate_with_detail(post_id)?;
        if !Self::can_edit_post(actor, &aggregate.detail.author) {
            return Err(NotAllowedReason::NotAuthor.into());
        }

        let status = if approve {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Rejected
        };
        let application = aggregate
            .applications
            .iter_mut()
            .find(|application| application.id == application_id)
            .ok_or(JobPostServiceError::ApplicationNotFound(application_id))?;
        if application.status != ApprovalStatus::Pending {
            return Err(NotAllowedReason::AlreadyDecided.into());
        }
        application.status = status;
        if status == ApprovalStatus::Approved {
            aggregate.post.employed = true;
        }
        self.posts.update(aggregate)?;

        info!(
            post_id = %post_id,
            application_id = %application_id,
            status = status.label(),
            "application decided"
        );
        Ok(status)
    }

    pub fn cancel_application(
        &self,
        actor: &str,
        post_id: PostId,
        application_id: ApplicationId,
    ) -> Result<(), JobPostServiceError> {
        let mut aggregate = self.aggregate_with_detail(post_id)?;
        let member = self.member(actor)?;

        let application = aggregate
            .applications
            .iter()
            .find(|application| application.id == application_id)
            .ok_or(JobPostServiceError::ApplicationNotFound(application_id))?;
        if application.member_id != member.id {
            return Err(NotAllowedReason::NotApplicant.into());
        }

        aggregate.remove_applications(|application| application.id == application_id);
        aggregate.post.employed = aggregate.has_approved_application();
        self.posts.update(aggregate)?;
        Ok(())
    }

    /// Applications to a posting, visible to its author only.
    pub fn find_applications(
        &self,
        actor: &str,
        post_id: PostId,
    ) -> Result<Vec<ApplicationView>, JobPostServiceError> {
        let aggregate = self.aggregate_with_detail(post_id)?;
        if !Self::can_edit_post(actor, &aggregate.detail.author) {
            return Err(NotAllowedReason::NotAuthor.into());
        }

        Ok(aggregate
            .applications
            .iter()
            .map(ApplicationView::from_entity)
            .collect())
    }
}
